use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::client::{PredictionError, PredictionService};
use crate::fields::{self, ConstraintViolation, Field};
use crate::models::{PatientRecord, ResultPayload};

pub const SUBMIT_LABEL: &str = "Analyze Risk";
pub const BUSY_LABEL: &str = "Analyzing...";
pub const SERVICE_UNREACHABLE_NOTICE: &str =
    "Error connecting to the prediction service. Please ensure the backend is running.";

#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("{label} expects a whole number, got '{raw}'")]
    NotANumber { label: &'static str, raw: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("form is incomplete ({} field(s) fail their constraints)", .0.len())]
    Incomplete(Vec<ConstraintViolation>),
    #[error("a submission is already in flight")]
    AlreadyInFlight,
    #[error("{}", SERVICE_UNREACHABLE_NOTICE)]
    ServiceUnreachable(#[source] PredictionError),
}

impl SubmitError {
    /// The blocking notice to show the user, if this failure warrants one.
    /// Incomplete forms and double submits stay silent.
    pub fn user_notice(&self) -> Option<&'static str> {
        match self {
            SubmitError::ServiceUnreachable(_) => Some(SERVICE_UNREACHABLE_NOTICE),
            SubmitError::Incomplete(_) | SubmitError::AlreadyInFlight => None,
        }
    }
}

fn parse_numeric(field: Field, raw: &str) -> Result<u16, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse::<u16>().map_err(|_| FieldError::NotANumber {
        label: field.spec().label,
        raw: raw.to_string(),
    })
}

/// Clears the in-flight flag however the submission ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Owns the mutable draft for one intake session and the single request it
/// may have outstanding.
pub struct IntakeForm {
    session_id: Uuid,
    draft: PatientRecord,
    in_flight: AtomicBool,
    service: Arc<dyn PredictionService>,
}

impl IntakeForm {
    pub fn new(service: Arc<dyn PredictionService>) -> Self {
        let session_id = Uuid::new_v4();
        debug!("[{}] new intake form", session_id);
        Self {
            session_id,
            draft: PatientRecord::default(),
            in_flight: AtomicBool::new(false),
            service,
        }
    }

    pub fn draft(&self) -> &PatientRecord {
        &self.draft
    }

    /// Applies one edit. Numeric input is trimmed and an empty value clears
    /// the field to 0; option fields keep the raw string.
    pub fn update_field(&mut self, field: Field, raw: &str) -> Result<(), FieldError> {
        let draft = &mut self.draft;
        match field {
            Field::Age => draft.age = parse_numeric(field, raw)?,
            Field::Gender => draft.gender = raw.trim().to_string(),
            Field::BloodPressureSystolic => draft.blood_pressure_systolic = parse_numeric(field, raw)?,
            Field::BloodPressureDiastolic => {
                draft.blood_pressure_diastolic = parse_numeric(field, raw)?
            }
            Field::Cholesterol => draft.cholesterol = parse_numeric(field, raw)?,
            Field::EcgResult => draft.ecg_result = raw.trim().to_string(),
            Field::HeartRate => draft.heart_rate = parse_numeric(field, raw)?,
        }
        Ok(())
    }

    pub fn violations(&self) -> Vec<ConstraintViolation> {
        fields::violations(&self.draft)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_busy() && self.violations().is_empty()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_busy() {
            BUSY_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    /// Sends the draft to the prediction service once and pairs the answer
    /// with the record that produced it. The draft is left untouched on
    /// every outcome.
    pub async fn submit(&self) -> Result<ResultPayload, SubmitError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("[{}] submit ignored, request outstanding", self.session_id);
            return Err(SubmitError::AlreadyInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let violations = self.violations();
        if !violations.is_empty() {
            return Err(SubmitError::Incomplete(violations));
        }

        let record = self.draft.clone();
        info!("[{}] requesting risk prediction", self.session_id);
        match self.service.predict(&record).await {
            Ok(result) => {
                info!(
                    "[{}] prediction received: {} ({:.2})",
                    self.session_id,
                    result.risk_level.as_str(),
                    result.confidence
                );
                Ok(ResultPayload {
                    result,
                    patient_data: record,
                    assessed_at: Utc::now(),
                })
            }
            Err(e) => {
                warn!("[{}] prediction failed: {}", self.session_id, e);
                Err(SubmitError::ServiceUnreachable(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::client::testing::MockPredictionService;
    use crate::models::fixtures::{prediction, sample_patient};
    use crate::models::RiskLevel;

    fn fill(form: &mut IntakeForm, record: &PatientRecord) {
        for field in Field::ALL {
            let value = fields::display_value(record, field);
            form.update_field(field, &value).unwrap();
        }
    }

    fn form_with(service: &Arc<MockPredictionService>) -> IntakeForm {
        let service: Arc<dyn PredictionService> = service.clone();
        IntakeForm::new(service)
    }

    #[test]
    fn new_form_starts_empty_and_disabled() {
        let service = Arc::new(MockPredictionService::unreachable());
        let form = form_with(&service);
        assert_eq!(form.draft(), &PatientRecord::default());
        assert!(!form.can_submit());
        assert_eq!(form.submit_label(), SUBMIT_LABEL);
    }

    #[test]
    fn edits_touch_only_their_field() {
        let service = Arc::new(MockPredictionService::unreachable());
        let mut form = form_with(&service);

        form.update_field(Field::Cholesterol, " 210 ").unwrap();
        assert_eq!(
            form.draft(),
            &PatientRecord {
                cholesterol: 210,
                ..PatientRecord::default()
            }
        );

        form.update_field(Field::EcgResult, "abnormal").unwrap();
        assert_eq!(form.draft().ecg_result, "abnormal");
        assert_eq!(form.draft().cholesterol, 210);

        form.update_field(Field::Cholesterol, "").unwrap();
        assert_eq!(form.draft().cholesterol, 0);
    }

    #[test]
    fn non_numeric_input_leaves_draft_alone() {
        let service = Arc::new(MockPredictionService::unreachable());
        let mut form = form_with(&service);
        form.update_field(Field::Age, "50").unwrap();

        let err = form.update_field(Field::Age, "fifty").unwrap_err();
        assert!(matches!(err, FieldError::NotANumber { .. }));
        assert_eq!(form.draft().age, 50);
    }

    #[test]
    fn submit_enabled_exactly_when_every_constraint_holds() {
        let service = Arc::new(MockPredictionService::unreachable());
        let mut form = form_with(&service);
        fill(&mut form, &sample_patient());
        assert!(form.can_submit());

        let breaking_edits = [
            (Field::Age, "0"),
            (Field::Age, "121"),
            (Field::Gender, ""),
            (Field::BloodPressureSystolic, "69"),
            (Field::BloodPressureDiastolic, "131"),
            (Field::Cholesterol, "99"),
            (Field::EcgResult, ""),
            (Field::HeartRate, "201"),
        ];
        for (field, raw) in breaking_edits {
            let mut form = form_with(&service);
            fill(&mut form, &sample_patient());
            form.update_field(field, raw).unwrap();
            assert!(!form.can_submit(), "{:?}={} should disable submit", field, raw);
        }
    }

    #[tokio::test]
    async fn incomplete_form_never_reaches_the_service() {
        let service = Arc::new(MockPredictionService::answering(prediction("low", 0.2)));
        let form = form_with(&service);

        let err = form.submit().await.unwrap_err();
        assert!(matches!(err, SubmitError::Incomplete(ref v) if v.len() == 7));
        assert!(err.user_notice().is_none());
        assert_eq!(service.calls(), 0);
        assert!(!form.is_busy());
    }

    #[tokio::test]
    async fn successful_submit_sends_draft_once_and_carries_it_forward() {
        let service = Arc::new(MockPredictionService::answering(prediction("high", 0.5)));
        let mut form = form_with(&service);
        fill(&mut form, &sample_patient());

        let payload = form.submit().await.unwrap();
        assert_eq!(service.calls(), 1);
        assert_eq!(service.received(), vec![sample_patient()]);
        assert_eq!(payload.patient_data, sample_patient());
        assert_eq!(payload.result.risk_level, RiskLevel::High);
        assert!(!form.is_busy());
    }

    #[tokio::test]
    async fn failed_submit_reenables_and_keeps_the_draft() {
        let service = Arc::new(MockPredictionService::unreachable());
        let mut form = form_with(&service);
        fill(&mut form, &sample_patient());

        let err = form.submit().await.unwrap_err();
        assert_eq!(err.user_notice(), Some(SERVICE_UNREACHABLE_NOTICE));
        assert_eq!(err.to_string(), SERVICE_UNREACHABLE_NOTICE);
        assert!(form.can_submit());
        assert_eq!(form.submit_label(), SUBMIT_LABEL);
        assert_eq!(form.draft(), &sample_patient());

        service.set_outcome(Some(prediction("medium", 0.4)));
        let payload = form.submit().await.unwrap();
        assert_eq!(payload.result.risk_level, RiskLevel::Medium);
        assert_eq!(service.calls(), 2);
    }

    #[tokio::test]
    async fn second_submit_while_outstanding_is_refused() {
        let service = Arc::new(
            MockPredictionService::answering(prediction("low", 0.82))
                .with_delay(Duration::from_millis(50)),
        );
        let mut form = form_with(&service);
        fill(&mut form, &sample_patient());

        let (first, second, label) = tokio::join!(form.submit(), form.submit(), async {
            tokio::task::yield_now().await;
            (form.submit_label(), form.can_submit())
        });

        assert!(first.is_ok());
        assert!(matches!(second, Err(SubmitError::AlreadyInFlight)));
        assert_eq!(label, (BUSY_LABEL, false));
        assert_eq!(service.calls(), 1);
        assert!(!form.is_busy());
    }
}
