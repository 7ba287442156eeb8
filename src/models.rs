use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Questionnaire answers for one assessment, in the shape the prediction
/// service expects on the wire.
///
/// A zeroed record is the empty draft: every numeric field is 0 and both
/// option fields are empty, so none of them satisfies its constraint yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub age: u16,
    pub gender: String,
    pub blood_pressure_systolic: u16,
    pub blood_pressure_diastolic: u16,
    pub cholesterol: u16,
    pub ecg_result: String,
    pub heart_rate: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EcgResult {
    Normal,
    Abnormal,
    StTAbnormality,
    LeftVentricularHypertrophy,
}

impl EcgResult {
    pub const ALL: [EcgResult; 4] = [
        EcgResult::Normal,
        EcgResult::Abnormal,
        EcgResult::StTAbnormality,
        EcgResult::LeftVentricularHypertrophy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EcgResult::Normal => "normal",
            EcgResult::Abnormal => "abnormal",
            EcgResult::StTAbnormality => "st-t-abnormality",
            EcgResult::LeftVentricularHypertrophy => "left-ventricular-hypertrophy",
        }
    }
}

/// Risk category reported by the prediction service.
///
/// Anything other than the three known levels is kept verbatim in
/// `Unrecognized` instead of failing to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Unrecognized(String),
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for RiskLevel {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "low" => RiskLevel::Low,
            "medium" => RiskLevel::Medium,
            "high" => RiskLevel::High,
            _ => RiskLevel::Unrecognized(raw),
        }
    }
}

impl From<RiskLevel> for String {
    fn from(level: RiskLevel) -> Self {
        level.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub warning: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// What the intake screen hands to the result screen. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPayload {
    pub result: PredictionResult,
    pub patient_data: PatientRecord,
    pub assessed_at: DateTime<Utc>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn sample_patient() -> PatientRecord {
        PatientRecord {
            age: 45,
            gender: "female".to_string(),
            blood_pressure_systolic: 120,
            blood_pressure_diastolic: 80,
            cholesterol: 200,
            ecg_result: "st-t-abnormality".to_string(),
            heart_rate: 72,
        }
    }

    pub fn prediction(level: &str, confidence: f64) -> PredictionResult {
        PredictionResult {
            risk_level: RiskLevel::from(level.to_string()),
            confidence,
            warning: format!("{level} risk detected."),
        }
    }
}
