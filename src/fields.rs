use std::ops::RangeInclusive;

use crate::models::{EcgResult, Gender, PatientRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Age,
    Gender,
    BloodPressureSystolic,
    BloodPressureDiastolic,
    Cholesterol,
    EcgResult,
    HeartRate,
}

/// What a field accepts: an inclusive numeric range, or one of a fixed set
/// of option values (value, display label).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Numeric(RangeInclusive<u16>),
    Choice(Vec<(&'static str, &'static str)>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub placeholder: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub field: Field,
    pub reason: String,
}

impl Field {
    /// Fields in the order the intake screen asks for them.
    pub const ALL: [Field; 7] = [
        Field::Age,
        Field::Gender,
        Field::BloodPressureSystolic,
        Field::BloodPressureDiastolic,
        Field::Cholesterol,
        Field::EcgResult,
        Field::HeartRate,
    ];

    pub fn spec(&self) -> FieldSpec {
        match self {
            Field::Age => FieldSpec {
                name: "age",
                label: "Age (years)",
                kind: FieldKind::Numeric(1..=120),
                placeholder: "e.g., 45",
            },
            Field::Gender => FieldSpec {
                name: "gender",
                label: "Gender",
                kind: FieldKind::Choice(
                    Gender::ALL
                        .iter()
                        .map(|g| (g.as_str(), gender_label(*g)))
                        .collect(),
                ),
                placeholder: "Select Gender",
            },
            Field::BloodPressureSystolic => FieldSpec {
                name: "bloodPressureSystolic",
                label: "Blood Pressure - Systolic (mmHg)",
                kind: FieldKind::Numeric(70..=200),
                placeholder: "e.g., 120",
            },
            Field::BloodPressureDiastolic => FieldSpec {
                name: "bloodPressureDiastolic",
                label: "Blood Pressure - Diastolic (mmHg)",
                kind: FieldKind::Numeric(40..=130),
                placeholder: "e.g., 80",
            },
            Field::Cholesterol => FieldSpec {
                name: "cholesterol",
                label: "Cholesterol (mg/dL)",
                kind: FieldKind::Numeric(100..=400),
                placeholder: "e.g., 200",
            },
            Field::EcgResult => FieldSpec {
                name: "ecgResult",
                label: "ECG Result",
                kind: FieldKind::Choice(
                    EcgResult::ALL
                        .iter()
                        .map(|e| (e.as_str(), ecg_label(*e)))
                        .collect(),
                ),
                placeholder: "Select ECG Result",
            },
            Field::HeartRate => FieldSpec {
                name: "heartRate",
                label: "Heart Rate (bpm)",
                kind: FieldKind::Numeric(40..=200),
                placeholder: "e.g., 72",
            },
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.spec().name == name)
    }
}

fn gender_label(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "Male",
        Gender::Female => "Female",
        Gender::Other => "Other",
    }
}

fn ecg_label(ecg: EcgResult) -> &'static str {
    match ecg {
        EcgResult::Normal => "Normal",
        EcgResult::Abnormal => "Abnormal",
        EcgResult::StTAbnormality => "ST-T Abnormality",
        EcgResult::LeftVentricularHypertrophy => "Left Ventricular Hypertrophy",
    }
}

/// The current value of `field` in `record`, as the input widget would show it.
/// Zero numerics display as empty.
pub fn display_value(record: &PatientRecord, field: Field) -> String {
    let numeric = |value: u16| {
        if value == 0 {
            String::new()
        } else {
            value.to_string()
        }
    };

    match field {
        Field::Age => numeric(record.age),
        Field::Gender => record.gender.clone(),
        Field::BloodPressureSystolic => numeric(record.blood_pressure_systolic),
        Field::BloodPressureDiastolic => numeric(record.blood_pressure_diastolic),
        Field::Cholesterol => numeric(record.cholesterol),
        Field::EcgResult => record.ecg_result.clone(),
        Field::HeartRate => numeric(record.heart_rate),
    }
}

pub fn check_field(record: &PatientRecord, field: Field) -> Option<ConstraintViolation> {
    let spec = field.spec();
    let reason = match &spec.kind {
        FieldKind::Numeric(range) => {
            let value = numeric_value(record, field);
            if value == 0 {
                Some(format!("{} is required", spec.label))
            } else if !range.contains(&value) {
                Some(format!(
                    "{} must be between {} and {}",
                    spec.label,
                    range.start(),
                    range.end()
                ))
            } else {
                None
            }
        }
        FieldKind::Choice(options) => {
            let raw = display_value(record, field);
            if raw.is_empty() {
                Some(format!("{} is required", spec.label))
            } else if !options.iter().any(|(value, _)| *value == raw) {
                Some(format!("{} has no option '{}'", spec.label, raw))
            } else {
                None
            }
        }
    };

    reason.map(|reason| ConstraintViolation { field, reason })
}

/// Every constraint the record currently breaks, in field order.
pub fn violations(record: &PatientRecord) -> Vec<ConstraintViolation> {
    Field::ALL
        .into_iter()
        .filter_map(|field| check_field(record, field))
        .collect()
}

pub(crate) fn numeric_value(record: &PatientRecord, field: Field) -> u16 {
    match field {
        Field::Age => record.age,
        Field::BloodPressureSystolic => record.blood_pressure_systolic,
        Field::BloodPressureDiastolic => record.blood_pressure_diastolic,
        Field::Cholesterol => record.cholesterol,
        Field::HeartRate => record.heart_rate,
        Field::Gender | Field::EcgResult => 0,
    }
}
