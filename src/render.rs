use std::io::{self, Write};

use colored::{Color, Colorize};

use crate::models::{PatientRecord, PredictionResult, ResultPayload, RiskLevel};

/// Presentation tier for a risk level: text colour, icon and background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTier {
    Green,
    Yellow,
    Red,
    /// Neutral fallback for a level the service should never send.
    Gray,
}

impl RiskTier {
    pub fn for_level(level: &RiskLevel) -> Self {
        match level {
            RiskLevel::Low => RiskTier::Green,
            RiskLevel::Medium => RiskTier::Yellow,
            RiskLevel::High => RiskTier::Red,
            RiskLevel::Unrecognized(_) => RiskTier::Gray,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            RiskTier::Green => Color::Green,
            RiskTier::Yellow => Color::Yellow,
            RiskTier::Red => Color::Red,
            RiskTier::Gray => Color::BrightBlack,
        }
    }

    pub fn background(&self) -> Color {
        match self {
            RiskTier::Green => Color::TrueColor { r: 240, g: 253, b: 244 },
            RiskTier::Yellow => Color::TrueColor { r: 254, g: 252, b: 232 },
            RiskTier::Red => Color::TrueColor { r: 254, g: 242, b: 242 },
            RiskTier::Gray => Color::TrueColor { r: 249, g: 250, b: 251 },
        }
    }

    /// Check mark for low, warning triangle for medium, alert dot otherwise.
    pub fn icon(&self) -> &'static str {
        match self {
            RiskTier::Green => "✔",
            RiskTier::Yellow => "▲",
            RiskTier::Red | RiskTier::Gray => "●",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
}

/// Everything the result screen shows, already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub tier: RiskTier,
    pub headline: String,
    pub confidence: String,
    pub warning: String,
    pub summary: Vec<SummaryRow>,
    pub assessed_at: String,
}

pub fn render(payload: &ResultPayload) -> ResultView {
    let PredictionResult {
        risk_level,
        confidence,
        warning,
    } = &payload.result;

    ResultView {
        tier: RiskTier::for_level(risk_level),
        headline: format!("{} RISK", risk_level.as_str().to_uppercase()),
        confidence: format_confidence(*confidence),
        warning: warning.clone(),
        summary: summarize(&payload.patient_data),
        assessed_at: payload
            .assessed_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string(),
    }
}

pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

/// `st-t-abnormality` becomes `St T Abnormality`.
pub fn display_ecg(raw: &str) -> String {
    raw.replace('-', " ")
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn summarize(patient: &PatientRecord) -> Vec<SummaryRow> {
    vec![
        SummaryRow {
            label: "Age",
            value: format!("{} years", patient.age),
        },
        SummaryRow {
            label: "Gender",
            value: capitalize(&patient.gender),
        },
        SummaryRow {
            label: "Blood Pressure",
            value: format!(
                "{}/{} mmHg",
                patient.blood_pressure_systolic, patient.blood_pressure_diastolic
            ),
        },
        SummaryRow {
            label: "Cholesterol",
            value: format!("{} mg/dL", patient.cholesterol),
        },
        SummaryRow {
            label: "ECG Result",
            value: display_ecg(&patient.ecg_result),
        },
        SummaryRow {
            label: "Heart Rate",
            value: format!("{} bpm", patient.heart_rate),
        },
    ]
}

const ABOUT_ANALYSIS: &str = "This risk assessment is generated using deep learning models trained \
on historical patient data. The system does not rely on real-time sensors, IoT hardware, or \
cloud-based services. It serves as a decision-support tool for healthcare professionals to \
identify potential health risks early and take preventive measures.";

impl ResultView {
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", "Risk Analysis Result".bold())?;
        writeln!(out, "Prediction based on historical data analysis")?;
        writeln!(out)?;

        let band = format!("  {}  {}  ", self.tier.icon(), self.headline);
        writeln!(
            out,
            "{}",
            band.color(self.tier.color())
                .on_color(self.tier.background())
                .bold()
        )?;
        writeln!(out, "  Confidence: {}", self.confidence)?;
        writeln!(out)?;

        writeln!(out, "{}", "Early Warning Message".bold())?;
        writeln!(out, "  {}", self.warning)?;
        writeln!(out)?;

        writeln!(out, "{}", "Patient Data Summary".bold())?;
        for row in &self.summary {
            writeln!(out, "  {:<15} {}", row.label, row.value)?;
        }
        writeln!(out)?;

        writeln!(out, "{}", "About This Analysis".bold())?;
        writeln!(out, "  {}", ABOUT_ANALYSIS.dimmed())?;
        writeln!(out, "  Assessed at {}", self.assessed_at)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::models::fixtures::{prediction, sample_patient};

    fn payload(level: &str, confidence: f64) -> ResultPayload {
        ResultPayload {
            result: PredictionResult {
                warning: "Low risk detected. Continue regular health monitoring.".to_string(),
                ..prediction(level, confidence)
            },
            patient_data: sample_patient(),
            assessed_at: Utc.with_ymd_and_hms(2026, 3, 4, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn low_risk_renders_green_with_percentage() {
        let view = render(&payload("low", 0.82));
        assert_eq!(view.headline, "LOW RISK");
        assert_eq!(view.confidence, "82.0%");
        assert_eq!(
            view.warning,
            "Low risk detected. Continue regular health monitoring."
        );
        assert_eq!(view.tier, RiskTier::Green);
        assert_eq!(view.tier.icon(), "✔");
    }

    #[test]
    fn tiers_follow_levels() {
        assert_eq!(render(&payload("high", 0.5)).tier, RiskTier::Red);
        assert_eq!(render(&payload("medium", 0.5)).tier, RiskTier::Yellow);

        let unknown = render(&payload("unknown", 0.5));
        assert_eq!(unknown.tier, RiskTier::Gray);
        assert_eq!(unknown.headline, "UNKNOWN RISK");
        assert_eq!(unknown.tier.color(), Color::BrightBlack);
        assert_eq!(unknown.tier.icon(), RiskTier::Red.icon());
    }

    #[test]
    fn confidence_keeps_one_decimal() {
        assert_eq!(format_confidence(0.5), "50.0%");
        assert_eq!(format_confidence(0.999), "99.9%");
        assert_eq!(format_confidence(0.0), "0.0%");
        assert_eq!(format_confidence(1.0), "100.0%");
    }

    #[test]
    fn ecg_values_are_title_cased() {
        assert_eq!(display_ecg("st-t-abnormality"), "St T Abnormality");
        assert_eq!(
            display_ecg("left-ventricular-hypertrophy"),
            "Left Ventricular Hypertrophy"
        );
        assert_eq!(display_ecg("normal"), "Normal");
    }

    #[test]
    fn summary_echoes_the_record() {
        let view = render(&payload("low", 0.82));
        let values: Vec<&str> = view.summary.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(
            values,
            vec![
                "45 years",
                "Female",
                "120/80 mmHg",
                "200 mg/dL",
                "St T Abnormality",
                "72 bpm"
            ]
        );
        assert_eq!(view.assessed_at, "2026-03-04 09:30:00 UTC");
    }

    #[test]
    fn text_output_has_every_section() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        render(&payload("low", 0.82)).write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        for needle in [
            "LOW RISK",
            "Confidence: 82.0%",
            "Early Warning Message",
            "Low risk detected. Continue regular health monitoring.",
            "Patient Data Summary",
            "St T Abnormality",
            "About This Analysis",
        ] {
            assert!(text.contains(needle), "missing {needle:?} in {text}");
        }
    }
}
