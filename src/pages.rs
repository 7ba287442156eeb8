use std::io::{self, Write};

use colored::Colorize;

use crate::fields::{self, Field, FieldKind};
use crate::models::PatientRecord;

const KEY_FEATURES: [(&str, &str); 4] = [
    ("No sensors / No wearables", "Software-only solution"),
    ("No IoT hardware required", "Cost-effective and scalable"),
    ("Historical data analysis", "Utilizing past patient records"),
    ("Deep learning models", "Advanced risk prediction algorithms"),
];

const WHY_SOFTWARE: [&str; 4] = [
    "Eliminating hardware costs and dependencies",
    "Leveraging existing historical medical records",
    "Providing scalable risk assessment for large populations",
    "Offering decision support for healthcare professionals",
];

const TARGET_USERS: [&str; 3] = ["Doctors", "Medical Analysts", "Researchers"];

pub const INTAKE_NOTE: &str = "This system analyzes historical medical data using deep learning \
models to predict health risks. No real-time sensors or IoT devices are required.";

pub fn write_landing<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        "Software-Based Patient Monitoring System".bold().blue()
    )?;
    writeln!(out, "{}", "Using Deep Learning".bold())?;
    writeln!(
        out,
        "A modern approach to healthcare monitoring that leverages historical medical data \
         and deep learning algorithms to predict patient health risks and provide early warnings."
    )?;
    writeln!(out)?;

    writeln!(out, "{}", "Key Features".bold())?;
    for (title, detail) in KEY_FEATURES {
        writeln!(out, "  • {}: {}", title.bold(), detail)?;
    }
    writeln!(out)?;

    writeln!(out, "{}", "Why Software-Based Monitoring?".bold())?;
    writeln!(
        out,
        "Traditional healthcare monitoring systems rely heavily on physical sensors and IoT \
         hardware, which are expensive, require maintenance, and limit scalability. Our system \
         addresses these challenges by:"
    )?;
    for line in WHY_SOFTWARE {
        writeln!(out, "  • {line}")?;
    }
    writeln!(out)?;

    writeln!(out, "{} {}", "Target Users:".bold(), TARGET_USERS.join(", "))?;
    writeln!(out)
}

pub fn write_intake_header<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "Patient Data Input".bold())?;
    writeln!(out, "Enter historical medical data for risk assessment")?;
    writeln!(out)
}

/// One prompt line for `field`: label, accepted values, current value.
pub fn field_prompt(record: &PatientRecord, field: Field) -> String {
    let spec = field.spec();
    let accepted = match &spec.kind {
        FieldKind::Numeric(range) => {
            format!("{}-{}, {}", range.start(), range.end(), spec.placeholder)
        }
        FieldKind::Choice(options) => options
            .iter()
            .enumerate()
            .map(|(i, (_, label))| format!("{}) {}", i + 1, label))
            .collect::<Vec<_>>()
            .join("  "),
    };
    let current = fields::display_value(record, field);
    if current.is_empty() {
        format!("{} [{}]: ", spec.label, accepted)
    } else {
        format!("{} [{}] ({}): ", spec.label, accepted, current)
    }
}

/// The draft as the form currently shows it, with fields that still break
/// their constraint marked.
pub fn write_draft<W: Write>(out: &mut W, record: &PatientRecord) -> io::Result<()> {
    for (index, field) in Field::ALL.into_iter().enumerate() {
        let value = fields::display_value(record, field);
        let marker = if fields::check_field(record, field).is_some() {
            "!".red().to_string()
        } else {
            " ".to_string()
        };
        writeln!(
            out,
            " {}{}. {:<34} {}",
            marker,
            index + 1,
            field.spec().label,
            value
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{} {}", "Note:".bold(), INTAKE_NOTE)
}
