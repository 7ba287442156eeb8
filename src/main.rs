use std::io;
use std::sync::Arc;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;

mod client;
mod config;
mod fields;
mod form;
mod models;
mod navigation;
mod pages;
mod render;

use client::{HttpPredictionClient, PredictionService};
use config::ClientConfig;
use fields::Field;
use form::{IntakeForm, BUSY_LABEL};
use models::{EcgResult, Gender};
use navigation::{Route, Shell};

#[derive(Parser)]
#[command(name = "cardio-risk")]
#[command(about = "Patient health-risk questionnaire backed by a remote prediction service", long_about = None)]
struct Cli {
    /// Base URL of the prediction service
    #[arg(long, global = true, env = "PREDICTION_SERVICE_URL", default_value = config::DEFAULT_SERVICE_URL)]
    service_url: String,
    /// Give up on the prediction service after this many seconds
    #[arg(long, global = true, env = "PREDICTION_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,
    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session on the landing screen
    Start,
    /// Start an interactive session on a route (/, /input or /result)
    Open { path: String },
    /// Assess one patient from command-line answers
    Assess {
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..=120))]
        age: u16,
        #[arg(long, value_enum)]
        gender: Gender,
        /// Systolic blood pressure (mmHg)
        #[arg(long, value_parser = clap::value_parser!(u16).range(70..=200))]
        systolic: u16,
        /// Diastolic blood pressure (mmHg)
        #[arg(long, value_parser = clap::value_parser!(u16).range(40..=130))]
        diastolic: u16,
        /// Cholesterol (mg/dL)
        #[arg(long, value_parser = clap::value_parser!(u16).range(100..=400))]
        cholesterol: u16,
        #[arg(long, value_enum)]
        ecg: EcgResult,
        /// Heart rate (bpm)
        #[arg(long, value_parser = clap::value_parser!(u16).range(40..=200))]
        heart_rate: u16,
        /// Print the result payload as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that the prediction service is up
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = ClientConfig::new(&cli.service_url, cli.timeout_secs);
    let client = HttpPredictionClient::new(&config)
        .with_context(|| format!("cannot use prediction service at {}", config.base_url))?;
    let service: Arc<dyn PredictionService> = Arc::new(client);

    match cli.command.unwrap_or(Commands::Start) {
        Commands::Start => run_shell(service, Route::Landing).await?,
        Commands::Open { path } => {
            let route = Route::resolve(&path, None)?;
            run_shell(service, route).await?;
        }
        Commands::Assess {
            age,
            gender,
            systolic,
            diastolic,
            cholesterol,
            ecg,
            heart_rate,
            json,
        } => {
            let mut form = IntakeForm::new(service);
            let answers = [
                (Field::Age, age.to_string()),
                (Field::Gender, gender.as_str().to_string()),
                (Field::BloodPressureSystolic, systolic.to_string()),
                (Field::BloodPressureDiastolic, diastolic.to_string()),
                (Field::Cholesterol, cholesterol.to_string()),
                (Field::EcgResult, ecg.as_str().to_string()),
                (Field::HeartRate, heart_rate.to_string()),
            ];
            for (field, raw) in answers {
                form.update_field(field, &raw)?;
            }

            eprintln!("{BUSY_LABEL}");
            let payload = form.submit().await.context("risk assessment failed")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                render::render(&payload).write_to(&mut io::stdout().lock())?;
            }
        }
        Commands::Health => {
            let health = service.health().await.with_context(|| {
                format!("prediction service at {} is not reachable", config.base_url)
            })?;
            println!("{}: {}", health.status.green().bold(), health.message);
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

async fn run_shell(service: Arc<dyn PredictionService>, start: Route) -> anyhow::Result<()> {
    let mut shell = Shell::new(service, io::stdin().lock(), io::stdout());
    shell.run(start).await.context("terminal session failed")
}
