use std::io::{self, BufRead, Write};
use std::sync::Arc;

use colored::Colorize;
use log::debug;

use crate::client::PredictionService;
use crate::fields::{self, Field, FieldKind};
use crate::form::{IntakeForm, BUSY_LABEL};
use crate::models::ResultPayload;
use crate::pages;
use crate::render;

pub const LANDING_PATH: &str = "/";
pub const INTAKE_PATH: &str = "/input";
pub const RESULT_PATH: &str = "/result";

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("no route matches '{0}'")]
    UnknownRoute(String),
}

/// A screen of the client. The result screen owns its payload, so it
/// cannot be entered without one.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Landing,
    Intake,
    Result(Box<ResultPayload>),
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => LANDING_PATH,
            Route::Intake => INTAKE_PATH,
            Route::Result(_) => RESULT_PATH,
        }
    }

    /// Maps a path to a route. The result path without a payload falls back
    /// to the intake screen.
    pub fn resolve(path: &str, payload: Option<ResultPayload>) -> Result<Route, NavigationError> {
        match path {
            LANDING_PATH => Ok(Route::Landing),
            INTAKE_PATH => Ok(Route::Intake),
            RESULT_PATH => match payload {
                Some(payload) => Ok(Route::Result(Box::new(payload))),
                None => {
                    debug!("{} entered without a payload, redirecting to {}", RESULT_PATH, INTAKE_PATH);
                    Ok(Route::Intake)
                }
            },
            other => Err(NavigationError::UnknownRoute(other.to_string())),
        }
    }
}

/// Interactive terminal session that walks the user between routes.
pub struct Shell<R, W> {
    service: Arc<dyn PredictionService>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(service: Arc<dyn PredictionService>, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Runs until the user quits or input ends.
    pub async fn run(&mut self, start: Route) -> io::Result<()> {
        let mut route = start;
        loop {
            debug!("navigating to {}", route.path());
            let next = match route {
                Route::Landing => self.landing()?,
                Route::Intake => self.intake().await?,
                Route::Result(payload) => self.result(&payload)?,
            };
            match next {
                Some(next) => route = next,
                None => break,
            }
        }
        writeln!(self.output, "Goodbye.")?;
        self.output.flush()
    }

    /// Writes `text` and reads one trimmed line. `None` when input is exhausted.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn landing(&mut self) -> io::Result<Option<Route>> {
        pages::write_landing(&mut self.output)?;
        let answer = self.prompt("Press Enter to start patient risk analysis, or q to quit: ")?;
        Ok(match answer.as_deref() {
            None | Some("q") => None,
            Some(_) => Some(Route::Intake),
        })
    }

    async fn intake(&mut self) -> io::Result<Option<Route>> {
        let mut form = IntakeForm::new(self.service.clone());
        pages::write_intake_header(&mut self.output)?;

        for field in Field::ALL {
            if !self.ask_field(&mut form, field)? {
                return Ok(None);
            }
        }

        loop {
            writeln!(self.output)?;
            pages::write_draft(&mut self.output, form.draft())?;
            let submit = if form.can_submit() {
                format!("[s] {}", form.submit_label())
            } else {
                format!("[s] {} (disabled)", form.submit_label())
                    .dimmed()
                    .to_string()
            };
            let menu = format!("{submit}  [e] Edit a field  [h] Back to Home  [q] Quit: ");

            let Some(choice) = self.prompt(&menu)? else {
                return Ok(None);
            };
            match choice.as_str() {
                "s" | "" => {
                    if !form.can_submit() {
                        continue;
                    }
                    writeln!(self.output, "{BUSY_LABEL}")?;
                    self.output.flush()?;
                    match form.submit().await {
                        Ok(payload) => return Ok(Some(Route::Result(Box::new(payload)))),
                        Err(e) => {
                            if let Some(notice) = e.user_notice() {
                                writeln!(self.output, "{} {}", "!".red().bold(), notice.red())?;
                                if self.prompt("Press Enter to continue: ")?.is_none() {
                                    return Ok(None);
                                }
                            }
                        }
                    }
                }
                "e" => {
                    let Some(answer) = self.prompt("Field to edit (1-7): ")? else {
                        return Ok(None);
                    };
                    let picked = answer
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| n.checked_sub(1))
                        .and_then(|i| Field::ALL.get(i).copied())
                        .or_else(|| Field::from_name(&answer));
                    if let Some(field) = picked {
                        if !self.ask_field(&mut form, field)? {
                            return Ok(None);
                        }
                    }
                }
                "h" => return Ok(Some(Route::Landing)),
                "q" => return Ok(None),
                _ => {}
            }
        }
    }

    /// Asks for one field until the answer satisfies its constraint. An empty
    /// answer keeps the current value. Returns `false` when input ends.
    fn ask_field(&mut self, form: &mut IntakeForm, field: Field) -> io::Result<bool> {
        loop {
            let text = pages::field_prompt(form.draft(), field);
            let Some(answer) = self.prompt(&text)? else {
                return Ok(false);
            };
            if answer.is_empty() && !fields::display_value(form.draft(), field).is_empty() {
                return Ok(true);
            }

            let raw = match field.spec().kind {
                FieldKind::Choice(options) => answer
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| options.get(i))
                    .map(|(value, _)| value.to_string())
                    .unwrap_or(answer),
                FieldKind::Numeric(_) => answer,
            };
            if let Err(e) = form.update_field(field, &raw) {
                writeln!(self.output, "  {}", e.to_string().yellow())?;
                continue;
            }
            match fields::check_field(form.draft(), field) {
                Some(violation) => writeln!(self.output, "  {}", violation.reason.yellow())?,
                None => return Ok(true),
            }
        }
    }

    fn result(&mut self, payload: &ResultPayload) -> io::Result<Option<Route>> {
        render::render(payload).write_to(&mut self.output)?;
        writeln!(self.output)?;
        let answer =
            self.prompt("[a] Analyze Another Patient  [h] Back to Home  [q] Quit: ")?;
        Ok(match answer.as_deref() {
            Some("a") | Some("") => Some(Route::Intake),
            Some("h") => Some(Route::Landing),
            _ => None,
        })
    }
}
