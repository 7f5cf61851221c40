use std::io::IsTerminal;

use clap::ValueEnum;
use cmdnotify::{NotifyError, Severity};
use serde::Serialize;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Text
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct OutcomeOutput<'a> {
    schema_id: &'a str,
    delivered: bool,
    severity: &'a str,
    errcode: i32,
    detail: String,
}

/// Print the outcome of one `send` invocation to stdout.
pub fn print_outcome(
    severity: Severity,
    errcode: i32,
    result: &Result<(), NotifyError>,
    format: OutputFormat,
) {
    let (delivered, detail) = match result {
        Ok(()) => (true, "delivered".to_string()),
        Err(err) => (false, err.to_string()),
    };

    match format {
        OutputFormat::Json => {
            let out = OutcomeOutput {
                schema_id: "https://schemas.cmdnotify.dev/cli/v1/send-outcome.schema.json",
                delivered,
                severity: severity.as_str(),
                errcode,
                detail,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Text => {
            println!("{detail}");
        }
    }
}
