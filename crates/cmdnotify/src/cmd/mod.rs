use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use cmdnotify::Severity;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod doctor;
pub mod send;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send one notification through a freshly spawned helper.
    Send(SendArgs),
    /// Run the helper loop over stdin/stdout.
    Serve(ServeArgs),
    /// Check that a notification command is runnable.
    Doctor(DoctorArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args, format),
        Command::Serve(args) => serve::run(args),
        Command::Doctor(args) => doctor::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Notification command to execute.
    #[arg(long, value_name = "PATH")]
    pub command: PathBuf,
    /// Leading argument passed before the message (repeatable).
    #[arg(long = "arg", value_name = "ARG", allow_hyphen_values = true)]
    pub args: Vec<String>,
    /// Deadline for the command (e.g. 10s, 500ms).
    #[arg(long, default_value = "10s")]
    pub timeout: String,
    /// Severity attached to the notification.
    #[arg(long, default_value = "notice")]
    pub severity: Severity,
    /// Error code attached to the notification.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub errcode: i32,
    /// Node label used in diagnostics.
    #[arg(long)]
    pub node: Option<String>,
    /// Message text.
    pub message: String,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Notification command to execute per request.
    #[arg(long, value_name = "PATH")]
    pub command: PathBuf,
    /// Leading argument passed before the message (repeatable).
    #[arg(long = "arg", value_name = "ARG", allow_hyphen_values = true)]
    pub args: Vec<String>,
    /// Deadline for each command execution (e.g. 10s, 500ms).
    #[arg(long, default_value = "10s")]
    pub timeout: String,
    /// Grace period between SIGTERM and SIGKILL.
    #[arg(long, default_value = "2s")]
    pub kill_grace: String,
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Notification command to check.
    #[arg(value_name = "PATH")]
    pub command: PathBuf,
    /// Deadline the command would run under.
    #[arg(long, default_value = "10s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}
