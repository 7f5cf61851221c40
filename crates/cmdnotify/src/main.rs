mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "cmdnotify",
    version,
    about = "Run a notification command under a deadline-enforcing helper"
)]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    // When re-executed as the notification helper this serves the
    // request loop and exits; it must run before argument parsing
    // because the helper is launched with no arguments.
    cmdnotify::run_helper_if_requested();

    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    match cmd::run(cli.command, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_send_subcommand() {
        let cli = Cli::try_parse_from([
            "cmdnotify",
            "send",
            "--command",
            "/usr/bin/notify-send",
            "--timeout",
            "5s",
            "--severity",
            "warning",
            "disk almost full",
        ])
        .expect("send args should parse");

        assert!(matches!(cli.command, Command::Send(_)));
    }

    #[test]
    fn parses_serve_subcommand() {
        let cli = Cli::try_parse_from([
            "cmdnotify",
            "serve",
            "--command",
            "/bin/true",
            "--timeout",
            "10s",
        ])
        .expect("serve args should parse");

        assert!(matches!(cli.command, Command::Serve(_)));
    }

    #[test]
    fn rejects_unknown_severity() {
        let err = Cli::try_parse_from([
            "cmdnotify",
            "send",
            "--command",
            "/bin/true",
            "--severity",
            "urgent",
            "message",
        ])
        .expect_err("unknown severity should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parses_doctor_subcommand() {
        let cli = Cli::try_parse_from(["cmdnotify", "doctor", "/bin/true"])
            .expect("doctor args should parse");
        assert!(matches!(cli.command, Command::Doctor(_)));
    }
}
