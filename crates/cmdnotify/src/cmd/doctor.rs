use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::cmd::{parse_duration, DoctorArgs};
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::OutputFormat;

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Warn,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    schema_id: &'static str,
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(args: DoctorArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;

    let checks = vec![
        command_exists_check(&args.command),
        command_is_file_check(&args.command),
        command_is_executable_check(&args.command),
        timeout_check(timeout),
    ];

    let has_fail = checks.iter().any(|c| matches!(c.status, CheckStatus::Fail));
    let overall = if has_fail { "fail" } else { "pass" };

    let output = DoctorOutput {
        schema_id: "https://schemas.cmdnotify.dev/cli/v1/doctor-report.schema.json",
        checks,
        overall,
    };

    print_doctor(&output, format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

fn command_exists_check(command: &Path) -> CheckResult {
    let (status, detail) = if command.exists() {
        (CheckStatus::Pass, format!("{} exists", command.display()))
    } else {
        (
            CheckStatus::Fail,
            format!("{} does not exist", command.display()),
        )
    };
    CheckResult {
        name: "command_exists".to_string(),
        status,
        detail,
    }
}

fn command_is_file_check(command: &Path) -> CheckResult {
    let (status, detail) = match std::fs::metadata(command) {
        Ok(metadata) if metadata.is_file() => (CheckStatus::Pass, "regular file".to_string()),
        Ok(_) => (CheckStatus::Fail, "not a regular file".to_string()),
        Err(err) => (CheckStatus::Fail, format!("cannot stat: {err}")),
    };
    CheckResult {
        name: "command_is_file".to_string(),
        status,
        detail,
    }
}

fn command_is_executable_check(command: &Path) -> CheckResult {
    let (status, detail) = match std::fs::metadata(command) {
        Ok(metadata) if metadata.permissions().mode() & 0o111 != 0 => {
            (CheckStatus::Pass, "executable bit set".to_string())
        }
        Ok(_) => (CheckStatus::Fail, "no executable bit".to_string()),
        Err(err) => (CheckStatus::Fail, format!("cannot stat: {err}")),
    };
    CheckResult {
        name: "command_is_executable".to_string(),
        status,
        detail,
    }
}

fn timeout_check(timeout: Duration) -> CheckResult {
    // A notifier that can stall its caller for minutes defeats the
    // point of the deadline.
    let (status, detail) = if timeout > Duration::from_secs(300) {
        (
            CheckStatus::Warn,
            format!("{timeout:?} is unusually long for a notification deadline"),
        )
    } else {
        (CheckStatus::Pass, format!("{timeout:?}"))
    };
    CheckResult {
        name: "timeout".to_string(),
        status,
        detail,
    }
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Text => {
            println!("cmdnotify doctor\n");
            for c in &output.checks {
                println!(
                    "  [{:>4}] {:<24} {}",
                    status_text(c.status),
                    c.name,
                    c.detail
                );
            }
            if output.overall == "pass" {
                println!("\n  Result: all checks passed");
            } else {
                println!("\n  Result: one or more checks failed");
            }
        }
    }
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "pass",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Warn => "warn",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_shell_passes_checks() {
        let sh = Path::new("/bin/sh");
        assert!(matches!(
            command_exists_check(sh).status,
            CheckStatus::Pass
        ));
        assert!(matches!(
            command_is_executable_check(sh).status,
            CheckStatus::Pass
        ));
    }

    #[test]
    fn missing_command_fails_checks() {
        let missing = Path::new("/nonexistent/cmdnotify-doctor-test");
        assert!(matches!(
            command_exists_check(missing).status,
            CheckStatus::Fail
        ));
        assert!(matches!(
            command_is_file_check(missing).status,
            CheckStatus::Fail
        ));
    }

    #[test]
    fn very_long_timeout_warns() {
        assert!(matches!(
            timeout_check(Duration::from_secs(600)).status,
            CheckStatus::Warn
        ));
        assert!(matches!(
            timeout_check(Duration::from_secs(10)).status,
            CheckStatus::Pass
        ));
    }
}
