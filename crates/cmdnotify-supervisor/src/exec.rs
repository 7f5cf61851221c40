use std::io;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use cmdnotify_proto::{ExecResult, ExitDisposition, Request};
use tracing::{debug, warn};

use crate::config::SupervisorConfig;

/// Severity name exported to the grandchild.
pub const SEVERITY_ENV: &str = "CMDNOTIFY_SEVERITY";
/// Numeric severity code exported to the grandchild.
pub const SEVERITY_CODE_ENV: &str = "CMDNOTIFY_SEVERITY_CODE";
/// Error code exported to the grandchild.
pub const ERRCODE_ENV: &str = "CMDNOTIFY_ERRCODE";

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Run the configured command once for `request`, bounded by the
/// configured timeout.
///
/// The grandchild receives the message text as its final argument and
/// the severity/error context through `CMDNOTIFY_*` environment
/// variables. Its stdin and stdout are null — the helper's own stdout
/// is the result channel and must stay private — while stderr is
/// inherited so the command can reach the operator.
///
/// Never returns a zombie: every path reaps the grandchild.
pub fn run_command(config: &SupervisorConfig, request: &Request) -> ExecResult {
    let mut child = match Command::new(&config.command)
        .args(&config.args)
        .arg(&request.message)
        .env(SEVERITY_ENV, request.severity.as_str())
        .env(SEVERITY_CODE_ENV, request.severity.code().to_string())
        .env(ERRCODE_ENV, request.errcode.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .spawn()
    {
        Ok(child) => child,
        Err(err) => {
            warn!(
                command = %config.command.display(),
                error = %err,
                "failed to spawn notification command"
            );
            return ExecResult::not_run();
        }
    };

    let deadline = Instant::now() + config.timeout;
    match wait_until(&mut child, deadline) {
        Ok(Some(status)) => {
            let disposition = ExitDisposition::from_status(status);
            debug!(%disposition, "notification command finished");
            ExecResult::finished(disposition)
        }
        Ok(None) => {
            warn!(
                command = %config.command.display(),
                timeout = ?config.timeout,
                "notification command exceeded deadline"
            );
            terminate(child, config.kill_grace)
        }
        Err(err) => {
            warn!(error = %err, "wait on notification command failed");
            let _ = child.kill();
            let _ = child.wait();
            ExecResult::not_run()
        }
    }
}

/// Poll the grandchild until it exits or the deadline passes.
fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(WAIT_POLL_INTERVAL.min(deadline - now));
    }
}

/// Deadline path: SIGTERM, a grace period, SIGKILL if still alive,
/// then reap. The captured status is whatever `wait` reports after the
/// forced termination.
fn terminate(mut child: Child, grace: Duration) -> ExecResult {
    send_sigterm(&child);

    let grace_deadline = Instant::now() + grace;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                return ExecResult::after_timeout(ExitDisposition::from_status(status));
            }
            Ok(None) => {
                if Instant::now() >= grace_deadline {
                    break;
                }
                thread::sleep(WAIT_POLL_INTERVAL);
            }
            Err(_) => break,
        }
    }

    let _ = child.kill();
    match child.wait() {
        Ok(status) => ExecResult::after_timeout(ExitDisposition::from_status(status)),
        Err(err) => {
            warn!(error = %err, "failed to reap terminated command");
            ExecResult::not_run()
        }
    }
}

fn send_sigterm(child: &Child) {
    let pid = child.id() as libc::pid_t;
    // SAFETY: `pid` names a child this process spawned and has not yet
    // reaped, so it cannot alias an unrelated process.
    unsafe {
        libc::kill(pid, libc::SIGTERM);
    }
}
