use std::fmt;

use cmdnotify::{NotifyError, SpawnError};

// Exit codes follow the sysexits/timeout conventions the rest of the
// tooling expects.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const HEALTH_CHECK_FAILED: i32 = 30;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Exit code for a notification outcome.
pub fn notify_code(err: &NotifyError) -> i32 {
    match err {
        NotifyError::Timeout { .. } => TIMEOUT,
        NotifyError::CommandFailed { .. } | NotifyError::Supervisor { .. } => FAILURE,
        NotifyError::Channel { .. } | NotifyError::Frame(_) => INTERNAL,
    }
}

pub fn spawn_error(err: SpawnError) -> CliError {
    CliError::new(INTERNAL, format!("failed to launch helper: {err}"))
}
