use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable carrying the helper's JSON config at spawn.
pub const CONFIG_ENV: &str = "CMDNOTIFY_HELPER_CONFIG";

fn default_kill_grace() -> Duration {
    Duration::from_secs(2)
}

/// Immutable configuration for a helper process.
///
/// Built once by the façade, handed to the helper through
/// [`CONFIG_ENV`], and held unchanged for the helper's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// Program executed once per notification.
    pub command: PathBuf,
    /// Leading arguments; the message text is appended after these.
    #[serde(default)]
    pub args: Vec<String>,
    /// Deadline for one command execution.
    pub timeout: Duration,
    /// Grace period between SIGTERM and SIGKILL on the timeout path.
    #[serde(default = "default_kill_grace")]
    pub kill_grace: Duration,
}

impl SupervisorConfig {
    /// Configuration for `command` with the given deadline.
    pub fn new(command: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            timeout,
            kill_grace: default_kill_grace(),
        }
    }

    /// Set the leading argument template.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Override the SIGTERM-to-SIGKILL grace period.
    pub fn with_kill_grace(mut self, grace: Duration) -> Self {
        self.kill_grace = grace;
        self
    }

    /// Serialize for the spawn handoff.
    pub fn to_env_value(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Read the config the façade placed in this process's environment.
    ///
    /// `None` means the variable is absent and this process is not a
    /// helper.
    pub fn from_env() -> Option<serde_json::Result<Self>> {
        std::env::var(CONFIG_ENV)
            .ok()
            .map(|raw| serde_json::from_str(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_value_round_trip() {
        let config = SupervisorConfig::new("/usr/bin/notify-send", Duration::from_secs(30))
            .with_args(["--urgency", "critical"])
            .with_kill_grace(Duration::from_millis(500));

        let raw = config.to_env_value().unwrap();
        let parsed: SupervisorConfig = serde_json::from_str(&raw).unwrap();

        assert_eq!(parsed.command, PathBuf::from("/usr/bin/notify-send"));
        assert_eq!(parsed.args, vec!["--urgency", "critical"]);
        assert_eq!(parsed.timeout, Duration::from_secs(30));
        assert_eq!(parsed.kill_grace, Duration::from_millis(500));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let parsed: SupervisorConfig =
            serde_json::from_str(r#"{"command":"/bin/true","timeout":{"secs":5,"nanos":0}}"#)
                .unwrap();
        assert!(parsed.args.is_empty());
        assert_eq!(parsed.kill_grace, Duration::from_secs(2));
    }
}
