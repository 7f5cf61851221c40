use std::env;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};
use std::time::Duration;

use cmdnotify_proto::{Client, ClientContext, NotifyError, Severity};
use cmdnotify_supervisor::{SupervisorConfig, CONFIG_ENV};
use tracing::debug;

/// Errors launching the helper process.
#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    /// The helper program image could not be determined.
    #[error("could not determine helper program: {0}")]
    HelperProgram(#[source] io::Error),

    /// The helper configuration could not be serialized for handoff.
    #[error("could not serialize helper config: {0}")]
    Config(#[from] serde_json::Error),

    /// The helper process could not be started.
    #[error("could not spawn helper process: {0}")]
    Spawn(#[source] io::Error),
}

/// Configuration for a [`Notifier`].
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    supervisor: SupervisorConfig,
    node: String,
    helper: Option<PathBuf>,
}

impl NotifierConfig {
    /// Notify by running `command` with the given per-event deadline.
    pub fn new(command: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            supervisor: SupervisorConfig::new(command, timeout),
            node: default_node(),
            helper: None,
        }
    }

    /// Leading arguments passed to the command before the message.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supervisor = self.supervisor.with_args(args);
        self
    }

    /// Override the SIGTERM-to-SIGKILL grace period.
    pub fn with_kill_grace(mut self, grace: Duration) -> Self {
        self.supervisor = self.supervisor.with_kill_grace(grace);
        self
    }

    /// Label identifying this host in diagnostics.
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = node.into();
        self
    }

    /// Use an explicit helper program instead of re-executing the
    /// current binary.
    pub fn with_helper_program(mut self, helper: impl Into<PathBuf>) -> Self {
        self.helper = Some(helper.into());
        self
    }
}

fn default_node() -> String {
    env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string())
}

/// Front door for bounded-time command notifications.
///
/// Owns one helper process and the pipe pair connecting to it. Every
/// entry point takes `&mut self`, which is what keeps the wire
/// protocol to one outstanding request.
pub struct Notifier {
    // Present from spawn until shutdown/drop; dropping it closes both
    // pipe halves, which is the helper's signal to exit.
    client: Option<Client<ChildStdout, ChildStdin>>,
    helper: Child,
}

impl Notifier {
    /// Launch the helper process and connect to it.
    ///
    /// The helper image (the configured override, or the current
    /// executable) must call [`run_helper_if_requested`] before
    /// anything else in `main`.
    ///
    /// [`run_helper_if_requested`]: crate::run_helper_if_requested
    pub fn spawn(config: NotifierConfig) -> Result<Self, SpawnError> {
        let program = match config.helper {
            Some(path) => path,
            None => env::current_exe().map_err(SpawnError::HelperProgram)?,
        };
        let ctx = ClientContext {
            node: config.node,
            command: config.supervisor.command.display().to_string(),
            timeout: config.supervisor.timeout,
        };

        let mut helper = Command::new(&program)
            .env(CONFIG_ENV, config.supervisor.to_env_value()?)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(SpawnError::Spawn)?;
        debug!(
            helper = %program.display(),
            pid = helper.id(),
            command = %ctx.command,
            "notification helper started"
        );

        let (Some(stdin), Some(stdout)) = (helper.stdin.take(), helper.stdout.take()) else {
            let _ = helper.kill();
            let _ = helper.wait();
            return Err(SpawnError::Spawn(io::Error::other(
                "helper stdio was not piped",
            )));
        };

        Ok(Self {
            client: Some(Client::new(stdout, stdin, ctx)),
            helper,
        })
    }

    /// Send a formatted log message.
    pub fn log(
        &mut self,
        severity: Severity,
        errcode: i32,
        message: fmt::Arguments<'_>,
    ) -> Result<(), NotifyError> {
        let text = message.to_string();
        self.client_mut().execute(severity, errcode, &text)
    }

    /// Send rendered help text, labelled with its topic.
    pub fn help(
        &mut self,
        severity: Severity,
        errcode: i32,
        topic: &str,
        text: fmt::Arguments<'_>,
    ) -> Result<(), NotifyError> {
        let text = format!("[{topic}] {text}");
        self.client_mut().execute(severity, errcode, &text)
    }

    /// Send a peer-failure message annotated with the peer's identity.
    ///
    /// The peer label is expected to come pre-formatted from the
    /// runtime's naming facilities.
    pub fn peer(
        &mut self,
        severity: Severity,
        errcode: i32,
        peer: &str,
        message: fmt::Arguments<'_>,
    ) -> Result<(), NotifyError> {
        let text = format!("peer {peer}: {message}");
        self.client_mut().execute(severity, errcode, &text)
    }

    /// Diagnostic context (node, command, timeout) for this notifier.
    pub fn context(&self) -> Option<&ClientContext> {
        self.client.as_ref().map(Client::context)
    }

    /// Close the request channel and wait for the helper to exit.
    pub fn shutdown(mut self) -> io::Result<ExitStatus> {
        self.client.take();
        self.helper.wait()
    }

    fn client_mut(&mut self) -> &mut Client<ChildStdout, ChildStdin> {
        // Only shutdown/drop take the client, and both consume self.
        self.client.as_mut().expect("notifier client already taken")
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        self.client = None;
        // The helper exits once its request channel reads EOF; waiting
        // here reaps it. The status is cached, so a drop after an
        // explicit shutdown does not block.
        if let Err(err) = self.helper.wait() {
            debug!(error = %err, "failed to reap notification helper");
        }
    }
}
