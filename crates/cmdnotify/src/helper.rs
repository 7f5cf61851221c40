use std::process;

use cmdnotify_supervisor::{serve_stdio, SupervisorConfig};
use tracing::error;

/// Helper-process entry hook.
///
/// Host binaries call this first thing in `main`. When the spawn
/// environment variable is present this process was launched by
/// [`Notifier::spawn`] to be the notification helper: the call runs
/// the serve loop over stdin/stdout and exits without returning.
/// Otherwise it is a no-op.
///
/// Must run before any argument parsing — the helper is launched with
/// no arguments and must not trip over the host's CLI surface.
///
/// [`Notifier::spawn`]: crate::Notifier::spawn
pub fn run_helper_if_requested() {
    let Some(config) = SupervisorConfig::from_env() else {
        return;
    };

    // This process is a helper. stdin/stdout carry the protocol, so
    // stderr is the only stream logs may use.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::level_filters::LevelFilter::INFO)
        .with_ansi(false)
        .with_target(false)
        .try_init();

    let config = match config {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid helper configuration");
            process::exit(1);
        }
    };

    match serve_stdio(&config) {
        Ok(()) => process::exit(0),
        Err(err) => {
            error!(error = %err, "notification helper terminated");
            process::exit(1);
        }
    }
}
