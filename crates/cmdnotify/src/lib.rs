//! Bounded-time external-command notifications.
//!
//! cmdnotify delivers event notifications (log messages, help alerts,
//! peer-failure reports) by running a user-configured command once per
//! event, while guaranteeing that a hung or misbehaving command never
//! blocks the calling process. A long-lived helper process owns the
//! dangerous part: it execs the command in a grandchild, enforces a
//! deadline, and reports a structured outcome back over framed pipes.
//!
//! # Crate Structure
//!
//! - [`channel`] — exact-length blocking I/O over pipes
//! - [`proto`] — request/result wire protocol and the caller-side client
//! - [`supervisor`] — the helper-process serve loop
//! - [`Notifier`] — the façade the host runtime talks to
//!
//! # Usage
//!
//! The helper is the host binary re-executed, so `main` must offer
//! itself as the helper image before doing anything else:
//!
//! ```no_run
//! use std::time::Duration;
//! use cmdnotify::{Notifier, NotifierConfig, Severity};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Becomes the helper loop (and never returns) when this
//!     // process was spawned by `Notifier::spawn`.
//!     cmdnotify::run_helper_if_requested();
//!
//!     let config = NotifierConfig::new("/usr/local/bin/page-oncall", Duration::from_secs(30));
//!     let mut notifier = Notifier::spawn(config)?;
//!     notifier.log(Severity::Critical, 17, format_args!("raid degraded on /dev/md0"))?;
//!     Ok(())
//! }
//! ```

pub mod helper;
pub mod notifier;

/// Re-export channel types.
pub mod channel {
    pub use cmdnotify_channel::*;
}

/// Re-export protocol types.
pub mod proto {
    pub use cmdnotify_proto::*;
}

/// Re-export supervisor types.
pub mod supervisor {
    pub use cmdnotify_supervisor::*;
}

pub use cmdnotify_proto::{NotifyError, Severity};
pub use helper::run_helper_if_requested;
pub use notifier::{Notifier, NotifierConfig, SpawnError};
