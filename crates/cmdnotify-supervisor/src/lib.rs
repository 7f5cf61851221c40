//! The notification helper process.
//!
//! A helper runs one loop for its whole life: read a request frame
//! from the caller, spawn a grandchild to exec the configured command,
//! wait for it under a deadline, kill and reap it if the deadline
//! fires, and write a result frame back. The loop ends only when the
//! request channel closes (the caller is gone) or the stream
//! desynchronizes; a single failed notification never ends it.
//!
//! [`serve`] is generic over the stream halves so the same loop runs
//! over real pipes in production and over a socketpair in tests.

pub mod config;
pub mod error;
pub mod exec;
pub mod serve;

pub use config::{SupervisorConfig, CONFIG_ENV};
pub use error::ServeError;
pub use exec::{run_command, ERRCODE_ENV, SEVERITY_CODE_ENV, SEVERITY_ENV};
pub use serve::{serve, serve_stdio};
