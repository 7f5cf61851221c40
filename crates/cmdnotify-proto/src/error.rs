use std::time::Duration;

use cmdnotify_channel::ChannelError;

use crate::codec::ExitDisposition;

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame does not start with the expected magic bytes.
    #[error("invalid frame magic")]
    InvalidMagic,

    /// The request carries an operation tag this build does not know.
    #[error("unknown request op 0x{0:02x}")]
    UnknownOp(u8),

    /// The severity byte is outside the defined range.
    #[error("unknown severity code {0}")]
    UnknownSeverity(u8),

    /// The result frame carries an unknown disposition tag.
    #[error("unknown disposition tag {0}")]
    UnknownDisposition(u8),

    /// The message exceeds the protocol maximum.
    #[error("message too large ({size} bytes, max {max})")]
    MessageTooLarge { size: usize, max: usize },

    /// The message text contains an interior NUL byte.
    #[error("message contains an interior NUL byte")]
    EmbeddedNul,

    /// The payload does not end with the mandatory NUL terminator.
    #[error("payload missing NUL terminator")]
    MissingTerminator,

    /// The message text is not valid UTF-8.
    #[error("message is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Fewer bytes than a complete frame requires.
    #[error("frame truncated ({len} bytes, expected {expected})")]
    Truncated { len: usize, expected: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;

/// Outcome of one notification attempt, as surfaced to the caller.
///
/// Every variant is terminal for the single attempt; nothing here is
/// retried, and none of these conditions are fatal to the host.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Pipe I/O broke during the protocol exchange.
    #[error("{op} failed for notifier helper on {node}: {source}")]
    Channel {
        op: &'static str,
        node: String,
        #[source]
        source: ChannelError,
    },

    /// A malformed frame arrived; the channel is desynchronized.
    #[error("notifier protocol error: {0}")]
    Frame(#[from] FrameError),

    /// The helper could not run the command at all (spawn failure).
    #[error("notifier helper on {node} could not run `{command}` (timeout {timeout:?})")]
    Supervisor {
        node: String,
        command: String,
        timeout: Duration,
    },

    /// The command outlived its deadline and was forcibly terminated.
    #[error(
        "notifier command `{command}` on {node} exceeded {timeout:?} and was terminated ({disposition})"
    )]
    Timeout {
        node: String,
        command: String,
        timeout: Duration,
        disposition: ExitDisposition,
    },

    /// The command ran to completion but reported failure.
    #[error("notifier command `{command}` on {node} failed ({disposition})")]
    CommandFailed {
        node: String,
        command: String,
        disposition: ExitDisposition,
    },
}
