/// Errors that can occur while moving bytes over a channel.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// An I/O error occurred on the underlying descriptor.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the channel before the transfer completed.
    #[error("peer closed channel after {transferred} of {expected} bytes")]
    Closed { transferred: usize, expected: usize },
}

impl ChannelError {
    /// True when the peer closed at a frame boundary (no bytes moved).
    ///
    /// A close mid-transfer leaves the streams desynchronized; a close
    /// before the first byte of a frame is an orderly shutdown.
    pub fn is_clean_eof(&self) -> bool {
        matches!(self, ChannelError::Closed { transferred: 0, .. })
    }
}

pub type Result<T> = std::result::Result<T, ChannelError>;
