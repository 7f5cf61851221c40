/// Errors that end the helper loop.
///
/// Per-request failures (spawn errors, timeouts, bad exits) are
/// reported in result frames and never raise these; only a broken or
/// desynchronized request channel does.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// The request channel broke outside a frame boundary.
    #[error("request channel failed: {0}")]
    Channel(#[from] cmdnotify_channel::ChannelError),

    /// A malformed frame arrived; the stream cannot be resynchronized.
    #[error("request stream desynchronized: {0}")]
    Frame(#[from] cmdnotify_proto::FrameError),
}

pub type Result<T> = std::result::Result<T, ServeError>;
