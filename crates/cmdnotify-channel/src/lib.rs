//! Exact-length blocking I/O over unidirectional pipes.
//!
//! Pipes do not guarantee atomic whole-buffer transfer, so every
//! multi-byte field that crosses the helper-process boundary must be
//! moved with an exact-length read or write. [`ChannelReader`] and
//! [`ChannelWriter`] retry short and interrupted transfers internally
//! and report a distinct error when the peer closes mid-frame.
//!
//! A short read is never retried: once the peer is gone the streams
//! cannot resynchronize, and the channel must be abandoned. A close
//! that lands exactly on a frame boundary is recognizable via
//! [`ChannelError::is_clean_eof`] and is how orderly shutdown is
//! signalled.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{ChannelError, Result};
pub use reader::ChannelReader;
pub use writer::ChannelWriter;
