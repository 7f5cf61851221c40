use std::io::{ErrorKind, Read};

use crate::error::{ChannelError, Result};

/// Reads exact-length buffers from any `Read` stream.
///
/// Handles partial reads internally — callers always get the full
/// buffer or an error, never a silent truncation.
pub struct ChannelReader<T> {
    inner: T,
}

impl<T: Read> ChannelReader<T> {
    /// Create a new channel reader.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Fill `buf` completely (blocking).
    ///
    /// Returns `Err(ChannelError::Closed)` if EOF arrives first. The
    /// error records how many bytes had already been read, so a close
    /// at a frame boundary can be told apart from a mid-frame desync.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let expected = buf.len();
        let mut filled = 0usize;
        while filled < expected {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(ChannelError::Closed {
                        transferred: filled,
                        expected,
                    })
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ChannelError::Io(err)),
            }
        }
        Ok(())
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
