use std::io::{ErrorKind, Write};

use crate::error::{ChannelError, Result};

/// Writes exact-length buffers to any `Write` stream.
pub struct ChannelWriter<T> {
    inner: T,
}

impl<T: Write> ChannelWriter<T> {
    /// Create a new channel writer.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Write all of `buf` and flush (blocking).
    ///
    /// Retries short writes, `Interrupted`, and `WouldBlock`; a write
    /// returning zero means the peer closed the channel.
    pub fn write_exact(&mut self, buf: &[u8]) -> Result<()> {
        let expected = buf.len();
        let mut offset = 0usize;
        while offset < expected {
            match self.inner.write(&buf[offset..]) {
                Ok(0) => {
                    return Err(ChannelError::Closed {
                        transferred: offset,
                        expected,
                    })
                }
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(ChannelError::Io(err)),
            }
        }
        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(ChannelError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn writes_full_buffer() {
        let mut writer = ChannelWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.write_exact(b"hello").unwrap();
        assert_eq!(writer.into_inner().into_inner(), b"hello");
    }

    #[test]
    fn sequential_writes_concatenate() {
        let mut writer = ChannelWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.write_exact(b"header").unwrap();
        writer.write_exact(b"payload").unwrap();
        assert_eq!(writer.into_inner().into_inner(), b"headerpayload");
    }

    #[test]
    fn short_writes_are_retried() {
        let mut writer = ChannelWriter::new(OneBytePerWrite { data: Vec::new() });
        writer.write_exact(b"drip").unwrap();
        assert_eq!(writer.into_inner().data, b"drip");
    }

    #[test]
    fn zero_write_reports_closed() {
        struct ZeroWriter;
        impl Write for ZeroWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = ChannelWriter::new(ZeroWriter);
        let err = writer.write_exact(b"x").unwrap_err();
        assert!(matches!(
            err,
            ChannelError::Closed {
                transferred: 0,
                expected: 1
            }
        ));
    }

    #[test]
    fn handles_interrupted_write_and_flush() {
        let writer_impl = InterruptedWriteThenFlush {
            wrote_once: false,
            flush_interrupted: false,
            data: Vec::new(),
        };
        let mut writer = ChannelWriter::new(writer_impl);
        writer.write_exact(b"retry").unwrap();
        assert_eq!(writer.into_inner().data, b"retry");
    }

    #[test]
    fn handles_would_block_write() {
        let writer_impl = WouldBlockThenWrite {
            blocked_once: false,
            data: Vec::new(),
        };
        let mut writer = ChannelWriter::new(writer_impl);
        writer.write_exact(b"retry").unwrap();
        assert_eq!(writer.into_inner().data, b"retry");
    }

    #[test]
    fn io_error_propagates() {
        struct BrokenWriter;
        impl Write for BrokenWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(ErrorKind::BrokenPipe))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = ChannelWriter::new(BrokenWriter);
        let err = writer.write_exact(b"x").unwrap_err();
        assert!(matches!(err, ChannelError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut writer = ChannelWriter::new(Cursor::new(Vec::<u8>::new()));
        let _ = writer.get_ref();
        let _ = writer.get_mut();
        let _inner = writer.into_inner();
    }

    struct OneBytePerWrite {
        data: Vec<u8>,
    }

    impl Write for OneBytePerWrite {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if buf.is_empty() {
                return Ok(0);
            }
            self.data.push(buf[0]);
            Ok(1)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct InterruptedWriteThenFlush {
        wrote_once: bool,
        flush_interrupted: bool,
        data: Vec<u8>,
    }

    impl Write for InterruptedWriteThenFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.wrote_once {
                self.wrote_once = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            if !self.flush_interrupted {
                self.flush_interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            Ok(())
        }
    }

    struct WouldBlockThenWrite {
        blocked_once: bool,
        data: Vec<u8>,
    }

    impl Write for WouldBlockThenWrite {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.blocked_once {
                self.blocked_once = true;
                return Err(std::io::Error::from(ErrorKind::WouldBlock));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
