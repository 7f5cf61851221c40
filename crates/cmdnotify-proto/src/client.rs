use std::io::{Read, Write};
use std::time::Duration;

use bytes::BytesMut;
use cmdnotify_channel::{ChannelError, ChannelReader, ChannelWriter};

use crate::codec::{self, ExecResult, ExitDisposition, RESULT_FRAME_LEN};
use crate::error::NotifyError;
use crate::severity::Severity;

/// Identifies the caller and the supervised command in diagnostics.
#[derive(Debug, Clone)]
pub struct ClientContext {
    /// Label for the reporting host, supplied by the runtime.
    pub node: String,
    /// The configured command, for operator-facing messages.
    pub command: String,
    /// The helper's deadline for one command execution.
    pub timeout: Duration,
}

/// Caller side of the request/response protocol.
///
/// Owns the write end of the request pipe and the read end of the
/// result pipe. One `execute` call is one full round trip; the
/// `&mut self` receiver is what serializes requests.
pub struct Client<R, W> {
    reader: ChannelReader<R>,
    writer: ChannelWriter<W>,
    ctx: ClientContext,
    scratch: BytesMut,
}

impl<R: Read, W: Write> Client<R, W> {
    /// Create a client over the two pipe halves.
    pub fn new(reader: R, writer: W, ctx: ClientContext) -> Self {
        Self {
            reader: ChannelReader::new(reader),
            writer: ChannelWriter::new(writer),
            ctx,
            scratch: BytesMut::new(),
        }
    }

    /// Diagnostic context this client reports with.
    pub fn context(&self) -> &ClientContext {
        &self.ctx
    }

    /// Send one notification request and block for its result.
    ///
    /// Returns `Ok(())` only when the command ran within its deadline
    /// and exited 0. Every other outcome maps to a [`NotifyError`]
    /// variant carrying the diagnostic fields for that failure class.
    pub fn execute(
        &mut self,
        severity: Severity,
        errcode: i32,
        message: &str,
    ) -> Result<(), NotifyError> {
        self.scratch.clear();
        codec::encode_request(severity, errcode, message, &mut self.scratch)?;
        self.writer
            .write_exact(&self.scratch)
            .map_err(|source| self.channel_fault("send request", source))?;

        let mut result_buf = [0u8; RESULT_FRAME_LEN];
        self.reader
            .read_exact(&mut result_buf)
            .map_err(|source| self.channel_fault("receive result", source))?;

        let result = codec::decode_result(&result_buf)?;
        self.interpret(result)
    }

    fn channel_fault(&self, op: &'static str, source: ChannelError) -> NotifyError {
        NotifyError::Channel {
            op,
            node: self.ctx.node.clone(),
            source,
        }
    }

    fn interpret(&self, result: ExecResult) -> Result<(), NotifyError> {
        if !result.completed {
            return Err(NotifyError::Supervisor {
                node: self.ctx.node.clone(),
                command: self.ctx.command.clone(),
                timeout: self.ctx.timeout,
            });
        }
        if result.timed_out {
            return Err(NotifyError::Timeout {
                node: self.ctx.node.clone(),
                command: self.ctx.command.clone(),
                timeout: self.ctx.timeout,
                disposition: result.disposition,
            });
        }
        match result.disposition {
            ExitDisposition::Exited(0) => Ok(()),
            disposition => Err(NotifyError::CommandFailed {
                node: self.ctx.node.clone(),
                command: self.ctx.command.clone(),
                disposition,
            }),
        }
    }
}
