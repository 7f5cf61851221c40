use std::fmt;

use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};
use crate::severity::Severity;

/// Request header: magic (2) + op (1) + severity (1) + errcode (4) +
/// payload length (4) = 12 bytes.
pub const REQUEST_HEADER_LEN: usize = 12;

/// Result frame: magic (2) + completed (1) + timed-out (1) +
/// disposition kind (1) + code (4) = 9 bytes.
pub const RESULT_FRAME_LEN: usize = 9;

/// Maximum message length in bytes, excluding the terminator: 1 MiB.
pub const MAX_MESSAGE_LEN: usize = 1024 * 1024;

/// Request magic bytes: "cn".
pub const REQUEST_MAGIC: [u8; 2] = [0x63, 0x6E];

/// Result magic bytes: "cr".
pub const RESULT_MAGIC: [u8; 2] = [0x63, 0x72];

/// Operation tag: execute the configured command once.
pub const OP_EXEC: u8 = 0x01;

const DISPOSITION_UNKNOWN: u8 = 0;
const DISPOSITION_EXITED: u8 = 1;
const DISPOSITION_SIGNALED: u8 = 2;

/// A decoded execution request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub severity: Severity,
    pub errcode: i32,
    pub message: String,
}

/// The fixed-size leading portion of a request frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestHeader {
    pub severity: Severity,
    pub errcode: i32,
    pub payload_len: usize,
}

impl RequestHeader {
    /// Bytes of payload that follow this header on the wire: the
    /// message text plus its NUL terminator.
    pub fn wire_payload_len(&self) -> usize {
        self.payload_len + 1
    }
}

/// How a supervised command ended.
///
/// Replaces the raw OS wait-status word so exit-code vs signal
/// interpretation never depends on which supervision branch produced
/// the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDisposition {
    /// Normal exit with the given status code.
    Exited(i32),
    /// Terminated by the given signal.
    Signaled(i32),
    /// No wait status was captured.
    Unknown,
}

impl ExitDisposition {
    /// Derive a disposition from an OS wait status.
    #[cfg(unix)]
    pub fn from_status(status: std::process::ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;

        if let Some(code) = status.code() {
            ExitDisposition::Exited(code)
        } else if let Some(signal) = status.signal() {
            ExitDisposition::Signaled(signal)
        } else {
            ExitDisposition::Unknown
        }
    }
}

impl fmt::Display for ExitDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitDisposition::Exited(code) => write!(f, "exit status {code}"),
            ExitDisposition::Signaled(signal) => write!(f, "signal {signal}"),
            ExitDisposition::Unknown => f.write_str("unknown status"),
        }
    }
}

/// Outcome of supervising one command execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecResult {
    /// The grandchild made it through supervision (it was spawned and
    /// reaped). False means the helper could not run it at all.
    pub completed: bool,
    /// The deadline fired and the grandchild was forcibly terminated.
    pub timed_out: bool,
    /// Wait status at reap time. For a timed-out command this is the
    /// post-termination status.
    pub disposition: ExitDisposition,
}

impl ExecResult {
    /// Spawn failed; there is nothing to report beyond the fact.
    pub fn not_run() -> Self {
        Self {
            completed: false,
            timed_out: false,
            disposition: ExitDisposition::Unknown,
        }
    }

    /// The command exited on its own before the deadline.
    pub fn finished(disposition: ExitDisposition) -> Self {
        Self {
            completed: true,
            timed_out: false,
            disposition,
        }
    }

    /// The command was terminated after the deadline elapsed.
    pub fn after_timeout(disposition: ExitDisposition) -> Self {
        Self {
            completed: true,
            timed_out: true,
            disposition,
        }
    }

    /// True only for a clean, in-deadline exit with status 0.
    pub fn succeeded(&self) -> bool {
        self.completed && !self.timed_out && self.disposition == ExitDisposition::Exited(0)
    }
}

/// Encode a request frame into the wire format.
///
/// Wire format (integers little-endian):
/// ```text
/// ┌────────────┬──────┬──────────┬─────────┬──────────┬───────────────┐
/// │ Magic (2B) │ Op   │ Severity │ Errcode │ Length   │ Payload        │
/// │ "cn"       │ (1B) │ (1B)     │ (4B)    │ (4B)     │ Length+1 bytes │
/// └────────────┴──────┴──────────┴─────────┴──────────┴───────────────┘
/// ```
/// The payload is the message text followed by one NUL byte; `Length`
/// counts the text only. A zero-length message still sends one byte.
pub fn encode_request(
    severity: Severity,
    errcode: i32,
    message: &str,
    dst: &mut BytesMut,
) -> Result<()> {
    if message.len() > MAX_MESSAGE_LEN {
        return Err(FrameError::MessageTooLarge {
            size: message.len(),
            max: MAX_MESSAGE_LEN,
        });
    }
    if message.as_bytes().contains(&0) {
        return Err(FrameError::EmbeddedNul);
    }
    dst.reserve(REQUEST_HEADER_LEN + message.len() + 1);
    dst.put_slice(&REQUEST_MAGIC);
    dst.put_u8(OP_EXEC);
    dst.put_u8(severity.code());
    dst.put_i32_le(errcode);
    dst.put_u32_le(message.len() as u32);
    dst.put_slice(message.as_bytes());
    dst.put_u8(0);
    Ok(())
}

/// Decode the fixed-size request header.
pub fn decode_request_header(buf: &[u8]) -> Result<RequestHeader> {
    if buf.len() < REQUEST_HEADER_LEN {
        return Err(FrameError::Truncated {
            len: buf.len(),
            expected: REQUEST_HEADER_LEN,
        });
    }
    if buf[0..2] != REQUEST_MAGIC {
        return Err(FrameError::InvalidMagic);
    }
    if buf[2] != OP_EXEC {
        return Err(FrameError::UnknownOp(buf[2]));
    }
    let severity = Severity::from_code(buf[3]).ok_or(FrameError::UnknownSeverity(buf[3]))?;
    let errcode = i32::from_le_bytes(buf[4..8].try_into().unwrap());
    let payload_len = u32::from_le_bytes(buf[8..12].try_into().unwrap()) as usize;
    if payload_len > MAX_MESSAGE_LEN {
        return Err(FrameError::MessageTooLarge {
            size: payload_len,
            max: MAX_MESSAGE_LEN,
        });
    }
    Ok(RequestHeader {
        severity,
        errcode,
        payload_len,
    })
}

/// Decode the payload that follows `header`: the message text plus its
/// NUL terminator.
pub fn decode_request_payload(header: &RequestHeader, buf: &[u8]) -> Result<Request> {
    let expected = header.wire_payload_len();
    if buf.len() != expected {
        return Err(FrameError::Truncated {
            len: buf.len(),
            expected,
        });
    }
    if buf[header.payload_len] != 0 {
        return Err(FrameError::MissingTerminator);
    }
    let text = &buf[..header.payload_len];
    if text.contains(&0) {
        return Err(FrameError::EmbeddedNul);
    }
    let message = std::str::from_utf8(text)?.to_string();
    Ok(Request {
        severity: header.severity,
        errcode: header.errcode,
        message,
    })
}

/// Encode a result frame into the wire format.
///
/// Wire format (integers little-endian):
/// ```text
/// ┌────────────┬───────────┬───────────┬──────┬──────────┐
/// │ Magic (2B) │ Completed │ Timed-out │ Kind │ Code     │
/// │ "cr"       │ (1B)      │ (1B)      │ (1B) │ (4B)     │
/// └────────────┴───────────┴───────────┴──────┴──────────┘
/// ```
pub fn encode_result(result: &ExecResult, dst: &mut BytesMut) {
    let (kind, code) = match result.disposition {
        ExitDisposition::Unknown => (DISPOSITION_UNKNOWN, 0),
        ExitDisposition::Exited(code) => (DISPOSITION_EXITED, code),
        ExitDisposition::Signaled(signal) => (DISPOSITION_SIGNALED, signal),
    };
    dst.reserve(RESULT_FRAME_LEN);
    dst.put_slice(&RESULT_MAGIC);
    dst.put_u8(result.completed as u8);
    dst.put_u8(result.timed_out as u8);
    dst.put_u8(kind);
    dst.put_i32_le(code);
}

/// Decode a result frame.
pub fn decode_result(buf: &[u8]) -> Result<ExecResult> {
    if buf.len() != RESULT_FRAME_LEN {
        return Err(FrameError::Truncated {
            len: buf.len(),
            expected: RESULT_FRAME_LEN,
        });
    }
    if buf[0..2] != RESULT_MAGIC {
        return Err(FrameError::InvalidMagic);
    }
    let completed = buf[2] != 0;
    let timed_out = buf[3] != 0;
    let code = i32::from_le_bytes(buf[5..9].try_into().unwrap());
    let disposition = match buf[4] {
        DISPOSITION_UNKNOWN => ExitDisposition::Unknown,
        DISPOSITION_EXITED => ExitDisposition::Exited(code),
        DISPOSITION_SIGNALED => ExitDisposition::Signaled(code),
        other => return Err(FrameError::UnknownDisposition(other)),
    };
    Ok(ExecResult {
        completed,
        timed_out,
        disposition,
    })
}
