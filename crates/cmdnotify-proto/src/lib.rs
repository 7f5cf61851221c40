//! Request/result wire protocol for the notification helper.
//!
//! One notification is one round trip: the caller sends a request frame
//! (severity, error code, message text) and blocks for a single result
//! frame describing what became of the external command. Frames use
//! fixed-width little-endian fields behind a two-byte magic, so both
//! ends agree on layout regardless of native integer width.
//!
//! There are no request identifiers. The protocol is strictly
//! one-at-a-time request/response; serializing calls is the caller's
//! job (the façade enforces it with `&mut self`).

pub mod client;
pub mod codec;
pub mod error;
pub mod severity;

pub use client::{Client, ClientContext};
pub use codec::{
    decode_request_header, decode_request_payload, decode_result, encode_request, encode_result,
    ExecResult, ExitDisposition, Request, RequestHeader, MAX_MESSAGE_LEN, REQUEST_HEADER_LEN,
    RESULT_FRAME_LEN,
};
pub use error::{FrameError, NotifyError, Result};
pub use severity::{ParseSeverityError, Severity};
