use std::io::{Read, Write};

use bytes::BytesMut;
use cmdnotify_channel::{ChannelReader, ChannelWriter};
use cmdnotify_proto::{codec, REQUEST_HEADER_LEN, RESULT_FRAME_LEN};
use tracing::{debug, info};

use crate::config::SupervisorConfig;
use crate::error::Result;
use crate::exec::run_command;

/// Run the helper loop until the request channel closes.
///
/// Each iteration reads one request frame, supervises one command
/// execution, and writes one result frame. A clean close of the
/// request channel at a frame boundary ends the loop with `Ok(())`;
/// a close mid-frame or a malformed frame is a [`ServeError`], since
/// the stream cannot be resynchronized.
///
/// [`ServeError`]: crate::error::ServeError
pub fn serve<R: Read, W: Write>(
    reader: R,
    writer: W,
    config: &SupervisorConfig,
) -> Result<()> {
    let mut reader = ChannelReader::new(reader);
    let mut writer = ChannelWriter::new(writer);
    let mut header_buf = [0u8; REQUEST_HEADER_LEN];
    let mut result_buf = BytesMut::with_capacity(RESULT_FRAME_LEN);

    info!(
        command = %config.command.display(),
        timeout = ?config.timeout,
        "notification helper ready"
    );

    loop {
        match reader.read_exact(&mut header_buf) {
            Ok(()) => {}
            Err(err) if err.is_clean_eof() => {
                info!("request channel closed; helper exiting");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }
        let header = codec::decode_request_header(&header_buf)?;

        let mut payload = vec![0u8; header.wire_payload_len()];
        reader.read_exact(&mut payload)?;
        let request = codec::decode_request_payload(&header, &payload)?;
        debug!(
            severity = %request.severity,
            errcode = request.errcode,
            message_len = request.message.len(),
            "notification request"
        );

        let result = run_command(config, &request);

        result_buf.clear();
        codec::encode_result(&result, &mut result_buf);
        writer.write_exact(&result_buf)?;
    }
}

/// Run the helper loop over this process's stdin and stdout.
///
/// This is the entry used when the façade spawns the helper with both
/// streams piped.
pub fn serve_stdio(config: &SupervisorConfig) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    serve(stdin.lock(), stdout.lock(), config)
}
