//! CONNECT/CONNECTED handshake.

use tokio::io::ReadHalf;

use super::heartbeat::HeartBeat;
use super::options::{self, HeaderOption};
use super::processor::{ChannelProcessor, FrameProcessor, ProcessorHandle};
use super::session::{Session, SessionInfo};
use super::{
    ACCEPT_VERSIONS, DEFAULT_HEART_BEAT, HDR_ACCEPT_VERSION, HDR_CONTENT_TYPE, HDR_HEART_BEAT,
    HDR_HOST, HDR_SERVER, HDR_SESSION, HDR_VERSION, TEXT_PLAIN,
};
use crate::codec::{Command, Frame, FrameReader, FrameWriter};
use crate::error::{ProtocolError, Result, StompError};
use crate::transport::{split_host_port, Connection};

/// Message used when an ERROR frame body is not plain text
const UNREADABLE_BODY: &str = "frame body content type is unreadable";

/// Placeholder for a connection that cannot report its remote address
const UNKNOWN_ADDR: &str = "<unknown>";

/// Open a STOMP session over `conn`, forwarding later frames through a
/// [`ChannelProcessor`].
///
/// `options` mutate the CONNECT headers in order after the defaults
/// (`host`, `accept-version: 1.1,1.2`, `heart-beat: 0,0`) are set.
pub async fn connect<C, I>(conn: C, options: I) -> Result<Session<C, ProcessorHandle>>
where
    C: Connection,
    I: IntoIterator<Item = HeaderOption>,
{
    connect_with(conn, ChannelProcessor::default(), options).await
}

/// Open a STOMP session over `conn` and hand the connection's read side to
/// `processor` once the broker has accepted.
///
/// The processor is started only when the broker answers CONNECTED.
pub async fn connect_with<C, P, I>(
    conn: C,
    processor: P,
    options: I,
) -> Result<Session<C, P::Handle>>
where
    C: Connection,
    P: FrameProcessor<ReadHalf<C>>,
    I: IntoIterator<Item = HeaderOption>,
{
    let remote_addr = conn.remote_addr().map_err(|e| StompError::Address {
        addr: UNKNOWN_ADDR.to_string(),
        reason: e.to_string(),
    })?;
    let (host, _) = split_host_port(&remote_addr)?;
    let request = connect_frame(host, options);

    let (read_half, write_half) = tokio::io::split(conn);

    let mut writer = FrameWriter::new(write_half);
    writer.write_frame(&request).await?;
    tracing::debug!(host = %host, remote_addr = %remote_addr, "CONNECT sent");

    let mut reader = FrameReader::new(read_half);
    let response = reader.read_frame().await?;
    tracing::debug!(command = %response.command, "handshake response received");

    let info = accept_response(response)?;

    let processor = processor.start(reader);
    tracing::debug!(
        session = %info.id,
        version = %info.version,
        heart_beat = %info.heart_beat,
        "STOMP session established"
    );

    Ok(Session::new(info, writer, processor))
}

/// Build the CONNECT frame with defaults, then apply `options` in order.
pub(crate) fn connect_frame<I>(host: &str, options: I) -> Frame
where
    I: IntoIterator<Item = HeaderOption>,
{
    let mut frame = Frame::new(Command::Connect)
        .with_header(HDR_HOST, host)
        .with_header(HDR_ACCEPT_VERSION, ACCEPT_VERSIONS)
        .with_header(HDR_HEART_BEAT, DEFAULT_HEART_BEAT);

    options::apply(&mut frame.headers, options);
    frame
}

/// Classify the broker's answer. Consumes the frame, so its body is released
/// on every return path.
pub(crate) fn accept_response(response: Frame) -> Result<SessionInfo> {
    match response.command {
        Command::Connected => {},
        Command::Error => return Err(ProtocolError::Broker(error_message(&response)).into()),
        actual => {
            return Err(ProtocolError::UnexpectedCommand {
                expected: Command::Connected,
                actual,
            }
            .into())
        },
    }

    let header = |key: &str| response.header(key).unwrap_or_default().to_string();
    let heart_beat =
        HeartBeat::parse(response.header(HDR_HEART_BEAT).unwrap_or(DEFAULT_HEART_BEAT))?;

    Ok(SessionInfo {
        version: header(HDR_VERSION),
        id: header(HDR_SESSION),
        server: header(HDR_SERVER),
        heart_beat,
    })
}

/// Best-effort message of an ERROR frame.
fn error_message(frame: &Frame) -> String {
    if frame.header(HDR_CONTENT_TYPE) != Some(TEXT_PLAIN) {
        return UNREADABLE_BODY.to_string();
    }

    match frame.body.read_to_string() {
        Ok(text) => text,
        Err(e) => format!("unable to read frame body: {}", e),
    }
}
