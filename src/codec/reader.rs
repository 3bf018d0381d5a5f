//! Frame decoding from an async byte stream.

use std::io;

use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::FramedRead;

use super::{Frame, FrameLimits, StompCodec};

/// Reads one frame at a time from a byte stream.
///
/// The reader buffers internally, so once frames have been read through it
/// the stream must keep being consumed through the same reader.
/// [`read_frame`](Self::read_frame) is cancel safe: a partly received frame
/// stays buffered for the next call.
#[derive(Debug)]
pub struct FrameReader<R> {
    inner: FramedRead<R, StompCodec>,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Create a reader with default limits
    pub fn new(inner: R) -> Self {
        Self::with_limits(inner, FrameLimits::default())
    }

    /// Create a reader with custom limits
    pub fn with_limits(inner: R, limits: FrameLimits) -> Self {
        Self {
            inner: FramedRead::new(inner, StompCodec::with_limits(limits)),
        }
    }

    /// Decoding limits in effect
    pub fn limits(&self) -> FrameLimits {
        self.inner.decoder().limits()
    }

    /// Read the next frame, skipping heart-beat EOLs before it.
    ///
    /// A stream closed before any byte of a frame yields `UnexpectedEof`;
    /// malformed input yields `InvalidData`.
    pub async fn read_frame(&mut self) -> io::Result<Frame> {
        match self.inner.next().await {
            Some(result) => result,
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed before frame",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Command;
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;

    async fn decode(input: &[u8]) -> io::Result<Frame> {
        FrameReader::new(input).read_frame().await
    }

    #[tokio::test]
    async fn test_read_connected_frame() {
        let frame = decode(b"CONNECTED\nversion:1.2\nsession:abc-1\nheart-beat:5000,10000\n\n\0")
            .await
            .unwrap();

        assert_eq!(frame.command, Command::Connected);
        assert_eq!(frame.header("version"), Some("1.2"));
        assert_eq!(frame.header("session"), Some("abc-1"));
        assert_eq!(frame.header("heart-beat"), Some("5000,10000"));
        assert!(frame.body.is_empty());
    }

    #[tokio::test]
    async fn test_skips_heart_beats_and_accepts_crlf() {
        let frame = decode(b"\n\r\n\nRECEIPT\r\nreceipt-id:77\r\n\r\n\0").await.unwrap();
        assert_eq!(frame.command, Command::Receipt);
        assert_eq!(frame.header("receipt-id"), Some("77"));
    }

    #[tokio::test]
    async fn test_body_with_content_length_may_contain_nul() {
        let frame = decode(b"MESSAGE\ncontent-length:5\n\na\0b\0c\0").await.unwrap();
        assert_eq!(frame.body.as_bytes(), b"a\0b\0c");
    }

    #[tokio::test]
    async fn test_body_without_content_length_ends_at_nul() {
        let frame = decode(b"ERROR\ncontent-type:text/plain\n\naccess denied\0\n").await.unwrap();
        assert_eq!(frame.body.read_to_string().unwrap(), "access denied");
    }

    #[tokio::test]
    async fn test_reads_consecutive_frames() {
        let input: &[u8] = b"RECEIPT\nreceipt-id:1\n\n\0\nRECEIPT\nreceipt-id:2\n\n\0";
        let mut reader = FrameReader::new(input);

        assert_eq!(reader.read_frame().await.unwrap().header("receipt-id"), Some("1"));
        assert_eq!(reader.read_frame().await.unwrap().header("receipt-id"), Some("2"));

        let err = reader.read_frame().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn test_header_escapes_depend_on_command() {
        let frame = decode(b"MESSAGE\ndest:a\\cb\n\n\0").await.unwrap();
        assert_eq!(frame.header("dest"), Some("a:b"));

        let frame = decode(b"CONNECTED\nserver:a\\cb\n\n\0").await.unwrap();
        assert_eq!(frame.header("server"), Some("a\\cb"));
    }

    #[tokio::test]
    async fn test_repeated_header_keeps_first_value() {
        let frame = decode(b"MESSAGE\nfoo:1\nfoo:2\n\n\0").await.unwrap();
        assert_eq!(frame.header("foo"), Some("1"));
    }

    #[tokio::test]
    async fn test_value_may_contain_colon_in_connected() {
        let frame = decode(b"CONNECTED\nserver:broker:1.0\n\n\0").await.unwrap();
        assert_eq!(frame.header("server"), Some("broker:1.0"));
    }

    #[tokio::test]
    async fn test_unknown_command_is_invalid_data() {
        let err = decode(b"HELLO\n\n\0").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_header_without_colon_is_invalid_data() {
        let err = decode(b"CONNECTED\nversion\n\n\0").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_truncated_frame_is_unexpected_eof() {
        let err = decode(b"CONNECTED\nversion:1.2\n").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

        let err = decode(b"ERROR\n\nno terminator").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn test_content_length_without_nul_is_invalid_data() {
        let err = decode(b"MESSAGE\ncontent-length:2\n\nabc\0").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_limits_are_enforced() {
        let limits = FrameLimits {
            max_line_len: 16,
            max_body_len: 4,
        };

        let input: &[u8] = b"CONNECTED\nserver:a-very-long-server-name\n\n\0";
        let err = FrameReader::with_limits(input, limits).read_frame().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let input: &[u8] = b"ERROR\n\ntoo long body\0";
        let err = FrameReader::with_limits(input, limits).read_frame().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let input: &[u8] = b"ERROR\ncontent-length:10\n\n0123456789\0";
        let err = FrameReader::with_limits(input, limits).read_frame().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_partial_frame_survives_cancelled_read() {
        let (mut broker, client) = tokio::io::duplex(1024);
        let mut reader = FrameReader::new(client);

        broker.write_all(b"MESSAGE\ndestination:/queue/a\n").await.unwrap();
        let pending = tokio::time::timeout(Duration::from_millis(20), reader.read_frame()).await;
        assert!(pending.is_err());

        broker.write_all(b"\nhello\0").await.unwrap();
        let frame = reader.read_frame().await.unwrap();
        assert_eq!(frame.header("destination"), Some("/queue/a"));
        assert_eq!(frame.body.as_bytes(), b"hello");
    }

    #[tokio::test]
    async fn test_frame_split_across_reads() {
        let mock = tokio_test::io::Builder::new()
            .read(b"CONN")
            .read(b"ECTED\nsession:s-1\n")
            .read(b"\n\0")
            .build();

        let frame = FrameReader::new(mock).read_frame().await.unwrap();
        assert_eq!(frame.command, Command::Connected);
        assert_eq!(frame.header("session"), Some("s-1"));
    }
}
