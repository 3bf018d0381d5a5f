//! Frame encoding onto an async byte stream.

use std::io;

use futures::SinkExt;
use tokio::io::AsyncWrite;
use tokio_util::codec::FramedWrite;

use super::{Eol, Frame, StompCodec};

/// Writes whole frames to a byte stream.
///
/// Every write is flushed before it returns.
#[derive(Debug)]
pub struct FrameWriter<W> {
    inner: FramedWrite<W, StompCodec>,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    /// Wrap a byte stream
    pub fn new(inner: W) -> Self {
        Self {
            inner: FramedWrite::new(inner, StompCodec::new()),
        }
    }

    /// Encode, write and flush one frame.
    ///
    /// A frame that cannot be encoded fails with `InvalidInput` before any
    /// byte reaches the stream.
    pub async fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        self.inner.send(frame).await
    }

    /// Write a single EOL heart-beat
    pub async fn write_heart_beat(&mut self) -> io::Result<()> {
        self.inner.send(Eol).await
    }

    /// Flush anything pending and shut down the write side of the stream
    pub async fn shutdown(&mut self) -> io::Result<()> {
        SinkExt::<Eol>::close(&mut self.inner).await
    }

    /// Borrow the underlying stream
    pub fn get_mut(&mut self) -> &mut W {
        self.inner.get_mut()
    }

    /// Unwrap the underlying stream
    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Command, FrameReader};
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_writer_output_is_readable() {
        let (client, server) = tokio::io::duplex(1024);
        let mut writer = FrameWriter::new(client);
        let mut reader = FrameReader::new(server);

        let frame = Frame::new(Command::Send)
            .with_header("destination", "/queue/line\nbreak")
            .with_body(vec![1u8, 0, 2]);
        writer.write_frame(&frame).await.unwrap();

        let decoded = reader.read_frame().await.unwrap();
        assert_eq!(decoded.command, Command::Send);
        assert_eq!(decoded.header("destination"), Some("/queue/line\nbreak"));
        assert_eq!(decoded.body.as_bytes(), &[1u8, 0, 2]);
    }

    #[tokio::test]
    async fn test_heart_beat_is_skipped_by_reader() {
        let (client, server) = tokio::io::duplex(1024);
        let mut writer = FrameWriter::new(client);
        let mut reader = FrameReader::new(server);

        writer.write_heart_beat().await.unwrap();
        writer.write_frame(&Frame::new(Command::Disconnect)).await.unwrap();

        assert_eq!(reader.read_frame().await.unwrap().command, Command::Disconnect);
    }

    #[tokio::test]
    async fn test_rejected_frame_writes_nothing() {
        let (client, mut server) = tokio::io::duplex(1024);
        let mut writer = FrameWriter::new(client);

        let frame = Frame::new(Command::Connect).with_header("login", "guest\nhost:evil");
        let err = writer.write_frame(&frame).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        writer.shutdown().await.unwrap();
        let mut received = Vec::new();
        server.read_to_end(&mut received).await.unwrap();
        assert!(received.is_empty());
    }
}
