//! Negotiated STOMP session.
//!
//! A session only exists after the broker accepted the CONNECT frame. It is
//! immutable: the negotiated terms never change, and the connection and
//! processor handle are only handed out for the send/receive/disconnect
//! layers built on top of it.

use serde::Serialize;
use tokio::io::WriteHalf;

use super::heartbeat::HeartBeat;
use super::processor::ProcessorHandle;
use crate::codec::FrameWriter;

/// STOMP session established by [`connect`](super::connect).
#[derive(Debug)]
pub struct Session<C, H = ProcessorHandle> {
    info: SessionInfo,
    writer: FrameWriter<WriteHalf<C>>,
    processor: H,
}

/// Terms negotiated with the broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    /// Protocol version chosen by the broker
    pub version: String,
    /// Broker-assigned session identifier
    pub id: String,
    /// Broker identity, may be empty
    pub server: String,
    /// Heart-beat intervals declared by the broker
    pub heart_beat: HeartBeat,
}

impl<C, H> Session<C, H> {
    pub(crate) fn new(info: SessionInfo, writer: FrameWriter<WriteHalf<C>>, processor: H) -> Self {
        Self {
            info,
            writer,
            processor,
        }
    }

    /// Negotiated protocol version
    pub fn version(&self) -> &str {
        &self.info.version
    }

    /// Session identifier
    pub fn id(&self) -> &str {
        &self.info.id
    }

    /// Broker identity
    pub fn server(&self) -> &str {
        &self.info.server
    }

    /// Negotiated heart-beat intervals
    pub fn heart_beat(&self) -> HeartBeat {
        self.info.heart_beat
    }

    /// All negotiated terms
    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    /// Write side of the connection
    pub fn writer(&mut self) -> &mut FrameWriter<WriteHalf<C>> {
        &mut self.writer
    }

    /// Handle of the running frame processor
    pub fn processor(&mut self) -> &mut H {
        &mut self.processor
    }

    /// Split into negotiated terms, connection writer and processor handle
    pub fn into_parts(self) -> (SessionInfo, FrameWriter<WriteHalf<C>>, H) {
        (self.info, self.writer, self.processor)
    }
}
