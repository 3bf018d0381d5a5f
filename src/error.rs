//! STOMP handshake error types.
//!
//! # Error Classification
//!
//! Every failure of the handshake falls into one of three kinds, each of
//! which aborts the handshake without producing a [`Session`](crate::Session):
//!
//! | Kind        | Variant                   | Trigger                                           |
//! |-------------|---------------------------|---------------------------------------------------|
//! | Address     | [`StompError::Address`]   | remote address unavailable or not `host:port`     |
//! | Transport   | [`StompError::Transport`] | write or read on the stream fails                 |
//! | Protocol    | [`StompError::Protocol`]  | ERROR frame, unexpected command, bad `heart-beat` |
//!
//! The `Protocol` variant preserves the full error chain via `#[source]`, so a
//! heart-beat parse failure can still be inspected as a [`HeartBeatError`].

use std::num::ParseIntError;

use thiserror::Error;

use crate::codec::Command;

/// STOMP client errors.
#[derive(Error, Debug)]
pub enum StompError {
    /// The connection's remote address is unavailable or could not be split
    /// into host and port.
    ///
    /// Raised before any I/O is attempted.
    #[error("Address error: address {addr}: {reason}")]
    Address {
        /// Address as reported by the connection.
        addr: String,
        /// Why it could not be used.
        reason: String,
    },

    /// Writing the request or reading the response failed.
    ///
    /// Malformed frames surface here as `InvalidData` I/O errors.
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// The broker refused the session or answered outside the protocol.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),
}

impl StompError {
    /// Check whether this is an address error.
    pub fn is_address(&self) -> bool {
        matches!(self, StompError::Address { .. })
    }

    /// Check whether this is a transport error.
    pub fn is_transport(&self) -> bool {
        matches!(self, StompError::Transport(_))
    }

    /// Check whether this is a protocol error.
    pub fn is_protocol(&self) -> bool {
        matches!(self, StompError::Protocol(_))
    }
}

/// Result type alias for STOMP operations
pub type Result<T> = std::result::Result<T, StompError>;

/// Handshake-level protocol violations.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The broker answered with an ERROR frame.
    ///
    /// Displays exactly the message extracted from the frame.
    #[error("{0}")]
    Broker(String),

    /// The broker answered with a command other than CONNECTED or ERROR.
    #[error("unexpected frame command. expected {expected}, got {actual}")]
    UnexpectedCommand {
        /// Command the handshake waits for.
        expected: Command,
        /// Command actually received.
        actual: Command,
    },

    /// The CONNECTED frame carried an unparseable `heart-beat` header.
    #[error("{0}")]
    HeartBeat(#[source] HeartBeatError),
}

impl From<HeartBeatError> for ProtocolError {
    fn from(err: HeartBeatError) -> Self {
        ProtocolError::HeartBeat(err)
    }
}

impl From<HeartBeatError> for StompError {
    fn from(err: HeartBeatError) -> Self {
        StompError::Protocol(ProtocolError::HeartBeat(err))
    }
}

/// Malformed `heart-beat` header value.
///
/// Messages label the first field `rx` and the second `tx`, although the
/// first field is the sender's outgoing interval.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeartBeatError {
    /// Fewer than two comma-separated fields.
    #[error("malformed heart beat header: invalid length")]
    InvalidLength,

    /// First field is not an integer.
    #[error("malformed rx heart beat header value: {0}")]
    Outgoing(#[source] ParseIntError),

    /// Second field is not an integer.
    #[error("malformed tx heart beat header value: {0}")]
    Incoming(#[source] ParseIntError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broker_error_displays_message_verbatim() {
        let err = StompError::from(ProtocolError::Broker("access denied".to_string()));
        assert_eq!(err.to_string(), "access denied");
        assert!(err.is_protocol());
    }

    #[test]
    fn test_heart_beat_error_keeps_source() {
        let parse = "x".parse::<i64>().unwrap_err();
        let err = StompError::from(HeartBeatError::Outgoing(parse));

        assert!(err.is_protocol());
        assert!(err
            .to_string()
            .starts_with("malformed rx heart beat header value:"));

        let source = std::error::Error::source(&err).expect("protocol error has a source");
        assert!(source.to_string().starts_with("malformed rx"));
    }

    #[test]
    fn test_address_error_display() {
        let err = StompError::Address {
            addr: "broker".to_string(),
            reason: "missing port in address".to_string(),
        };
        assert!(err.is_address());
        assert_eq!(
            err.to_string(),
            "Address error: address broker: missing port in address"
        );
    }
}
