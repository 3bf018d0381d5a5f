//! # STOMP Handshake - client session establishment for STOMP brokers
//!
//! Negotiates protocol version, session identity and heart-beat intervals
//! with a STOMP 1.1/1.2 broker over an already-open duplex byte stream, and
//! returns a session whose connection is ready for ordinary message traffic.
//!
//! ## Features
//!
//! - **Handshake**: CONNECT/CONNECTED exchange with ordered header overrides
//! - **Error taxonomy**: address, transport and protocol failures kept apart
//! - **Frame codec**: STOMP 1.2 framing with header escaping and size limits
//! - **Frame processing**: pluggable background reader started on success
//! - **Configuration**: TOML files and `STOMP_*` environment variables
//!
//! ## Protocol Overview
//!
//! ```text
//! Client                                 Broker
//!    |---- CONNECT ----------------------->|
//!    |<--- CONNECTED / ERROR --------------|
//!    |<=== frames (processor) ============|
//! ```
//!
//! ### Frame Commands
//!
//! | Command     | Direction        | Role in the handshake                 |
//! |-------------|------------------|---------------------------------------|
//! | CONNECT     | Client→Broker    | Offer versions, host and heart-beats  |
//! | CONNECTED   | Broker→Client    | Accept; carries version and session   |
//! | ERROR       | Broker→Client    | Refuse; text/plain body is the reason |
//! | (any other) | Broker→Client    | Protocol violation                    |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stomp::protocol::{connect, options};
//!
//! let stream = tokio::net::TcpStream::connect("broker.local:61613").await?;
//! let session = connect(stream, [options::login("guest", "guest")]).await?;
//!
//! println!("version {} session {}", session.version(), session.id());
//! println!("heart-beat {}", session.heart_beat());
//! ```
//!
//! ## Modules
//!
//! - [`protocol`]: Handshake, heart-beats, header options, session, processor
//! - [`codec`]: STOMP frame model, reader and writer
//! - [`transport`]: Connection trait and address handling
//! - [`config`]: Configuration management
//! - [`error`]: Error types and result aliases

pub mod codec;
pub mod config;
pub mod error;
pub mod protocol;
pub mod transport;

// Re-exports for convenience
pub use codec::{Command, Frame, FrameReader, FrameWriter, Headers};
pub use config::ClientConfig;
pub use error::{HeartBeatError, ProtocolError, Result, StompError};
pub use protocol::{
    connect, connect_with, options, ChannelProcessor, FrameProcessor, HeaderOption, HeartBeat,
    ProcessorHandle, Session, SessionInfo,
};
pub use transport::{AddressedStream, Connection};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
