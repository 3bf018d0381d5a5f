//! STOMP client handshake and session establishment.
//!
//! Implements the CONNECT/CONNECTED exchange that opens a STOMP session over
//! an already-connected byte stream.
//!
//! # Protocol Overview
//!
//! ```text
//! Client                                 Broker
//!    |                                     |
//!    |---- CONNECT ----------------------->|  host, accept-version, heart-beat
//!    |                                     |
//!    |<--- CONNECTED ----------------------|  version, session, server, heart-beat
//!    |     or ERROR                        |  message in body (text/plain)
//!    |                                     |
//!    |<=== frames (processor) ============|  read by the frame processor
//! ```
//!
//! ## Handshake Steps
//!
//! | Step | Action                                       | Failure        |
//! |------|----------------------------------------------|----------------|
//! | 1    | derive `host` from the remote address        | Address        |
//! | 2    | build CONNECT, apply header options in order | -              |
//! | 3    | write CONNECT                                | Transport      |
//! | 4    | read one response frame                      | Transport      |
//! | 5    | classify ERROR / other / CONNECTED           | Protocol       |
//! | 6    | parse `heart-beat` (default `0,0`)           | Protocol       |
//! | 7    | start the frame processor, build the session | -              |
//!
//! The handshake is single-shot: nothing is retried and no timeout is
//! applied. Wrap the call in `tokio::time::timeout` to bound it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use stomp::protocol::{connect, options, HeartBeat};
//!
//! let stream = tokio::net::TcpStream::connect("broker.local:61613").await?;
//! let mut session = connect(
//!     stream,
//!     [
//!         options::login("guest", "guest"),
//!         options::heart_beat(HeartBeat::new(10_000, 10_000)),
//!     ],
//! )
//! .await?;
//!
//! println!("session {} on {}", session.id(), session.server());
//! while let Some(frame) = session.processor().recv().await {
//!     println!("{}", frame.command);
//! }
//! ```

mod handshake;
mod heartbeat;
pub mod options;
mod processor;
mod session;

pub use handshake::{connect, connect_with};
pub use heartbeat::HeartBeat;
pub use options::HeaderOption;
pub use processor::{ChannelProcessor, FrameProcessor, ProcessorHandle, DEFAULT_FRAME_BUFFER};
pub use session::{Session, SessionInfo};

/// Protocol versions offered in CONNECT
pub const ACCEPT_VERSIONS: &str = "1.1,1.2";

/// Heart-beat requested by default and assumed when the broker omits it
pub const DEFAULT_HEART_BEAT: &str = "0,0";

/// Content type under which an ERROR body is read as the error message
pub const TEXT_PLAIN: &str = "text/plain";

/// Virtual host header
pub const HDR_HOST: &str = "host";
/// Offered protocol versions header
pub const HDR_ACCEPT_VERSION: &str = "accept-version";
/// Heart-beat header
pub const HDR_HEART_BEAT: &str = "heart-beat";
/// Body content type header
pub const HDR_CONTENT_TYPE: &str = "content-type";
/// Negotiated version header
pub const HDR_VERSION: &str = "version";
/// Session identifier header
pub const HDR_SESSION: &str = "session";
/// Broker identity header
pub const HDR_SERVER: &str = "server";
/// Login header
pub const HDR_LOGIN: &str = "login";
/// Passcode header
pub const HDR_PASSCODE: &str = "passcode";
