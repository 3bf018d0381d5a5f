//! Transport abstraction for the STOMP client.
//!
//! The handshake runs over any already-open duplex byte stream. TLS and
//! socket setup stay with the caller; the only thing the client needs beyond
//! reading and writing is the remote address, from which the `host` header
//! of the CONNECT frame is derived.
//!
//! # Usage
//!
//! ```rust,ignore
//! use stomp::transport::Connection;
//!
//! let stream = tokio::net::TcpStream::connect("broker.local:61613").await?;
//! assert_eq!(stream.remote_addr()?, "10.0.0.7:61613");
//! ```

mod stream;
mod tcp;

pub use stream::AddressedStream;

use std::io;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::{Result, StompError};

/// Duplex byte stream connected to a broker.
pub trait Connection: AsyncRead + AsyncWrite + Unpin + Send + 'static {
    /// Remote address as `host:port`.
    fn remote_addr(&self) -> io::Result<String>;
}

/// Split a `host:port` or `[host]:port` address into its host and port.
///
/// The port is returned verbatim and is not required to be numeric.
pub fn split_host_port(addr: &str) -> Result<(&str, &str)> {
    let fail = |reason: &'static str| StompError::Address {
        addr: addr.to_string(),
        reason: reason.to_string(),
    };

    let colon = addr.rfind(':').ok_or_else(|| fail("missing port in address"))?;
    let (host, port) = (&addr[..colon], &addr[colon + 1..]);

    let host = if let Some(rest) = host.strip_prefix('[') {
        let inner = rest
            .strip_suffix(']')
            .ok_or_else(|| fail("missing ']' in address"))?;
        if inner.contains('[') || inner.contains(']') {
            return Err(fail("unexpected bracket in address"));
        }
        inner
    } else {
        if host.contains(':') {
            return Err(fail("too many colons in address"));
        }
        if host.contains('[') || host.contains(']') {
            return Err(fail("unexpected bracket in address"));
        }
        host
    };

    if port.contains('[') || port.contains(']') {
        return Err(fail("unexpected bracket in address"));
    }

    Ok((host, port))
}
