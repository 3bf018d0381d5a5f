//! Socket-backed connections.

use std::io;

use tokio::net::TcpStream;

use super::Connection;

impl Connection for TcpStream {
    fn remote_addr(&self) -> io::Result<String> {
        self.peer_addr().map(|addr| addr.to_string())
    }
}

/// Unix sockets report a path rather than `host:port`, so a handshake over
/// one fails with an address error unless the caller wraps the stream.
#[cfg(unix)]
impl Connection for tokio::net::UnixStream {
    fn remote_addr(&self) -> io::Result<String> {
        let addr = self.peer_addr()?;
        Ok(addr
            .as_pathname()
            .map(|p| p.display().to_string())
            .unwrap_or_default())
    }
}
