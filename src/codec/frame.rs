//! STOMP frame model: command, headers and body.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;

/// Frame commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Client connection request
    Connect,
    /// Client connection request (STOMP 1.1+ alias of CONNECT)
    Stomp,
    /// Positive connection response
    Connected,
    /// Client message publication
    Send,
    /// Client subscription
    Subscribe,
    /// Client subscription removal
    Unsubscribe,
    /// Message acknowledgement
    Ack,
    /// Negative acknowledgement
    Nack,
    /// Transaction start
    Begin,
    /// Transaction commit
    Commit,
    /// Transaction rollback
    Abort,
    /// Graceful disconnect request
    Disconnect,
    /// Broker message delivery
    Message,
    /// Broker receipt for a client frame
    Receipt,
    /// Broker error report
    Error,
}

impl Command {
    /// Wire tag of the command.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Stomp => "STOMP",
            Self::Connected => "CONNECTED",
            Self::Send => "SEND",
            Self::Subscribe => "SUBSCRIBE",
            Self::Unsubscribe => "UNSUBSCRIBE",
            Self::Ack => "ACK",
            Self::Nack => "NACK",
            Self::Begin => "BEGIN",
            Self::Commit => "COMMIT",
            Self::Abort => "ABORT",
            Self::Disconnect => "DISCONNECT",
            Self::Message => "MESSAGE",
            Self::Receipt => "RECEIPT",
            Self::Error => "ERROR",
        }
    }

    /// Header values of CONNECT and CONNECTED frames are never escaped.
    pub fn escapes_headers(&self) -> bool {
        !matches!(self, Self::Connect | Self::Connected)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONNECT" => Ok(Self::Connect),
            "STOMP" => Ok(Self::Stomp),
            "CONNECTED" => Ok(Self::Connected),
            "SEND" => Ok(Self::Send),
            "SUBSCRIBE" => Ok(Self::Subscribe),
            "UNSUBSCRIBE" => Ok(Self::Unsubscribe),
            "ACK" => Ok(Self::Ack),
            "NACK" => Ok(Self::Nack),
            "BEGIN" => Ok(Self::Begin),
            "COMMIT" => Ok(Self::Commit),
            "ABORT" => Ok(Self::Abort),
            "DISCONNECT" => Ok(Self::Disconnect),
            "MESSAGE" => Ok(Self::Message),
            "RECEIPT" => Ok(Self::Receipt),
            "ERROR" => Ok(Self::Error),
            _ => Err(format!("Unknown frame command: {}", s)),
        }
    }
}

/// Ordered header set with unique keys.
///
/// `set` replaces an existing value in place, so the last write wins while
/// the original position of the key is kept for encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Create an empty header set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing any previous value for the key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Get a header value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check if a header is present
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove a header, returning its value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Number of headers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no headers
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate headers in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Insert a decoded header. Repeated keys keep their first value.
    pub(crate) fn insert_decoded(&mut self, key: String, value: String) {
        if !self.contains(&key) {
            self.entries.push((key, value));
        }
    }
}

/// Frame body.
///
/// Owned bytes; dropping the body releases it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body(Bytes);

impl Body {
    /// Empty body
    pub fn empty() -> Self {
        Self(Bytes::new())
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Body length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the body is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read the whole body as UTF-8 text
    pub fn read_to_string(&self) -> Result<String, std::str::Utf8Error> {
        std::str::from_utf8(&self.0).map(str::to_string)
    }

    /// Take the underlying bytes
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Self(Bytes::from_static(text.as_bytes()))
    }
}

/// A single STOMP frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame command
    pub command: Command,
    /// Frame headers
    pub headers: Headers,
    /// Frame body
    pub body: Body,
}

impl Frame {
    /// Create a frame with no headers and an empty body
    pub fn new(command: Command) -> Self {
        Self {
            command,
            headers: Headers::new(),
            body: Body::empty(),
        }
    }

    /// Builder: set a header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(key, value);
        self
    }

    /// Builder: set the body
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Get a header value
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_round_trips_through_wire_tag() {
        for cmd in [Command::Connect, Command::Connected, Command::Error, Command::Receipt] {
            assert_eq!(cmd.as_str().parse::<Command>().unwrap(), cmd);
        }
        assert!("connected".parse::<Command>().is_err());
    }

    #[test]
    fn test_headers_last_write_wins_in_place() {
        let mut headers = Headers::new();
        headers.set("host", "a");
        headers.set("accept-version", "1.2");
        headers.set("host", "b");

        assert_eq!(headers.get("host"), Some("b"));
        assert_eq!(headers.len(), 2);
        let keys: Vec<_> = headers.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["host", "accept-version"]);
    }

    #[test]
    fn test_decoded_headers_keep_first_value() {
        let mut headers = Headers::new();
        headers.insert_decoded("foo".to_string(), "1".to_string());
        headers.insert_decoded("foo".to_string(), "2".to_string());
        assert_eq!(headers.get("foo"), Some("1"));
    }

    #[test]
    fn test_headers_remove() {
        let mut headers = Headers::new();
        headers.set("login", "guest");
        assert_eq!(headers.remove("login"), Some("guest".to_string()));
        assert!(headers.is_empty());
        assert_eq!(headers.remove("login"), None);
    }

    #[test]
    fn test_body_text() {
        let body = Body::from("access denied");
        assert_eq!(body.read_to_string().unwrap(), "access denied");

        let invalid = Body::from(vec![0xffu8, 0xfe]);
        assert!(invalid.read_to_string().is_err());
    }
}
