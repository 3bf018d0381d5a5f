//! STOMP 1.2 frame codec.
//!
//! [`StompCodec`] implements `tokio_util`'s `Decoder` and `Encoder` for
//! frames. [`FrameReader`] and [`FrameWriter`] drive it with `FramedRead`
//! and `FramedWrite` over any tokio byte stream, one frame at a time.
//!
//! # Wire Format
//!
//! ```text
//! COMMAND EOL
//! *( header-name ":" header-value EOL )
//! EOL
//! *OCTET NUL
//! *( EOL )
//! ```
//!
//! `EOL` is `\n` or `\r\n`. Bare EOLs between frames are heart-beats and are
//! skipped by the reader.
//!
//! ## Header Escaping
//!
//! | Octet | Escape |
//! |-------|--------|
//! | `\`   | `\\`   |
//! | LF    | `\n`   |
//! | `:`   | `\c`   |
//! | CR    | `\r`   |
//!
//! Escaping applies to every frame except CONNECT and CONNECTED. Headers of
//! those two frames must not contain CR or LF (nor `:` in a name); the
//! encoder rejects them with `InvalidInput`.
//!
//! ## Body Length
//!
//! When a `content-length` header is present the body is exactly that many
//! octets and must be followed by NUL. Otherwise the body runs up to the
//! first NUL.

mod frame;
mod reader;
mod stomp;
mod writer;

pub use frame::{Body, Command, Frame, Headers};
pub use reader::FrameReader;
pub use stomp::{Eol, StompCodec};
pub use writer::FrameWriter;

use std::io;

/// Header carrying the exact body length
pub const HDR_CONTENT_LENGTH: &str = "content-length";

/// Maximum length of a single command or header line (8 KiB)
pub const DEFAULT_MAX_LINE_LEN: usize = 8 * 1024;

/// Maximum body size (16 MiB)
pub const DEFAULT_MAX_BODY_LEN: usize = 16 * 1024 * 1024;

/// Size limits enforced while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLimits {
    /// Maximum length of a command or header line, excluding EOL
    pub max_line_len: usize,
    /// Maximum body length
    pub max_body_len: usize,
}

impl Default for FrameLimits {
    fn default() -> Self {
        Self {
            max_line_len: DEFAULT_MAX_LINE_LEN,
            max_body_len: DEFAULT_MAX_BODY_LEN,
        }
    }
}

/// Escape a header name or value.
pub(crate) fn escape_header(raw: &str, out: &mut String) {
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            ':' => out.push_str("\\c"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
}

/// Reverse [`escape_header`]. Undefined escape sequences are rejected.
pub(crate) fn unescape_header(escaped: &str) -> io::Result<String> {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('c') => out.push(':'),
            Some('r') => out.push('\r'),
            other => {
                return Err(malformed(format!(
                    "undefined header escape sequence: \\{}",
                    other.map(String::from).unwrap_or_default()
                )))
            },
        }
    }

    Ok(out)
}

/// Build an `InvalidData` error for a malformed frame.
pub(crate) fn malformed(msg: impl Into<String>) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("malformed frame: {}", msg.into()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_header() {
        let mut out = String::new();
        escape_header("a:b\\c\nd\re", &mut out);
        assert_eq!(out, "a\\cb\\\\c\\nd\\re");
        assert_eq!(unescape_header(&out).unwrap(), "a:b\\c\nd\re");
    }

    #[test]
    fn test_unescape_rejects_undefined_sequence() {
        let err = unescape_header("bad\\t").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let err = unescape_header("trailing\\").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
