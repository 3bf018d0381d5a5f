//! `tokio_util` codec for STOMP frames.

use std::io;

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use super::{
    escape_header, malformed, unescape_header, Body, Command, Frame, FrameLimits, Headers,
    HDR_CONTENT_LENGTH,
};

/// A bare EOL, sent on its own as a heart-beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eol;

/// Frame codec driven by `FramedRead` / `FramedWrite`.
///
/// Decoding is restartable: the bytes of a partly received frame stay in the
/// read buffer until the whole frame has arrived, and heart-beat EOLs before
/// a frame are discarded.
#[derive(Debug, Clone, Default)]
pub struct StompCodec {
    limits: FrameLimits,
    /// Offset from the start of the buffered frame where the search for the
    /// body's NUL resumes.
    nul_scan: usize,
}

impl StompCodec {
    /// Codec with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec with custom decoding limits
    pub fn with_limits(limits: FrameLimits) -> Self {
        Self {
            limits,
            nul_scan: 0,
        }
    }

    /// Decoding limits in effect
    pub fn limits(&self) -> FrameLimits {
        self.limits
    }

    /// Locate the line starting at `start`.
    ///
    /// Returns the end of the line without its EOL and the start of the next
    /// line, or `None` while the EOL has not arrived.
    fn find_line(&self, src: &[u8], start: usize) -> io::Result<Option<(usize, usize)>> {
        let max = self.limits.max_line_len;

        match src[start..].iter().position(|&b| b == b'\n') {
            Some(offset) => {
                let newline = start + offset;
                let end = if newline > start && src[newline - 1] == b'\r' {
                    newline - 1
                } else {
                    newline
                };
                if end - start > max {
                    return Err(line_too_long(max));
                }
                Ok(Some((end, newline + 1)))
            },
            // room for a full line plus its CR
            None if src.len() - start > max + 1 => Err(line_too_long(max)),
            None => Ok(None),
        }
    }
}

impl Decoder for StompCodec {
    type Item = Frame;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> io::Result<Option<Frame>> {
        if skip_heart_beats(src) {
            self.nul_scan = 0;
        }
        if src.is_empty() {
            return Ok(None);
        }

        let (end, mut pos) = match self.find_line(src, 0)? {
            Some(line) => line,
            None => return Ok(None),
        };
        let command: Command = line_str(&src[..end])?.parse().map_err(malformed)?;

        let mut headers = Headers::new();
        loop {
            let (end, next) = match self.find_line(src, pos)? {
                Some(line) => line,
                None => return Ok(None),
            };
            let line = line_str(&src[pos..end])?;
            pos = next;
            if line.is_empty() {
                break;
            }

            let (key, value) = line
                .split_once(':')
                .ok_or_else(|| malformed(format!("header line without colon: {:?}", line)))?;

            if command.escapes_headers() {
                headers.insert_decoded(unescape_header(key)?, unescape_header(value)?);
            } else {
                headers.insert_decoded(key.to_string(), value.to_string());
            }
        }

        let max = self.limits.max_body_len;
        let body_len = match headers.get(HDR_CONTENT_LENGTH) {
            Some(raw) => {
                let len: usize = raw
                    .trim()
                    .parse()
                    .map_err(|e| malformed(format!("invalid content-length {:?}: {}", raw, e)))?;
                if len > max {
                    return Err(malformed(format!(
                        "body of {} bytes exceeds limit of {}",
                        len, max
                    )));
                }
                if src.len() <= pos + len {
                    src.reserve(pos + len + 1 - src.len());
                    return Ok(None);
                }
                if src[pos + len] != 0 {
                    return Err(malformed("body not terminated by NUL"));
                }
                len
            },
            None => {
                let from = self.nul_scan.max(pos);
                match src[from..].iter().position(|&b| b == 0) {
                    Some(offset) if from + offset - pos > max => return Err(body_too_long(max)),
                    Some(offset) => from + offset - pos,
                    None if src.len() - pos > max => return Err(body_too_long(max)),
                    None => {
                        self.nul_scan = src.len();
                        return Ok(None);
                    },
                }
            },
        };

        self.nul_scan = 0;
        let raw = src.split_to(pos + body_len + 1).freeze();
        let body = Body::from(raw.slice(pos..pos + body_len));

        tracing::trace!(%command, headers = headers.len(), body_len, "frame decoded");

        Ok(Some(Frame {
            command,
            headers,
            body,
        }))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> io::Result<Option<Frame>> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() => Ok(None),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed in the middle of a frame",
            )),
        }
    }
}

impl<'a> Encoder<&'a Frame> for StompCodec {
    type Error = io::Error;

    /// A `content-length` header is added for non-empty bodies unless the
    /// frame already carries one.
    fn encode(&mut self, frame: &'a Frame, dst: &mut BytesMut) -> io::Result<()> {
        let escape = frame.command.escapes_headers();
        if !escape {
            check_unescaped_headers(frame)?;
        }

        let start = dst.len();
        dst.reserve(64 + frame.body.len());
        dst.put_slice(frame.command.as_str().as_bytes());
        dst.put_u8(b'\n');

        let mut line = String::new();
        for (key, value) in frame.headers.iter() {
            line.clear();
            if escape {
                escape_header(key, &mut line);
                line.push(':');
                escape_header(value, &mut line);
            } else {
                line.push_str(key);
                line.push(':');
                line.push_str(value);
            }
            dst.put_slice(line.as_bytes());
            dst.put_u8(b'\n');
        }

        if !frame.body.is_empty() && !frame.headers.contains(HDR_CONTENT_LENGTH) {
            dst.put_slice(format!("{}:{}\n", HDR_CONTENT_LENGTH, frame.body.len()).as_bytes());
        }

        dst.put_u8(b'\n');
        dst.put_slice(frame.body.as_bytes());
        dst.put_u8(0);

        tracing::trace!(command = %frame.command, bytes = dst.len() - start, "frame encoded");
        Ok(())
    }
}

impl Encoder<Eol> for StompCodec {
    type Error = io::Error;

    fn encode(&mut self, _: Eol, dst: &mut BytesMut) -> io::Result<()> {
        dst.put_u8(b'\n');
        Ok(())
    }
}

/// Drop leading heart-beat EOLs. Returns whether anything was dropped.
fn skip_heart_beats(src: &mut BytesMut) -> bool {
    let mut skipped = false;
    loop {
        let eol = match &src[..] {
            [b'\n', ..] => 1,
            [b'\r', b'\n', ..] => 2,
            _ => return skipped,
        };
        src.advance(eol);
        skipped = true;
    }
}

/// Headers of CONNECT and CONNECTED have no escape sequences, so a line
/// break in a key or value, or a colon in a key, cannot be sent.
fn check_unescaped_headers(frame: &Frame) -> io::Result<()> {
    for (key, value) in frame.headers.iter() {
        if key.contains(&[':', '\n', '\r'][..]) || value.contains(&['\n', '\r'][..]) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "{} header {:?} contains characters that cannot be sent unescaped",
                    frame.command, key
                ),
            ));
        }
    }
    Ok(())
}

fn line_str(line: &[u8]) -> io::Result<&str> {
    std::str::from_utf8(line).map_err(|e| malformed(format!("line is not valid UTF-8: {}", e)))
}

fn line_too_long(max: usize) -> io::Error {
    malformed(format!("line exceeds limit of {}", max))
}

fn body_too_long(max: usize) -> io::Error {
    malformed(format!("body exceeds limit of {}", max))
}
