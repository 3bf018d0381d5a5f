//! Heart-beat header parsing.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::error::HeartBeatError;

/// Heart-beat intervals in milliseconds.
///
/// Wire format is `"<outgoing>,<incoming>"`. Values are kept exactly as the
/// peer declared them, negatives included; the interval accessors treat
/// anything non-positive as disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct HeartBeat {
    /// Interval at which the declaring side sends heart-beats
    pub outgoing_ms: i64,
    /// Interval at which the declaring side expects heart-beats
    pub incoming_ms: i64,
}

impl HeartBeat {
    /// Heart-beats disabled in both directions
    pub const DISABLED: Self = Self::new(0, 0);

    /// Create from explicit intervals
    pub const fn new(outgoing_ms: i64, incoming_ms: i64) -> Self {
        Self {
            outgoing_ms,
            incoming_ms,
        }
    }

    /// Parse a `heart-beat` header value.
    ///
    /// Fields after the second are ignored. Whitespace around a field is
    /// rejected.
    pub fn parse(value: &str) -> Result<Self, HeartBeatError> {
        let mut fields = value.split(',');
        let (first, second) = match (fields.next(), fields.next()) {
            (Some(first), Some(second)) => (first, second),
            _ => return Err(HeartBeatError::InvalidLength),
        };

        let outgoing_ms: i64 = first.parse().map_err(HeartBeatError::Outgoing)?;
        let incoming_ms: i64 = second.parse().map_err(HeartBeatError::Incoming)?;

        Ok(Self::new(outgoing_ms, incoming_ms))
    }

    /// Outgoing interval, `None` when disabled
    pub fn outgoing_interval(&self) -> Option<Duration> {
        positive_millis(self.outgoing_ms)
    }

    /// Incoming interval, `None` when disabled
    pub fn incoming_interval(&self) -> Option<Duration> {
        positive_millis(self.incoming_ms)
    }

    /// Check if heart-beats are disabled in both directions
    pub fn is_disabled(&self) -> bool {
        self.outgoing_interval().is_none() && self.incoming_interval().is_none()
    }
}

impl fmt::Display for HeartBeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.outgoing_ms, self.incoming_ms)
    }
}

impl std::str::FromStr for HeartBeat {
    type Err = HeartBeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn positive_millis(ms: i64) -> Option<Duration> {
    u64::try_from(ms)
        .ok()
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}
