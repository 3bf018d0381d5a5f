//! Client configuration.
//!
//! Supports configuration from:
//! - TOML config files
//! - Environment variables
//! - CLI arguments (for `stomp-connect`)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StompError};
use crate::protocol::{options, HeaderOption, HeartBeat};

/// Default broker address
pub const DEFAULT_BROKER: &str = "127.0.0.1:61613";

/// Client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Broker address (`host:port`), [`DEFAULT_BROKER`] when unset
    pub broker: Option<String>,

    /// Login for authenticated brokers
    pub login: Option<String>,

    /// Passcode paired with `login`
    pub passcode: Option<String>,

    /// Virtual host, overriding the one derived from the broker address
    pub host: Option<String>,

    /// Offered protocol versions, overriding the default `1.1,1.2`
    pub accept_version: Option<String>,

    /// Heart-beat intervals requested from the broker
    pub heart_beat: Option<HeartBeatConfig>,
}

/// Requested heart-beat intervals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartBeatConfig {
    /// Interval at which the client promises to send heart-beats
    pub outgoing_ms: u32,
    /// Interval at which the client wants to receive heart-beats
    pub incoming_ms: u32,
}

impl From<HeartBeatConfig> for HeartBeat {
    fn from(cfg: HeartBeatConfig) -> Self {
        HeartBeat::new(i64::from(cfg.outgoing_ms), i64::from(cfg.incoming_ms))
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| StompError::Config(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| StompError::Config(format!("Failed to parse config: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from a variable lookup (`STOMP_*` keys)
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        config.broker = lookup("STOMP_BROKER");
        config.login = lookup("STOMP_LOGIN");
        config.passcode = lookup("STOMP_PASSCODE");
        config.host = lookup("STOMP_HOST");
        config.accept_version = lookup("STOMP_ACCEPT_VERSION");

        if let Some(raw) = lookup("STOMP_HEART_BEAT") {
            config.heart_beat = Some(parse_heart_beat_config(&raw)?);
        }

        Ok(config)
    }

    /// Merge with another config (other takes precedence where set)
    pub fn merge(self, other: Self) -> Self {
        Self {
            broker: other.broker.or(self.broker),
            login: other.login.or(self.login),
            passcode: other.passcode.or(self.passcode),
            host: other.host.or(self.host),
            accept_version: other.accept_version.or(self.accept_version),
            heart_beat: other.heart_beat.or(self.heart_beat),
        }
    }

    /// CONNECT header options derived from this config, in application order
    pub fn header_options(&self) -> Vec<HeaderOption> {
        let mut opts = Vec::new();

        if let Some(host) = &self.host {
            opts.push(options::host(host.clone()));
        }
        if let Some(versions) = &self.accept_version {
            opts.push(options::accept_version(versions.clone()));
        }
        if let Some(heart_beat) = self.heart_beat {
            opts.push(options::heart_beat(heart_beat.into()));
        }
        match (&self.login, &self.passcode) {
            (Some(login), passcode) => {
                opts.push(options::login(login.clone(), passcode.clone().unwrap_or_default()));
            },
            (None, Some(passcode)) => {
                opts.push(options::header(crate::protocol::HDR_PASSCODE, passcode.clone()));
            },
            (None, None) => {},
        }

        opts
    }
}

/// Parse a `"<outgoing>,<incoming>"` pair of non-negative intervals.
pub fn parse_heart_beat_config(raw: &str) -> Result<HeartBeatConfig> {
    let hb = HeartBeat::parse(raw.trim())
        .map_err(|e| StompError::Config(format!("Invalid heart-beat {raw:?}: {e}")))?;

    let convert = |ms: i64| {
        u32::try_from(ms).map_err(|_| {
            StompError::Config(format!("Invalid heart-beat {raw:?}: {ms} is out of range"))
        })
    };

    Ok(HeartBeatConfig {
        outgoing_ms: convert(hb.outgoing_ms)?,
        incoming_ms: convert(hb.incoming_ms)?,
    })
}
