//! Playback and server configuration.

use std::net::SocketAddr;
use std::time::Duration;

use pathtrace_engine::Algorithm;
use tracing::warn;

use crate::playback::PlaybackSpeed;

/// Base delay between steps at 1x speed.
pub const DEFAULT_BASE_INTERVAL: Duration = Duration::from_millis(1000);

/// Playback timing and channel sizing.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    /// Delay between steps at 1x.
    pub base_interval: Duration,
    /// Speed preset at startup.
    pub speed: PlaybackSpeed,
    /// Capacity of the command mailbox.
    pub mailbox_capacity: usize,
    /// Capacity of the event broadcast; slow subscribers lag past this.
    pub event_capacity: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            base_interval: DEFAULT_BASE_INTERVAL,
            speed: PlaybackSpeed::Normal,
            mailbox_capacity: 64,
            event_capacity: 256,
        }
    }
}

impl PlaybackConfig {
    /// Defaults overridden by `PATHTRACE_BASE_INTERVAL_MS` and `PATHTRACE_SPEED`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(ms) = parse_env::<u64>("PATHTRACE_BASE_INTERVAL_MS") {
            config.base_interval = Duration::from_millis(ms);
        }
        if let Some(multiplier) = parse_env::<f64>("PATHTRACE_SPEED") {
            config.speed = PlaybackSpeed::from_multiplier(multiplier);
        }
        config
    }

    /// Set the 1x step delay.
    #[must_use]
    pub fn with_base_interval(mut self, interval: Duration) -> Self {
        self.base_interval = interval;
        self
    }

    /// Set the initial speed preset.
    #[must_use]
    pub fn with_speed(mut self, speed: PlaybackSpeed) -> Self {
        self.speed = speed;
        self
    }

    /// Set the event broadcast capacity.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}

/// Configuration for the `pathtrace-vis` server.
#[derive(Debug, Clone, PartialEq)]
pub struct VisConfig {
    /// Address the HTTP server binds.
    pub addr: SocketAddr,
    /// Playback settings.
    pub playback: PlaybackConfig,
    /// Example graph loaded at startup.
    pub example: String,
    /// Algorithm traced at startup.
    pub algorithm: Algorithm,
    /// Start vertex; the first vertex of the example when unset.
    pub start: Option<String>,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            playback: PlaybackConfig::default(),
            example: "cp4_10_dw".to_string(),
            algorithm: Algorithm::default(),
            start: None,
        }
    }
}

impl VisConfig {
    /// Create config from environment variables with sensible defaults.
    ///
    /// Values that fail to parse are logged and replaced by the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            addr: parse_env("PATHTRACE_ADDR").unwrap_or(defaults.addr),
            playback: PlaybackConfig::from_env(),
            example: std::env::var("PATHTRACE_EXAMPLE").unwrap_or(defaults.example),
            algorithm: parse_env("PATHTRACE_ALGORITHM").unwrap_or(defaults.algorithm),
            start: std::env::var("PATHTRACE_START").ok().filter(|s| !s.is_empty()),
        }
    }

    /// Set the bind address.
    #[must_use]
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    /// Set the playback settings.
    #[must_use]
    pub fn with_playback(mut self, playback: PlaybackConfig) -> Self {
        self.playback = playback;
        self
    }

    /// Set the startup example, algorithm and start vertex.
    #[must_use]
    pub fn with_trace(mut self, example: impl Into<String>, algorithm: Algorithm, start: Option<String>) -> Self {
        self.example = example.into();
        self.algorithm = algorithm;
        self.start = start;
        self
    }
}

fn parse_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, value = %raw, error = %e, "ignoring invalid environment value");
            None
        }
    }
}
