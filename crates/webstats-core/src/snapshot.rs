//! Point-in-time statistics handed over by the host for one page render.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WebStatsError};

/// One room (guild/server) the host is present in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfo {
    pub name: String,
    pub member_count: u64,
    #[serde(default)]
    pub icon_url: Option<String>,
}

impl RoomInfo {
    pub fn new(name: impl Into<String>, member_count: u64) -> Self {
        Self {
            name: name.into(),
            member_count,
            icon_url: None,
        }
    }

    pub fn with_icon(mut self, icon_url: impl Into<String>) -> Self {
        self.icon_url = Some(icon_url.into());
        self
    }
}

/// Counters maintained by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsCounts {
    pub rooms: u64,
    pub users: u64,
    pub loaded_extensions: u64,
    pub total_commands: u64,
    pub text_channels: u64,
    pub voice_channels: u64,
    pub messages_received: u64,
    pub commands_run: u64,
}

impl StatsCounts {
    /// Text and voice channels combined.
    pub fn total_channels(&self) -> u64 {
        self.text_channels.saturating_add(self.voice_channels)
    }
}

/// Resource usage of the host process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessUsage {
    pub cpu_percent: f64,
    pub memory_bytes: u64,
    pub threads: u64,
    pub io_read_bytes: u64,
    pub io_write_bytes: u64,
}

impl ProcessUsage {
    /// Resident memory in MiB.
    pub fn memory_mb(&self) -> f64 {
        self.memory_bytes as f64 / 1024.0 / 1024.0
    }
}

/// Frozen copy of the host's runtime metrics.
///
/// Built fresh for every request and dropped once the response is written;
/// nothing in the serving path keeps one around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub bot_name: String,
    pub owner_name: String,
    pub avatar_url: String,
    pub uptime: Duration,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub counts: StatsCounts,
    #[serde(default)]
    pub process: ProcessUsage,
    #[serde(default)]
    pub rooms: Vec<RoomInfo>,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub commands: Vec<String>,
}

impl StatsSnapshot {
    /// Reject data no page should be rendered from.
    pub fn validate(&self) -> Result<()> {
        if self.bot_name.trim().is_empty() {
            return Err(WebStatsError::SnapshotUnavailable(
                "bot_name must not be empty".into(),
            ));
        }
        let cpu = self.process.cpu_percent;
        if !cpu.is_finite() || cpu < 0.0 {
            return Err(WebStatsError::SnapshotUnavailable(format!(
                "cpu_percent must be a non-negative number, got {cpu}"
            )));
        }
        Ok(())
    }
}
