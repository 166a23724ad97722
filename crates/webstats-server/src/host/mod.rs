//! Collaborator seams between the stats server and its host application.
//!
//! The host owns the real metrics (rooms, users, counters) and the operator
//! channel; the server only sees them through these traits.

pub mod notify;
pub mod process;

use async_trait::async_trait;

use webstats_core::error::Result;
use webstats_core::snapshot::StatsSnapshot;

pub use notify::LogNotifySink;
pub use process::{HostCounters, HostIdentity, HostInventory, ProcessStatsProvider};

/// Supplies a fresh snapshot per page render.
#[async_trait]
pub trait StatsSnapshotProvider: Send + Sync {
    async fn snapshot(&self) -> Result<StatsSnapshot>;
}

/// Operator-facing channel for the one startup announcement.
#[async_trait]
pub trait NotifySink: Send + Sync {
    async fn notify(&self, message: &str) -> Result<()>;
}
