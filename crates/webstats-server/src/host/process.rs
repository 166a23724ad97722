//! Standalone snapshot provider backed by the current process.
//!
//! Resource usage comes from `sysinfo`; identity, room/extension/command
//! lists and counters are whatever the embedding host hands in.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

use webstats_core::error::{Result, WebStatsError};
use webstats_core::snapshot::{ProcessUsage, RoomInfo, StatsCounts, StatsSnapshot};

use super::StatsSnapshotProvider;

/// Who the dashboard is about.
#[derive(Debug, Clone)]
pub struct HostIdentity {
    pub bot_name: String,
    pub owner_name: String,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
}

impl HostIdentity {
    pub fn new(bot_name: impl Into<String>, owner_name: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
            owner_name: owner_name.into(),
            avatar_url: String::new(),
            created_at: Utc::now(),
        }
    }
}

/// Event counters the host bumps as it works.
#[derive(Debug, Default)]
pub struct HostCounters {
    messages_received: AtomicU64,
    commands_run: AtomicU64,
}

impl HostCounters {
    pub fn message_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn command_run(&self) {
        self.commands_run.fetch_add(1, Ordering::Relaxed);
    }

    pub fn messages_received(&self) -> u64 {
        self.messages_received.load(Ordering::Relaxed)
    }

    pub fn commands_run(&self) -> u64 {
        self.commands_run.load(Ordering::Relaxed)
    }
}

/// Rooms, extensions and commands as last reported by the host.
#[derive(Debug, Clone, Default)]
pub struct HostInventory {
    pub rooms: Vec<RoomInfo>,
    pub users: u64,
    pub text_channels: u64,
    pub voice_channels: u64,
    pub extensions: Vec<String>,
    pub commands: Vec<String>,
}

pub struct ProcessStatsProvider {
    identity: HostIdentity,
    started: Instant,
    counters: Arc<HostCounters>,
    inventory: RwLock<HostInventory>,
    system: Arc<Mutex<System>>,
    pid: Option<Pid>,
}

impl ProcessStatsProvider {
    pub fn new(identity: HostIdentity) -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!(error = %e, "current pid unavailable, process usage will read as zero");
                None
            }
        };
        Self {
            identity,
            started: Instant::now(),
            counters: Arc::new(HostCounters::default()),
            inventory: RwLock::new(HostInventory::default()),
            system: Arc::new(Mutex::new(System::new())),
            pid,
        }
    }

    /// Shared handle for the host's event handlers.
    pub fn counters(&self) -> Arc<HostCounters> {
        Arc::clone(&self.counters)
    }

    /// Replace the host inventory wholesale.
    pub fn set_inventory(&self, inventory: HostInventory) {
        *self.inventory.write().unwrap_or_else(PoisonError::into_inner) = inventory;
    }

    async fn sample_process(&self) -> Result<ProcessUsage> {
        let Some(pid) = self.pid else {
            return Ok(ProcessUsage::default());
        };
        let system = Arc::clone(&self.system);

        // /proc reads are blocking; keep them off the runtime threads.
        tokio::task::spawn_blocking(move || {
            let mut sys = system.lock().unwrap_or_else(PoisonError::into_inner);
            sys.refresh_processes_specifics(
                ProcessesToUpdate::Some(&[pid]),
                true,
                ProcessRefreshKind::everything(),
            );
            let Some(proc_) = sys.process(pid) else {
                return ProcessUsage::default();
            };
            let disk = proc_.disk_usage();
            ProcessUsage {
                cpu_percent: f64::from(proc_.cpu_usage()),
                memory_bytes: proc_.memory(),
                // On Linux the main thread is not listed among the tasks.
                threads: proc_.tasks().map_or(1, |t| t.len() as u64 + 1),
                io_read_bytes: disk.total_read_bytes,
                io_write_bytes: disk.total_written_bytes,
            }
        })
        .await
        .map_err(|e| WebStatsError::SnapshotUnavailable(format!("process sampling failed: {e}")))
    }
}

#[async_trait]
impl StatsSnapshotProvider for ProcessStatsProvider {
    async fn snapshot(&self) -> Result<StatsSnapshot> {
        let process = self.sample_process().await?;
        let inv = self
            .inventory
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        Ok(StatsSnapshot {
            bot_name: self.identity.bot_name.clone(),
            owner_name: self.identity.owner_name.clone(),
            avatar_url: self.identity.avatar_url.clone(),
            uptime: self.started.elapsed(),
            created_at: self.identity.created_at,
            counts: StatsCounts {
                rooms: inv.rooms.len() as u64,
                users: inv.users,
                loaded_extensions: inv.extensions.len() as u64,
                total_commands: inv.commands.len() as u64,
                text_channels: inv.text_channels,
                voice_channels: inv.voice_channels,
                messages_received: self.counters.messages_received(),
                commands_run: self.counters.commands_run(),
            },
            process,
            rooms: inv.rooms,
            extensions: inv.extensions,
            commands: inv.commands,
        })
    }
}
