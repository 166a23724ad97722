//! Settings store (strict parsing, create-on-missing).
//!
//! Settings are read once when the server is built. A store with nothing in it
//! (or with a file that is not JSON at all) is populated with defaults; a
//! store holding JSON that does not match the schema is a configuration error.

pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use webstats_core::error::{Result, WebStatsError};

pub use schema::Settings;

/// Default location of the persisted settings file.
pub const DEFAULT_SETTINGS_PATH: &str = "data/webstats/settings.json";

/// Persisted settings collaborator.
pub trait ConfigStore: Send + Sync {
    /// `Ok(None)` when nothing usable is stored yet.
    fn load(&self) -> Result<Option<Settings>>;
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Strict parse + validate.
pub fn load_from_str(s: &str) -> Result<Settings> {
    let settings: Settings = serde_json::from_str(s)
        .map_err(|e| WebStatsError::Configuration(format!("invalid settings: {e}")))?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings, writing defaults to the store the first time.
pub fn load_or_init(store: &dyn ConfigStore) -> Result<Settings> {
    match store.load()? {
        Some(settings) => {
            settings.validate()?;
            Ok(settings)
        }
        None => {
            let settings = Settings::default();
            store.save(&settings)?;
            tracing::info!(port = settings.server_port, "created default settings");
            Ok(settings)
        }
    }
}

/// Settings kept in a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_SETTINGS_PATH)
    }
}

impl ConfigStore for JsonFileStore {
    fn load(&self) -> Result<Option<Settings>> {
        let s = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(WebStatsError::Internal(format!(
                    "read settings {} failed: {e}",
                    self.path.display()
                )))
            }
        };

        if serde_json::from_str::<serde_json::Value>(&s).is_err() {
            tracing::warn!(path = %self.path.display(), "settings file is not valid json, recreating");
            return Ok(None);
        }
        load_from_str(&s).map(Some)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| {
                WebStatsError::Internal(format!("create {} failed: {e}", dir.display()))
            })?;
        }
        let body = serde_json::to_string_pretty(settings)
            .map_err(|e| WebStatsError::Internal(format!("encode settings failed: {e}")))?;
        fs::write(&self.path, body).map_err(|e| {
            WebStatsError::Internal(format!("write settings {} failed: {e}", self.path.display()))
        })
    }
}

/// In-process store for embedding hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Option<Settings>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(settings: Settings) -> Self {
        Self {
            inner: Mutex::new(Some(settings)),
        }
    }

    pub fn get(&self) -> Option<Settings> {
        self.inner.lock().ok().and_then(|g| g.clone())
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Result<Option<Settings>> {
        self.inner
            .lock()
            .map(|g| g.clone())
            .map_err(|_| WebStatsError::Internal("settings store poisoned".into()))
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let mut g = self
            .inner
            .lock()
            .map_err(|_| WebStatsError::Internal("settings store poisoned".into()))?;
        *g = Some(settings.clone());
        Ok(())
    }
}
