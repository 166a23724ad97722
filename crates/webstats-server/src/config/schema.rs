use std::time::Duration;

use serde::{Deserialize, Serialize};
use webstats_core::error::{Result, WebStatsError};

/// Persisted settings of the stats server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_server_port")]
    pub server_port: u16,

    #[serde(default = "default_bind_host")]
    pub bind_host: String,

    /// Host announced in the startup notification. When unset, the address
    /// of the outbound interface is used, which is a private address behind
    /// NAT; set this to the public name or IP in that case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_host: Option<String>,

    #[serde(default = "default_template_path")]
    pub template_path: String,

    #[serde(default = "default_startup_delay_ms")]
    pub startup_delay_ms: u64,

    #[serde(default = "default_render_timeout_ms")]
    pub render_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_port: default_server_port(),
            bind_host: default_bind_host(),
            public_host: None,
            template_path: default_template_path(),
            startup_delay_ms: default_startup_delay_ms(),
            render_timeout_ms: default_render_timeout_ms(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.bind_host.trim().is_empty() {
            return Err(WebStatsError::Configuration(
                "bind_host must not be empty".into(),
            ));
        }
        if self.template_path.trim().is_empty() {
            return Err(WebStatsError::Configuration(
                "template_path must not be empty".into(),
            ));
        }
        if self.startup_delay_ms > 300_000 {
            return Err(WebStatsError::Configuration(
                "startup_delay_ms must be at most 300000".into(),
            ));
        }
        if !(100..=120_000).contains(&self.render_timeout_ms) {
            return Err(WebStatsError::Configuration(
                "render_timeout_ms must be between 100 and 120000".into(),
            ));
        }
        Ok(())
    }

    /// `bind_host:server_port`. Port 0 asks the OS for a free port.
    pub fn listen_addr(&self) -> String {
        if self.bind_host.contains(':') && !self.bind_host.starts_with('[') {
            format!("[{}]:{}", self.bind_host, self.server_port)
        } else {
            format!("{}:{}", self.bind_host, self.server_port)
        }
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }
}

fn default_server_port() -> u16 {
    4545
}
fn default_bind_host() -> String {
    "0.0.0.0".into()
}
fn default_template_path() -> String {
    "webtemplate.html".into()
}
fn default_startup_delay_ms() -> u64 {
    10_000
}
fn default_render_timeout_ms() -> u64 {
    10_000
}
