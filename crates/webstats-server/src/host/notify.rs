use async_trait::async_trait;

use webstats_core::error::Result;

use super::NotifySink;

/// Writes the announcement to the log instead of messaging anyone.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifySink;

#[async_trait]
impl NotifySink for LogNotifySink {
    async fn notify(&self, message: &str) -> Result<()> {
        tracing::info!(target: "webstats::notify", "{message}");
        Ok(())
    }
}
