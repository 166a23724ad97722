//! Page composition: snapshot -> fragments -> template -> HTML.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;

use webstats_core::error::{Result, WebStatsError};
use webstats_core::render::{compose_page, FragmentTemplates, PAGE_FIELDS};
use webstats_core::Template;

use crate::host::StatsSnapshotProvider;

pub struct PageComposer {
    provider: Arc<dyn StatsSnapshotProvider>,
    template_path: PathBuf,
    fragments: FragmentTemplates,
}

impl PageComposer {
    pub fn new(
        provider: Arc<dyn StatsSnapshotProvider>,
        template_path: impl Into<PathBuf>,
        fragments: FragmentTemplates,
    ) -> Self {
        Self {
            provider,
            template_path: template_path.into(),
            fragments,
        }
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Read and validate the page template.
    ///
    /// The file is read on every call; edits show up on the next request.
    pub async fn load_template(&self) -> Result<Template> {
        let src = tokio::fs::read_to_string(&self.template_path)
            .await
            .map_err(|e| {
                WebStatsError::TemplateUnavailable(format!(
                    "{}: {e}",
                    self.template_path.display()
                ))
            })?;
        let tpl = Template::parse(&src)?;
        tpl.ensure_fields(PAGE_FIELDS)?;
        Ok(tpl)
    }

    /// Render the dashboard from a fresh snapshot.
    pub async fn generate(&self) -> Result<String> {
        let snap = self.provider.snapshot().await.map_err(|e| match e {
            WebStatsError::SnapshotUnavailable(_) => e,
            other => WebStatsError::SnapshotUnavailable(other.to_string()),
        })?;
        snap.validate()?;

        let page = self.load_template().await?;
        compose_page(&page, &self.fragments, &snap, Utc::now())
    }

    /// Check the template once at startup. Problems are logged, not fatal.
    pub async fn preflight(&self) -> bool {
        match self.load_template().await {
            Ok(tpl) => {
                tracing::debug!(
                    path = %self.template_path.display(),
                    fields = tpl.placeholders().len(),
                    "page template ok"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.template_path.display(),
                    code = e.code().as_str(),
                    error = %e,
                    "page template unusable, requests will fail until it is fixed"
                );
                false
            }
        }
    }
}
