//! Shared request state.

use std::sync::Arc;
use std::time::Duration;

use crate::composer::PageComposer;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    composer: PageComposer,
    render_timeout: Duration,
}

impl AppState {
    pub fn new(composer: PageComposer, render_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                composer,
                render_timeout,
            }),
        }
    }

    pub fn composer(&self) -> &PageComposer {
        &self.inner.composer
    }

    pub fn render_timeout(&self) -> Duration {
        self.inner.render_timeout
    }
}
