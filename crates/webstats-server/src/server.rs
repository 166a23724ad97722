//! Server lifecycle: build, deferred start, notify, graceful stop.
//!
//! ```text
//! Unstarted -> Starting -> Listening -> Stopped
//!        \__________\_____________________^   (stop() from any state)
//! ```
//!
//! Each `StatusServer` is started at most once. `stop()` is idempotent and
//! waits for in-flight requests before the socket is released.

use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

use webstats_core::error::{Result, WebStatsError};
use webstats_core::render::FragmentTemplates;

use crate::app_state::AppState;
use crate::composer::PageComposer;
use crate::config::{self, ConfigStore, Settings};
use crate::host::{LogNotifySink, NotifySink, StatsSnapshotProvider};
use crate::router;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Unstarted,
    Starting,
    Listening,
    Stopped,
}

/// What `start` waits for before binding.
pub enum StartGate {
    Immediate,
    /// Fixed grace period for hosts that cannot signal readiness.
    Delay(Duration),
    /// Host-driven: bind once the host sends (or drops) the signal.
    Ready(oneshot::Receiver<()>),
}

impl StartGate {
    /// The compatibility delay configured in `startup_delay_ms`.
    pub fn from_settings(settings: &Settings) -> Self {
        StartGate::Delay(settings.startup_delay())
    }

    async fn wait(self) {
        match self {
            StartGate::Immediate => {}
            StartGate::Delay(d) => tokio::time::sleep(d).await,
            StartGate::Ready(rx) => {
                if rx.await.is_err() {
                    tracing::warn!("ready signal dropped by host, starting anyway");
                }
            }
        }
    }
}

struct Lifecycle {
    state: ServerState,
    local_addr: Option<SocketAddr>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

pub struct StatusServer {
    settings: Settings,
    state: AppState,
    notify: Arc<dyn NotifySink>,
    lifecycle: Mutex<Lifecycle>,
    shutdown: watch::Sender<bool>,
}

#[derive(Default)]
pub struct StatusServerBuilder {
    settings: Option<Settings>,
    provider: Option<Arc<dyn StatsSnapshotProvider>>,
    notify: Option<Arc<dyn NotifySink>>,
    fragments: Option<FragmentTemplates>,
}

impl StatusServerBuilder {
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Read settings from a store, writing defaults on first use.
    pub fn config_store(self, store: &dyn ConfigStore) -> Result<Self> {
        Ok(self.settings(config::load_or_init(store)?))
    }

    pub fn provider(mut self, provider: Arc<dyn StatsSnapshotProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn notify(mut self, notify: Arc<dyn NotifySink>) -> Self {
        self.notify = Some(notify);
        self
    }

    pub fn fragments(mut self, fragments: FragmentTemplates) -> Self {
        self.fragments = Some(fragments);
        self
    }

    pub fn build(self) -> Result<StatusServer> {
        let provider = self.provider.ok_or_else(|| {
            WebStatsError::Configuration("a stats snapshot provider is required".into())
        })?;
        let settings = self.settings.unwrap_or_default();
        settings.validate()?;

        let fragments = match self.fragments {
            Some(f) => f,
            None => FragmentTemplates::builtin()?,
        };
        let notify = self.notify.unwrap_or_else(|| Arc::new(LogNotifySink));

        let composer = PageComposer::new(provider, &settings.template_path, fragments);
        let state = AppState::new(composer, settings.render_timeout());
        let (shutdown, _) = watch::channel(false);

        Ok(StatusServer {
            settings,
            state,
            notify,
            lifecycle: Mutex::new(Lifecycle {
                state: ServerState::Unstarted,
                local_addr: None,
                task: None,
            }),
            shutdown,
        })
    }
}

impl StatusServer {
    pub fn builder() -> StatusServerBuilder {
        StatusServerBuilder::default()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> ServerState {
        self.lifecycle().state
    }

    /// Bound address once listening.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.lifecycle().local_addr
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait for the gate, bind, serve in the background, announce.
    ///
    /// Returns the bound address. Bind failures are returned to the caller and
    /// leave the server `Stopped`.
    pub async fn start(&self, gate: StartGate) -> Result<SocketAddr> {
        {
            let mut lc = self.lifecycle();
            if lc.state != ServerState::Unstarted {
                return Err(WebStatsError::AlreadyStarted);
            }
            lc.state = ServerState::Starting;
        }

        let stop_rx = self.shutdown.subscribe();
        tokio::select! {
            _ = gate.wait() => {}
            _ = wait_for_stop(stop_rx.clone()) => {
                return Err(WebStatsError::Internal("stopped before listening".into()));
            }
        }

        self.state.composer().preflight().await;

        let listen = self.settings.listen_addr();
        let (listener, addr) = match bind(&listen).await {
            Ok(bound) => bound,
            Err(e) => {
                self.lifecycle().state = ServerState::Stopped;
                tracing::error!(%listen, error = %e, "bind failed");
                return Err(WebStatsError::Bind(format!("{listen}: {e}")));
            }
        };

        {
            let mut lc = self.lifecycle();
            if lc.state != ServerState::Starting {
                return Err(WebStatsError::Internal("stopped before listening".into()));
            }
            let app = router::build_router(self.state.clone());
            lc.task = Some(tokio::spawn(async move {
                axum::serve(listener, app)
                    .with_graceful_shutdown(wait_for_stop(stop_rx))
                    .await
            }));
            lc.local_addr = Some(addr);
            lc.state = ServerState::Listening;
        }
        tracing::info!(%addr, "webstats listening");

        let host = self.announce_host(addr).await;
        let message = format!("Serving Web Statistics on http://{host}:{}", addr.port());
        match self.notify.notify(&message).await {
            Ok(()) => tracing::info!(%host, port = addr.port(), "startup notification sent"),
            Err(e) => tracing::warn!(error = %e, "startup notification failed"),
        }

        Ok(addr)
    }

    /// Close the listener and wait for in-flight requests. Safe to call
    /// repeatedly and before `start`.
    pub async fn stop(&self) {
        let (prev, task) = {
            let mut lc = self.lifecycle();
            let prev = std::mem::replace(&mut lc.state, ServerState::Stopped);
            lc.local_addr = None;
            (prev, lc.task.take())
        };
        self.shutdown.send_replace(true);

        if let Some(task) = task {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, "server exited with error"),
                Err(e) => tracing::warn!(error = %e, "server task failed"),
            }
        }
        if prev != ServerState::Stopped {
            tracing::info!(?prev, "webstats stopped");
        }
    }

    /// Start, then stop when `shutdown` resolves.
    pub async fn serve_until<F>(&self, gate: StartGate, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        tokio::select! {
            res = self.start(gate) => { res?; }
            _ = &mut shutdown => {
                self.stop().await;
                return Ok(());
            }
        }

        shutdown.await;
        self.stop().await;
        Ok(())
    }

    async fn announce_host(&self, addr: SocketAddr) -> String {
        if let Some(host) = &self.settings.public_host {
            return host.clone();
        }
        if !addr.ip().is_unspecified() {
            return addr.ip().to_string();
        }
        match discover_local_ip().await {
            Some(ip) => ip.to_string(),
            None => "127.0.0.1".into(),
        }
    }
}

impl Drop for StatusServer {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}

async fn bind(listen: &str) -> std::io::Result<(TcpListener, SocketAddr)> {
    let listener = TcpListener::bind(listen).await?;
    let addr = listener.local_addr()?;
    Ok((listener, addr))
}

async fn wait_for_stop(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}

/// Address of the interface used for outbound traffic. Nothing is sent.
///
/// Behind NAT this is the private address; set `public_host` there.
async fn discover_local_ip() -> Option<IpAddr> {
    let sock = UdpSocket::bind("0.0.0.0:0").await.ok()?;
    sock.connect("8.8.8.8:80").await.ok()?;
    sock.local_addr().ok().map(|a| a.ip())
}
