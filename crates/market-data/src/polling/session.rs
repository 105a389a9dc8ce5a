use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::state::SessionState;
use crate::cache::FetchCache;

/// Longest refresh interval a session schedules: one year.
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;

/// What a session polls and how often.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSpec {
    pub url: String,
    pub interval: Duration,
}

impl PollSpec {
    /// Intervals are clamped to `1..=MAX_REFRESH_INTERVAL_SECS` seconds.
    pub fn new(url: impl Into<String>, refresh_interval_secs: u64) -> Self {
        Self {
            url: url.into(),
            interval: Duration::from_secs(
                refresh_interval_secs.clamp(1, MAX_REFRESH_INTERVAL_SECS),
            ),
        }
    }
}

/// One scheduled run of a session. A reconfigured session gets a new run.
struct SessionRun {
    alive: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

/// Repeatedly resolves one URL through the shared [`FetchCache`].
///
/// On start the state is reset to loading and the URL is resolved right
/// away; after that first resolution the same step repeats every interval.
/// Later polls never set `loading` again, so the last good payload keeps
/// rendering while a refresh is in flight.
///
/// Polls are not sequenced: if a slow poll completes after a newer one, its
/// result is applied last.
///
/// Must be started from within a tokio runtime.
pub struct PollingSession {
    cache: Arc<FetchCache>,
    spec: PollSpec,
    state_tx: Arc<watch::Sender<SessionState>>,
    run: Option<SessionRun>,
}

impl PollingSession {
    pub fn start(cache: Arc<FetchCache>, spec: PollSpec) -> Self {
        let (state_tx, _) = watch::channel(SessionState::initial());
        let mut session = Self {
            cache,
            spec,
            state_tx: Arc::new(state_tx),
            run: None,
        };
        session.launch();
        session
    }

    fn launch(&mut self) {
        let alive = Arc::new(AtomicBool::new(true));
        self.state_tx.send_replace(SessionState::initial());

        debug!(
            url = %self.spec.url,
            interval_secs = self.spec.interval.as_secs(),
            "Starting polling session"
        );
        let task = tokio::spawn(run_schedule(
            self.cache.clone(),
            self.spec.clone(),
            self.state_tx.clone(),
            alive.clone(),
        ));
        self.run = Some(SessionRun { alive, task });
    }

    pub fn spec(&self) -> &PollSpec {
        &self.spec
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Cancel the schedule. No poll of this run writes state after this returns,
    /// including polls whose request is still in flight.
    pub fn stop(&mut self) {
        if let Some(run) = self.run.take() {
            // Flipped under the channel's write lock.
            self.state_tx.send_if_modified(|_| {
                run.alive.store(false, Ordering::SeqCst);
                false
            });
            run.task.abort();
            debug!(url = %self.spec.url, "Stopped polling session");
        }
    }

    /// Switch to a new URL or interval.
    ///
    /// A changed spec stops the current schedule and starts a fresh one with
    /// the state reset to loading. Returns whether a restart happened.
    pub fn reconfigure(&mut self, spec: PollSpec) -> bool {
        if spec == self.spec && self.is_running() {
            return false;
        }
        self.stop();
        self.spec = spec;
        self.launch();
        true
    }
}

impl Drop for PollingSession {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_schedule(
    cache: Arc<FetchCache>,
    spec: PollSpec,
    state_tx: Arc<watch::Sender<SessionState>>,
    alive: Arc<AtomicBool>,
) {
    poll_once(cache.clone(), spec.url.clone(), state_tx.clone(), alive.clone()).await;

    let Some(start) = Instant::now().checked_add(spec.interval) else {
        warn!(url = %spec.url, "Refresh interval out of range, not rescheduling");
        return;
    };
    let mut ticker = time::interval_at(start, spec.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if !alive.load(Ordering::SeqCst) {
            break;
        }
        // Detached so a slow request never delays the next tick.
        tokio::spawn(poll_once(
            cache.clone(),
            spec.url.clone(),
            state_tx.clone(),
            alive.clone(),
        ));
    }
}

async fn poll_once(
    cache: Arc<FetchCache>,
    url: String,
    state_tx: Arc<watch::Sender<SessionState>>,
    alive: Arc<AtomicBool>,
) {
    let result = cache.resolve(&url).await;
    if let Err(error) = &result {
        warn!(%url, "Poll failed: {}", error);
    }

    let applied = state_tx.send_if_modified(|state| {
        if !alive.load(Ordering::SeqCst) {
            return false;
        }
        state.apply(result);
        true
    });

    if !applied {
        debug!(%url, "Discarded poll result of a stopped session");
    }
}
