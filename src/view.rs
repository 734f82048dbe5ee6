use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, error, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::config::Config;
use crate::render::Renderer;
use crate::requests::{FetchError, HttpSource, RecordSource};
use crate::state::{FetchOutcome, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Mounted,
    Unmounted,
}

struct Gate {
    lifecycle: Lifecycle,
    last_applied: u64,
}

struct Shared {
    source: Box<dyn RecordSource>,
    state: watch::Sender<ViewState>,
    gate: Mutex<Gate>,
    next_seq: AtomicU64,
}

impl Shared {
    fn lock_gate(&self) -> MutexGuard<'_, Gate> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn fetch_cycle(&self) -> bool {
        let unmounted = self.lock_gate().lifecycle == Lifecycle::Unmounted;
        if unmounted {
            debug!("View unmounted, skipping fetch");
            return false;
        }

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let outcome = self.source.fetch().await;
        match &outcome {
            Ok(records) => debug!("Fetch #{seq}: {} records", records.len()),
            Err(e) => error!("Fetch #{seq} failed: {e}"),
        }

        self.apply(seq, &outcome)
    }

    fn apply(&self, seq: u64, outcome: &FetchOutcome) -> bool {
        // state writes happen under the gate so unmount() can't interleave
        let mut gate = self.lock_gate();

        if gate.lifecycle == Lifecycle::Unmounted {
            debug!("Fetch #{seq} finished after unmount, discarded");
            return false;
        }
        if seq <= gate.last_applied {
            let last = gate.last_applied;
            debug!("Fetch #{seq} is older than #{last}, discarded");
            return false;
        }

        gate.last_applied = seq;
        self.state.send_modify(|state| state.apply(outcome));
        true
    }
}

/// Polls a [`RecordSource`] on a fixed interval and keeps a [`ViewState`].
///
/// The view is single-use: `mount` starts polling, `unmount` stops it for
/// good. Dropping a mounted view unmounts it.
pub struct PingStatusView {
    shared: Arc<Shared>,
    interval: Duration,
    stop_tx: watch::Sender<bool>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl PingStatusView {
    pub fn new<S>(config: &Config, source: S) -> PingStatusView
    where
        S: RecordSource + 'static,
    {
        let (state, _) = watch::channel(ViewState::default());
        let (stop_tx, _) = watch::channel(false);

        PingStatusView {
            shared: Arc::new(Shared {
                source: Box::new(source),
                state,
                gate: Mutex::new(Gate {
                    lifecycle: Lifecycle::Idle,
                    last_applied: 0,
                }),
                next_seq: AtomicU64::new(0),
            }),
            interval: config.interval,
            stop_tx,
            ticker: Mutex::new(None),
        }
    }

    pub fn http(config: &Config) -> Result<PingStatusView, FetchError> {
        let source = HttpSource::build(config)?;
        Ok(PingStatusView::new(config, source))
    }

    /// Fetches immediately, then once per interval until unmounted.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(&self) {
        {
            let mut gate = self.shared.lock_gate();
            if gate.lifecycle != Lifecycle::Idle {
                debug!("View already {:?}, mount ignored", gate.lifecycle);
                return;
            }
            gate.lifecycle = Lifecycle::Mounted;
        }

        let shared = self.shared.clone();
        let period = self.interval;
        let mut stop_rx = self.stop_tx.subscribe();

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = stop_rx.changed() => break,
                    _ = interval.tick() => {
                        let shared = shared.clone();
                        tokio::spawn(async move {
                            shared.fetch_cycle().await;
                        });
                    }
                }
            }
        });

        *self.lock_ticker() = Some(handle);
        info!("Polling every {}s", period.as_secs_f64());
    }

    /// Stops polling. Fetches still in flight are left to finish but their
    /// results are dropped.
    pub fn unmount(&self) {
        {
            let mut gate = self.shared.lock_gate();
            if gate.lifecycle == Lifecycle::Unmounted {
                return;
            }
            gate.lifecycle = Lifecycle::Unmounted;
        }

        let _ = self.stop_tx.send(true);
        if let Some(handle) = self.lock_ticker().take() {
            handle.abort();
        }
        info!("Polling stopped");
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.lock_gate().lifecycle == Lifecycle::Mounted
    }

    /// Runs one fetch cycle and reports whether its outcome reached the state.
    pub async fn fetch_records(&self) -> bool {
        self.shared.fetch_cycle().await
    }

    pub fn state(&self) -> ViewState {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.shared.state.subscribe()
    }

    pub fn render(&self, renderer: &Renderer) -> String {
        renderer.render(&self.shared.state.borrow())
    }

    fn lock_ticker(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.ticker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for PingStatusView {
    fn drop(&mut self) {
        self.unmount();
    }
}
