//! Sliding-window requests-per-second aggregator.
//!
//! Requests are ingested as timestamps per `(path, method)`. A single
//! background task collapses the window once per tick: timestamps older than
//! the window are dropped and the remaining count divided by the window
//! length becomes the `requests_per_second` gauge.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::registry::Metrics;

type Window = HashMap<String, HashMap<String, VecDeque<Instant>>>;

/// Current time on the runtime clock, so paused-time tests stay consistent.
pub fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Per-route request timestamps within a trailing window.
#[derive(Debug)]
pub struct RpsAggregator {
    window: Duration,
    metrics: Arc<Metrics>,
    requests: Mutex<Window>,
}

impl RpsAggregator {
    /// Creates an empty aggregator that publishes into `metrics`.
    pub fn new(window: Duration, metrics: Arc<Metrics>) -> Self {
        Self {
            window,
            metrics,
            requests: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Window> {
        // The map stays structurally valid even if a holder panicked.
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records one request at `at`.
    pub fn record(&self, path: &str, method: &str, at: Instant) {
        let mut requests = self.lock();
        requests
            .entry(path.to_string())
            .or_default()
            .entry(method.to_string())
            .or_default()
            .push_back(at);
    }

    /// Prunes timestamps older than the window and publishes the gauges.
    ///
    /// Emptied method buckets are removed, then emptied path buckets.
    pub fn collapse(&self, now: Instant) {
        let window_secs = self.window.as_secs_f64();
        let mut updates = Vec::new();

        {
            let mut requests = self.lock();
            requests.retain(|path, methods| {
                methods.retain(|method, stamps| {
                    // Ingest order is not time order: callers read the clock
                    // before taking the lock.
                    stamps.retain(|ts| now.saturating_duration_since(*ts) <= self.window);
                    updates.push((path.clone(), method.clone(), stamps.len() as f64 / window_secs));
                    !stamps.is_empty()
                });
                !methods.is_empty()
            });
        }

        for (path, method, rps) in updates {
            self.metrics.set_rps(&path, &method, rps);
        }
    }

    /// Number of timestamps currently held for one route.
    pub fn pending(&self, path: &str, method: &str) -> usize {
        self.lock()
            .get(path)
            .and_then(|methods| methods.get(method))
            .map_or(0, VecDeque::len)
    }

    /// Whether no route holds any timestamps.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Runs [`collapse`](Self::collapse) every `tick` until `shutdown` flips
    /// to `true` or its sender is dropped.
    pub fn spawn(self: Arc<Self>, tick: Duration, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(window = ?self.window, tick = ?tick, "RPS aggregator started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => self.collapse(now()),
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            debug!("RPS aggregator stopped");
        })
    }
}
