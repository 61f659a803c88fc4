//! Interval gates keyed by resource name.
//!
//! A gate lets at most one execution start per interval. Callers that arrive
//! early wait in FIFO order for their slot; nobody is rejected.

use crate::types::{ExistsError, ExistsResult};
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Pacing gate for a single named resource.
pub struct IntervalGate {
    name: String,
    interval: Duration,
    /// Start time of the most recent execution. Held for the whole execution
    /// so runs never overlap.
    last_start: Mutex<Option<Instant>>,
}

impl IntervalGate {
    pub fn new(name: impl Into<String>, interval: Duration) -> Self {
        Self {
            name: name.into(),
            interval,
            last_start: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for the next free slot, then run `f`.
    ///
    /// `f` receives a child of `cancel`. Cancelling while queued returns
    /// [`ExistsError::Cancelled`] without running `f`.
    pub async fn execute<F, Fut, T>(&self, f: F, cancel: &CancellationToken) -> ExistsResult<T>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ExistsResult<T>>,
    {
        let mut last_start = tokio::select! {
            _ = cancel.cancelled() => return Err(ExistsError::Cancelled),
            guard = self.last_start.lock() => guard,
        };

        if let Some(previous) = *last_start {
            let ready_at = previous + self.interval;
            if ready_at > Instant::now() {
                tracing::debug!(
                    "IntervalGate '{}': waiting {:?} for next slot",
                    self.name,
                    ready_at - Instant::now()
                );
                tokio::select! {
                    _ = cancel.cancelled() => return Err(ExistsError::Cancelled),
                    _ = tokio::time::sleep_until(ready_at) => {}
                }
            }
        }

        *last_start = Some(Instant::now());
        f(cancel.child_token()).await
    }
}

/// Registry of interval gates, one per resource name.
///
/// Gates are created on first request and live as long as the factory.
#[derive(Default)]
pub struct RateLimitingFactory {
    gates: DashMap<String, Arc<IntervalGate>>,
}

impl RateLimitingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the gate for `name`, creating it with `interval` if absent.
    ///
    /// The interval of an existing gate is not changed.
    pub fn get(&self, name: &str, interval: Duration) -> Arc<IntervalGate> {
        self.gates
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!("RateLimitingFactory: created gate '{name}' ({interval:?})");
                Arc::new(IntervalGate::new(name, interval))
            })
            .clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.gates.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}
