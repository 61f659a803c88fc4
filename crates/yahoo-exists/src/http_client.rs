//! Named cache of reusable HTTP clients.
//!
//! Clients are built lazily on first `get` and shared by every caller using
//! the same name until the owner releases the name with `remove`.

use crate::types::{ExistsError, ExistsResult};
use dashmap::DashMap;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Browser fingerprint sent with every request to the signup flow.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                              AppleWebKit/537.36 (KHTML, like Gecko) \
                              Chrome/129.0.0.0 Safari/537.36";

/// Cache of `reqwest::Client` instances keyed by a logical name.
pub struct HttpClientCache {
    clients: DashMap<String, reqwest::Client>,
    timeout: Duration,
}

impl HttpClientCache {
    /// Create an empty cache whose clients use the given request timeout.
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            clients: DashMap::new(),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Get the client registered under `name`, building it on first use.
    pub fn get(&self, name: &str) -> ExistsResult<reqwest::Client> {
        if let Some(client) = self.clients.get(name) {
            return Ok(client.clone());
        }

        let built = self.build()?;
        let client = self
            .clients
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!("HttpClientCache: created client '{name}'");
                built
            })
            .clone();
        Ok(client)
    }

    /// Release the client registered under `name`.
    ///
    /// Returns `false` when nothing was registered.
    pub fn remove(&self, name: &str) -> bool {
        let removed = self.clients.remove(name).is_some();
        if removed {
            tracing::debug!("HttpClientCache: released client '{name}'");
        }
        removed
    }

    /// Async variant of [`remove`](Self::remove).
    pub async fn remove_async(&self, name: &str) -> bool {
        self.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clients.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    fn build(&self) -> ExistsResult<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(client)
    }
}

impl Default for HttpClientCache {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_TIMEOUT_MS)
    }
}

/// Drive a request future unless `cancel` fires first.
pub(crate) async fn cancellable<F, T>(cancel: &CancellationToken, fut: F) -> ExistsResult<T>
where
    F: Future<Output = Result<T, reqwest::Error>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ExistsError::Cancelled),
        result = fut => Ok(result?),
    }
}
