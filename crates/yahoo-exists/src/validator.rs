//! The Yahoo account existence validator.

use crate::check::check;
use crate::config::ValidatorConfig;
use crate::http_client::HttpClientCache;
use crate::rate_limit::RateLimitingFactory;
use crate::session::bootstrap;
use crate::types::{ExistenceResult, ExistsResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Name shared by this validator's HTTP client and interval gate.
pub const RESOURCE_KEY: &str = "YahooExistsValidator";

/// A validator answering "does an account exist for this email?".
#[async_trait]
pub trait EmailExistsValidator: Send + Sync {
    /// Check through the shared interval gate.
    async fn email_exists(
        &self,
        email: &str,
        cancel: &CancellationToken,
    ) -> ExistsResult<ExistenceResult>;

    /// Check immediately, bypassing the interval gate.
    async fn email_exists_without_limit(
        &self,
        email: &str,
        cancel: &CancellationToken,
    ) -> ExistsResult<ExistenceResult>;
}

/// Checks Yahoo account existence through the signup form.
///
/// Dropping the validator releases its cached HTTP client.
pub struct YahooExistsValidator {
    http_clients: Arc<HttpClientCache>,
    rate_limiting: Arc<RateLimitingFactory>,
    config: ValidatorConfig,
    interval: Duration,
}

impl YahooExistsValidator {
    pub fn new(
        http_clients: Arc<HttpClientCache>,
        rate_limiting: Arc<RateLimitingFactory>,
        config: ValidatorConfig,
    ) -> Self {
        let interval = config.interval();
        Self {
            http_clients,
            rate_limiting,
            config,
            interval,
        }
    }

    /// Build a standalone validator from environment configuration.
    pub fn from_env() -> ExistsResult<Self> {
        let config = ValidatorConfig::from_env()?;
        Ok(Self::new(
            Arc::new(HttpClientCache::new(config.timeout_ms)),
            Arc::new(RateLimitingFactory::new()),
            config,
        ))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Release the cached HTTP client. Safe to call any number of times.
    ///
    /// The client is removed by name on every call, so a client registered
    /// under the same name since the last dispose is released too.
    pub fn dispose(&self) {
        self.http_clients.remove(RESOURCE_KEY);
    }

    /// Async variant of [`dispose`](Self::dispose).
    pub async fn dispose_async(&self) {
        self.http_clients.remove_async(RESOURCE_KEY).await;
    }

    async fn run_check(
        &self,
        email: &str,
        cancel: &CancellationToken,
    ) -> ExistsResult<ExistenceResult> {
        tracing::debug!("Checking if Yahoo account ({email}) exists...");

        let client = self.http_clients.get(RESOURCE_KEY)?;
        let endpoints = &self.config.endpoints;

        let Some(session) = bootstrap(&client, endpoints, cancel).await? else {
            tracing::error!(
                "Failed to retrieve necessary data while checking if Yahoo account ({email}) exists, exiting early"
            );
            return Ok(ExistenceResult::Unknown);
        };

        check(&client, endpoints, email, &session, cancel).await
    }
}

#[async_trait]
impl EmailExistsValidator for YahooExistsValidator {
    async fn email_exists(
        &self,
        email: &str,
        cancel: &CancellationToken,
    ) -> ExistsResult<ExistenceResult> {
        let gate = self.rate_limiting.get(RESOURCE_KEY, self.interval);
        gate.execute(|ct| async move { self.run_check(email, &ct).await }, cancel)
            .await
    }

    async fn email_exists_without_limit(
        &self,
        email: &str,
        cancel: &CancellationToken,
    ) -> ExistsResult<ExistenceResult> {
        self.run_check(email, cancel).await
    }
}

impl Drop for YahooExistsValidator {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(clients: Arc<HttpClientCache>) -> YahooExistsValidator {
        YahooExistsValidator::new(
            clients,
            Arc::new(RateLimitingFactory::new()),
            ValidatorConfig::default(),
        )
    }

    #[test]
    fn test_default_interval() {
        let v = validator(Arc::new(HttpClientCache::default()));
        assert_eq!(v.interval(), Duration::from_millis(4000));
    }

    #[test]
    fn test_dispose_without_client_is_safe() {
        let v = validator(Arc::new(HttpClientCache::default()));
        v.dispose();
        v.dispose();
    }

    #[test]
    fn test_dispose_releases_client_every_time() {
        let clients = Arc::new(HttpClientCache::default());
        let v = validator(clients.clone());
        clients.get(RESOURCE_KEY).unwrap();
        v.dispose();
        assert!(!clients.contains(RESOURCE_KEY));

        // Registered again under the same name after the first dispose.
        clients.get(RESOURCE_KEY).unwrap();
        v.dispose();
        assert!(!clients.contains(RESOURCE_KEY));
    }

    #[tokio::test]
    async fn test_dispose_async_and_drop() {
        let clients = Arc::new(HttpClientCache::default());
        let v = validator(clients.clone());
        v.dispose_async().await;
        v.dispose_async().await;

        let v = validator(clients.clone());
        clients.get(RESOURCE_KEY).unwrap();
        drop(v);
        assert!(!clients.contains(RESOURCE_KEY));
    }
}
