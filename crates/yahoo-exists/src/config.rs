//! Validator configuration and resolution.
//!
//! Each setting resolves as explicit value, then environment variable, then
//! built-in default.

use crate::types::{ExistsError, ExistsResult};
use std::time::Duration;

/// Environment variable holding the pacing interval in milliseconds.
pub const INTERVAL_ENV: &str = "YAHOO_EXISTS_INTERVAL_MS";
/// Environment variable holding the per-request timeout in milliseconds.
pub const TIMEOUT_ENV: &str = "YAHOO_EXISTS_TIMEOUT_MS";

pub const DEFAULT_INTERVAL_MS: u64 = 4000;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

const SIGN_UP_PAGE_PATH: &str =
    "/account/create?specId=yidReg&lang=en-US&src=&done=https%3A%2F%2Fwww.yahoo.com&display=login";
const SIGN_UP_API_PATH: &str = "/account/module/create?validateField=yid";
const YAHOO_LOGIN_ORIGIN: &str = "https://login.yahoo.com";

/// URLs of the signup flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Signup page fetched during bootstrap; also sent as `Referer`.
    pub sign_up_page: String,
    /// Field validation endpoint.
    pub sign_up_api: String,
    /// Value of the `Origin` header on the validation call.
    pub origin: String,
}

impl Endpoints {
    /// Same paths as the live service, rooted at `base` (e.g. a local mock).
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            sign_up_page: format!("{base}{SIGN_UP_PAGE_PATH}"),
            sign_up_api: format!("{base}{SIGN_UP_API_PATH}"),
            origin: base.to_string(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::with_base(YAHOO_LOGIN_ORIGIN)
    }
}

/// Settings read once when a validator is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Pacing interval for throttled checks. `None` means "not configured".
    pub interval_ms: Option<u64>,
    /// Per-request timeout of the cached HTTP client.
    pub timeout_ms: u64,
    pub endpoints: Endpoints,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            interval_ms: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            endpoints: Endpoints::default(),
        }
    }
}

impl ValidatorConfig {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> ExistsResult<Self> {
        Self::resolve(
            std::env::var(INTERVAL_ENV).ok().as_deref(),
            std::env::var(TIMEOUT_ENV).ok().as_deref(),
        )
    }

    /// Resolve configuration from raw setting values.
    pub fn resolve(interval: Option<&str>, timeout: Option<&str>) -> ExistsResult<Self> {
        let interval_ms = interval.map(|v| parse_ms(INTERVAL_ENV, v)).transpose()?;
        let timeout_ms = timeout
            .map(|v| parse_ms(TIMEOUT_ENV, v))
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Ok(Self {
            interval_ms,
            timeout_ms,
            endpoints: Endpoints::default(),
        })
    }

    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = Some(interval_ms);
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Effective pacing interval, falling back to the default.
    pub fn interval(&self) -> Duration {
        match self.interval_ms {
            Some(ms) => Duration::from_millis(ms),
            None => {
                tracing::debug!(
                    "{INTERVAL_ENV} was not set, defaulting to {DEFAULT_INTERVAL_MS}ms rate limiting interval"
                );
                Duration::from_millis(DEFAULT_INTERVAL_MS)
            }
        }
    }
}

fn parse_ms(key: &str, raw: &str) -> ExistsResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| ExistsError::Config(format!("{key}={raw:?} is not a millisecond count: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_defaults_to_4000ms() {
        let config = ValidatorConfig::resolve(None, None).unwrap();
        assert_eq!(config.interval_ms, None);
        assert_eq!(config.interval(), Duration::from_millis(4000));
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_interval_from_setting() {
        let config = ValidatorConfig::resolve(Some("1500"), Some(" 2000 ")).unwrap();
        assert_eq!(config.interval(), Duration::from_millis(1500));
        assert_eq!(config.timeout_ms, 2000);
    }

    #[test]
    fn test_bad_interval_is_config_error() {
        let err = ValidatorConfig::resolve(Some("soon"), None).unwrap_err();
        assert!(matches!(err, ExistsError::Config(_)));
    }

    #[test]
    fn test_default_endpoints_point_at_yahoo() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.sign_up_page,
            "https://login.yahoo.com/account/create?specId=yidReg&lang=en-US&src=&done=https%3A%2F%2Fwww.yahoo.com&display=login"
        );
        assert_eq!(
            endpoints.sign_up_api,
            "https://login.yahoo.com/account/module/create?validateField=yid"
        );
        assert_eq!(endpoints.origin, "https://login.yahoo.com");
    }

    #[test]
    fn test_with_base_trims_slash() {
        let endpoints = Endpoints::with_base("http://127.0.0.1:9000/");
        assert_eq!(endpoints.origin, "http://127.0.0.1:9000");
        assert!(endpoints
            .sign_up_api
            .starts_with("http://127.0.0.1:9000/account/module/create"));
    }
}
