//! yahoo-exists — check whether a Yahoo account exists for an email address.
//!
//! A check visits the public signup page to collect the `acrumb` cookie
//! token and the `sessionIndex` page token, then submits the `userId` field
//! to the signup form's validation endpoint and reads the error codes it
//! returns. Throttled checks go through a named [`IntervalGate`] so repeated
//! calls against the service are paced.

pub mod check;
pub mod config;
pub mod extract;
pub mod http_client;
pub mod rate_limit;
pub mod session;
pub mod types;
pub mod validator;

pub use config::{Endpoints, ValidatorConfig};
pub use http_client::HttpClientCache;
pub use rate_limit::{IntervalGate, RateLimitingFactory};
pub use types::*;
pub use validator::{EmailExistsValidator, YahooExistsValidator, RESOURCE_KEY};

pub use tokio_util::sync::CancellationToken;
