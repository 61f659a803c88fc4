//! Core data types for existence checks.

use serde::{Deserialize, Serialize};

/// Outcome of a single existence check.
///
/// `Unknown` means the check could not reach a definitive answer (missing
/// cookies, missing page token, undecodable response). It is never the same
/// thing as `NotExists`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExistenceResult {
    Exists,
    NotExists,
    Unknown,
}

impl ExistenceResult {
    /// Collapse into the tri-state `Option<bool>` form (`None` = unknown).
    pub fn as_option(self) -> Option<bool> {
        match self {
            ExistenceResult::Exists => Some(true),
            ExistenceResult::NotExists => Some(false),
            ExistenceResult::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        self != ExistenceResult::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExistenceResult::Exists => "exists",
            ExistenceResult::NotExists => "not-exists",
            ExistenceResult::Unknown => "unknown",
        }
    }
}

impl From<Option<bool>> for ExistenceResult {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => ExistenceResult::Exists,
            Some(false) => ExistenceResult::NotExists,
            None => ExistenceResult::Unknown,
        }
    }
}

impl std::fmt::Display for ExistenceResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cookie header and page token captured from one signup page visit.
///
/// Both values come from the same response and are only valid together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Every `Set-Cookie` value of the bootstrap response joined with `;`.
    pub cookie_header: String,
    /// The `sessionIndex` hidden input value.
    pub session_token: String,
}

/// Decoded body of the field validation endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckResponse {
    #[serde(default)]
    pub errors: Option<Vec<CheckErrorItem>>,
}

/// One entry of the `errors` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckErrorItem {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// All errors that can interrupt an existence check.
///
/// Scraping fragility (missing tokens, bad JSON) is not represented here; it
/// is folded into [`ExistenceResult::Unknown`].
#[derive(thiserror::Error, Debug)]
pub enum ExistsError {
    #[error("Request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Check cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExistsError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExistsError::Cancelled)
    }
}

/// Convenience result type.
pub type ExistsResult<T> = Result<T, ExistsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tri_state_mapping() {
        assert_eq!(ExistenceResult::Exists.as_option(), Some(true));
        assert_eq!(ExistenceResult::NotExists.as_option(), Some(false));
        assert_eq!(ExistenceResult::Unknown.as_option(), None);
        assert_eq!(ExistenceResult::from(None), ExistenceResult::Unknown);
        assert!(!ExistenceResult::Unknown.is_known());
    }

    #[test]
    fn test_check_response_tolerates_missing_fields() {
        let resp: CheckResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.errors.is_none());

        let resp: CheckResponse =
            serde_json::from_str(r#"{"errors":[{"name":"userId"},{"error":"X","extra":1}]}"#)
                .unwrap();
        let errors = resp.errors.unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].name.as_deref(), Some("userId"));
        assert!(errors[0].error.is_none());
        assert_eq!(errors[1].error.as_deref(), Some("X"));
    }

    #[test]
    fn test_serialized_result_is_snake_case() {
        let json = serde_json::to_string(&ExistenceResult::NotExists).unwrap();
        assert_eq!(json, "\"not_exists\"");
    }
}
