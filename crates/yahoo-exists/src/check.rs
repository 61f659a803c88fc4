//! The field validation call and its classification.

use crate::config::Endpoints;
use crate::extract::extract_acrumb;
use crate::http_client::{cancellable, USER_AGENT};
use crate::types::{CheckResponse, ExistenceResult, ExistsResult, SessionContext};
use reqwest::header::{ACCEPT, COOKIE, ORIGIN, REFERER, USER_AGENT as USER_AGENT_HEADER};
use tokio_util::sync::CancellationToken;

const SPEC_ID: &str = "yidReg";

/// Error codes meaning the `userId` is already taken.
///
/// This is the service's current vocabulary; any other outcome, including
/// an empty error list, is read as "available".
const TAKEN_CODES: [&str; 2] = ["IDENTIFIER_NOT_AVAILABLE", "IDENTIFIER_EXISTS"];

/// The part of `email` before the first `@`, or all of it.
pub fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Build the urlencoded validation form for `email`.
pub fn build_form(email: &str, session: &SessionContext) -> Vec<(&'static str, String)> {
    let acrumb = extract_acrumb(&session.cookie_header).unwrap_or_default();
    vec![
        ("acrumb", acrumb.to_string()),
        ("sessionIndex", session.session_token.clone()),
        ("specId", SPEC_ID.to_string()),
        ("userId", local_part(email).to_string()),
    ]
}

/// Classify a decoded validation response.
pub fn classify(response: &CheckResponse) -> ExistenceResult {
    let taken = response.errors.iter().flatten().any(|item| {
        item.name.as_deref() == Some("userId")
            && item
                .error
                .as_deref()
                .is_some_and(|code| TAKEN_CODES.contains(&code))
    });

    if taken {
        ExistenceResult::Exists
    } else {
        ExistenceResult::NotExists
    }
}

/// Classify a raw validation response body. Undecodable bodies are `Unknown`.
pub fn classify_body(body: &str) -> ExistenceResult {
    match serde_json::from_str::<CheckResponse>(body) {
        Ok(response) => classify(&response),
        Err(e) => {
            tracing::warn!("check: could not decode validation response: {e}");
            ExistenceResult::Unknown
        }
    }
}

/// Submit the validation form for `email` using a bootstrapped session.
pub async fn check(
    client: &reqwest::Client,
    endpoints: &Endpoints,
    email: &str,
    session: &SessionContext,
    cancel: &CancellationToken,
) -> ExistsResult<ExistenceResult> {
    let request = client
        .post(&endpoints.sign_up_api)
        .header(ORIGIN, endpoints.origin.as_str())
        .header("X-Requested-With", "XMLHttpRequest")
        .header(USER_AGENT_HEADER, USER_AGENT)
        .header(REFERER, endpoints.sign_up_page.as_str())
        .header(ACCEPT, "*/*")
        .header(COOKIE, session.cookie_header.as_str())
        .form(&build_form(email, session))
        .send();
    let response = cancellable(cancel, request).await?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("check: validation endpoint rejected the call with {status}");
        return Ok(ExistenceResult::Unknown);
    }
    let body = cancellable(cancel, response.text()).await?;

    let result = classify_body(&body);
    match result {
        ExistenceResult::Exists => tracing::debug!("Yahoo account ({email}) exists"),
        ExistenceResult::NotExists => tracing::debug!("Yahoo account ({email}) does NOT exist"),
        ExistenceResult::Unknown => {}
    }
    Ok(result)
}
