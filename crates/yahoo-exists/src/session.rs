//! Session bootstrap: one visit to the signup page.

use crate::config::Endpoints;
use crate::extract::{extract_acrumb, extract_session_index, join_cookies};
use crate::http_client::{cancellable, USER_AGENT};
use crate::types::{ExistsError, ExistsResult, SessionContext};
use reqwest::header::{HeaderMap, SET_COOKIE, USER_AGENT as USER_AGENT_HEADER};
use tokio_util::sync::CancellationToken;

/// Fetch the signup page and capture the cookie header and `sessionIndex`.
///
/// A non-success status is an error. Missing cookies or tokens yield
/// `Ok(None)`: the page was served but cannot support a validation call.
pub async fn bootstrap(
    client: &reqwest::Client,
    endpoints: &Endpoints,
    cancel: &CancellationToken,
) -> ExistsResult<Option<SessionContext>> {
    let request = client
        .get(&endpoints.sign_up_page)
        .header(USER_AGENT_HEADER, USER_AGENT)
        .send();
    let response = cancellable(cancel, request).await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ExistsError::Status {
            status: status.as_u16(),
            url: endpoints.sign_up_page.clone(),
        });
    }

    let cookies = set_cookie_values(response.headers());
    if cookies.is_empty() {
        tracing::error!("bootstrap: signup page returned no Set-Cookie header");
        return Ok(None);
    }

    let cookie_header = join_cookies(cookies.iter().map(String::as_str));
    if extract_acrumb(&cookie_header).filter(|v| !v.is_empty()).is_none() {
        tracing::error!("bootstrap: no acrumb found in signup cookies");
        return Ok(None);
    }

    let body = cancellable(cancel, response.text()).await?;
    let Some(session_token) = extract_session_index(&body).filter(|v| !v.is_empty()) else {
        tracing::error!("bootstrap: no sessionIndex found in signup page body");
        return Ok(None);
    };

    Ok(Some(SessionContext {
        session_token: session_token.to_string(),
        cookie_header,
    }))
}

/// Every `Set-Cookie` value, decoded lossily so none are skipped.
fn set_cookie_values(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect()
}
