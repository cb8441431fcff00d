//! Response handling shared by the auth and stats clients.

use crate::{AuthError, AuthResult};
use serde::de::DeserializeOwned;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Length + digest of a response body, safe to log.
pub(crate) fn summarize_response_body(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}

/// Pass success responses through; turn anything else into
/// [`AuthError::Rejected`].
pub(crate) async fn ensure_success(response: reqwest::Response) -> AuthResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let body_summary = summarize_response_body(&body);
    tracing::debug!(status = %status, body_summary = %body_summary, "Endpoint rejected request");

    Err(AuthError::Rejected {
        status: status.as_u16(),
        body_summary,
    })
}

/// Require success, then decode the JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> AuthResult<T> {
    let response = ensure_success(response).await?;
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
