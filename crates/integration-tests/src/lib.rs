//! Integration test helpers for Mise.
//!
//! The tests in `tests/` drive a running `mise-server` over HTTP. They are
//! `#[ignore]`d by default; run them with a server listening on
//! `MISE_BASE_URL` (default `http://localhost:3000`):
//!
//! ```bash
//! cargo test -p mise-integration-tests -- --ignored
//! ```
//!
//! Run the server without SMTP so verification codes land in its log, or
//! point `MISE_BASE_URL` at a staging deployment with a mail sink.

#![cfg_attr(not(test), forbid(unsafe_code))]

use serde_json::Value;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("MISE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// A unique email per test run, so reruns never collide on the
/// one-account-per-email invariant.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}+{}@integration.test", uuid::Uuid::new_v4())
}

/// POST a JSON body and return (status, parsed body).
///
/// # Panics
///
/// Panics if the request cannot be sent or the response is not JSON.
pub async fn post_json(client: &reqwest::Client, path: &str, body: &Value) -> (u16, Value) {
    let response = client
        .post(format!("{}{path}", base_url()))
        .json(body)
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status().as_u16();
    let body = response.json().await.expect("Failed to parse response");
    (status, body)
}
