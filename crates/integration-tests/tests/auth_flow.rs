//! Integration tests for the signup and login flow.
//!
//! These tests require a running `mise-server` (see crate docs). They only
//! exercise the paths that do not need the emailed code: validation,
//! conflict, and not-found behavior. The full verify path is covered by the
//! in-process tests in `mise-server`.
//!
//! Run with: cargo test -p mise-integration-tests -- --ignored

use reqwest::Client;
use serde_json::json;

use mise_integration_tests::{post_json, unique_email};

#[tokio::test]
#[ignore = "Requires running mise-server"]
async fn test_signup_rejects_missing_fields() {
    let client = Client::new();

    let (status, body) = post_json(&client, "/api/auth/signup", &json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(
        body["error"]["message"], "Email and password are required",
        "canonical error envelope"
    );
}

#[tokio::test]
#[ignore = "Requires running mise-server"]
async fn test_signup_rejects_weak_password() {
    let client = Client::new();
    let email = unique_email("weak");

    let (status, body) = post_json(
        &client,
        "/api/auth/signup",
        &json!({"email": email, "password": "short"}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(
        body["error"]["message"],
        "Password must be at least 8 characters long"
    );
}

#[tokio::test]
#[ignore = "Requires running mise-server"]
async fn test_signup_creates_pending_registration() {
    let client = Client::new();
    let email = unique_email("signup");

    let (status, body) = post_json(
        &client,
        "/api/auth/signup",
        &json!({"email": email, "password": "longpw123"}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert_eq!(body["email"], email);

    // A resend now succeeds (the pending registration exists).
    let (status, _) = post_json(&client, "/api/auth/resend-otp", &json!({"email": email})).await;
    assert_eq!(status, 200);
}

#[tokio::test]
#[ignore = "Requires running mise-server"]
async fn test_resend_without_pending_is_not_found() {
    let client = Client::new();
    let email = unique_email("noreg");

    let (status, body) = post_json(&client, "/api/auth/resend-otp", &json!({"email": email})).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["message"], "No pending registration found");
}

#[tokio::test]
#[ignore = "Requires running mise-server"]
async fn test_login_with_unknown_account_is_unauthorized() {
    let client = Client::new();
    let email = unique_email("nologin");

    let (status, body) = post_json(
        &client,
        "/api/auth/login",
        &json!({"email": email, "password": "longpw123"}),
    )
    .await;
    assert_eq!(status, 401);
    assert_eq!(body["error"]["message"], "Invalid email or password");
}

#[tokio::test]
#[ignore = "Requires running mise-server"]
async fn test_verify_without_pending_is_not_found() {
    let client = Client::new();
    let email = unique_email("noverify");

    let (status, _) = post_json(
        &client,
        "/api/auth/verify",
        &json!({"email": email, "otp": "123456"}),
    )
    .await;
    assert_eq!(status, 404);
}
