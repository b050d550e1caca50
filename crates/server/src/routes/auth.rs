//! Signup, verification, and login handlers.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use mise_core::Email;

use crate::db::UserRepository;
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

/// Request to start a signup.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request to resend a verification code.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResendOtpRequest {
    pub email: Option<String>,
}

/// Request to verify a signup code.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyRequest {
    pub email: Option<String>,
    pub otp: Option<String>,
}

/// Request to log in.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub remember_me: Option<bool>,
}

/// Response for signup and resend.
#[derive(Debug, Serialize)]
pub struct CodeSentResponse {
    pub status: &'static str,
    pub message: String,
    pub email: String,
}

/// The user summary echoed by verify and login.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub email: String,
    pub verified: bool,
}

/// Response carrying a session token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub status: &'static str,
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}

/// Treat empty strings like absent fields.
fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

fn parse_email(raw: &str) -> Result<Email, ApiError> {
    Email::parse(raw).map_err(|_| ApiError::validation("Invalid email address"))
}

/// Start a signup and dispatch a verification code.
///
/// POST /api/auth/signup
#[instrument(skip(state, body))]
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SignupRequest>,
) -> Result<Json<CodeSentResponse>, ApiError> {
    let (Some(email), Some(password)) = (present(body.email), present(body.password)) else {
        return Err(ApiError::validation("Email and password are required"));
    };
    let email = parse_email(&email)?;

    state.registration_service().start(&email, &password).await?;

    Ok(Json(CodeSentResponse {
        status: "success",
        message: "Verification code sent successfully".to_owned(),
        email: email.into_inner(),
    }))
}

/// Resend the verification code for a pending signup.
///
/// POST /api/auth/resend-otp
#[instrument(skip(state, body))]
pub async fn resend_otp(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ResendOtpRequest>,
) -> Result<Json<CodeSentResponse>, ApiError> {
    let Some(email) = present(body.email) else {
        return Err(ApiError::validation("Email is required"));
    };
    let email = parse_email(&email)?;

    state.registration_service().resend(&email).await?;

    Ok(Json(CodeSentResponse {
        status: "success",
        message: "New verification code sent successfully".to_owned(),
        email: email.into_inner(),
    }))
}

/// Verify a signup code, creating the account and issuing a session token.
///
/// POST /api/auth/verify
#[instrument(skip(state, body))]
pub async fn verify_signup(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<VerifyRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let (Some(email), Some(otp)) = (present(body.email), present(body.otp)) else {
        return Err(ApiError::validation("Email and OTP are required"));
    };
    let email = parse_email(&email)?;

    let (user, token) = state.registration_service().verify(&email, &otp).await?;

    Ok(Json(TokenResponse {
        status: "success",
        message: "Email verified successfully".to_owned(),
        token,
        user: UserSummary {
            email: user.email.into_inner(),
            verified: user.verified,
        },
    }))
}

/// Log in with email and password.
///
/// POST /api/auth/login
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let (Some(email), Some(password)) = (present(body.email), present(body.password)) else {
        return Err(ApiError::validation("Email and password are required"));
    };
    let remember_me = body.remember_me.unwrap_or(false);

    // A malformed email cannot name an account; answer like a bad credential
    // rather than leaking which part failed.
    let Ok(email) = Email::parse(&email) else {
        return Err(ApiError::unauthorized("Invalid email or password"));
    };

    let users = UserRepository::new(state.store());
    let Some(mut user) = users.get_by_email(&email).await? else {
        return Err(ApiError::unauthorized("Invalid email or password"));
    };

    let password_matches = bcrypt::verify(&password, &user.password_hash)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !password_matches {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = state
        .issuer()
        .issue(&user.id, remember_me)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    user.last_login = Some(Utc::now());
    users.save(&user).await?;

    tracing::info!(email = %email, remember_me, "Login successful");

    Ok(Json(TokenResponse {
        status: "success",
        message: "Login successful".to_owned(),
        token,
        user: UserSummary {
            email: user.email.into_inner(),
            verified: user.verified,
        },
    }))
}
