//! Unified error handling for the API.
//!
//! Every handler failure funnels into [`ApiError`], which renders the
//! canonical error envelope `{"error": {"message": "..."}}` with the
//! matching status code. External-collaborator failures (store, notifier)
//! are fatal to the request; there is no retry and no partial success.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;
use crate::models::MutationError;
use crate::services::{EmailError, RegistrationError};

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// No such aggregate, item, or registration.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate signup.
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// The verification code has expired.
    #[error("Verification code has expired")]
    OtpExpired,

    /// The submitted verification code does not match.
    #[error("Invalid verification code")]
    OtpInvalid,

    /// Too many failed verification attempts.
    #[error("Too many failed attempts")]
    OtpExhausted,

    /// The notification could not be delivered.
    #[error("Failed to send verification code")]
    Delivery(#[source] EmailError),

    /// Store operation failed.
    #[error("database error: {0}")]
    Store(#[from] StoreError),

    /// Internal server error.
    #[error("An unexpected error occurred: {0}")]
    Internal(String),
}

impl ApiError {
    /// Build a `Validation` error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Build a `NotFound` error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Build an `Unauthorized` error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::OtpExpired | Self::OtpInvalid | Self::OtpExhausted => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Delivery(_) | Self::Store(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Store(_) | Self::Internal(_) | Self::Delivery(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = json!({ "error": { "message": self.to_string() } });
        (self.status(), Json(body)).into_response()
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::AlreadyRegistered => Self::Conflict(err.to_string()),
            RegistrationError::WeakPassword => Self::Validation(err.to_string()),
            RegistrationError::NoPendingRegistration => Self::NotFound(err.to_string()),
            RegistrationError::Expired => Self::OtpExpired,
            RegistrationError::InvalidCode => Self::OtpInvalid,
            RegistrationError::Exhausted => Self::OtpExhausted,
            RegistrationError::Delivery(inner) => Self::Delivery(inner),
            RegistrationError::Store(inner) => Self::Store(inner),
            RegistrationError::PasswordHash(inner) => Self::Internal(inner.to_string()),
            RegistrationError::Token(inner) => Self::Internal(inner.to_string()),
        }
    }
}

impl From<MutationError> for ApiError {
    fn from(err: MutationError) -> Self {
        match err {
            MutationError::ItemNotFound => Self::NotFound("Inventory item not found".to_owned()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(ApiError::validation("missing")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::not_found("gone")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApiError::Conflict("dup".to_owned())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ApiError::unauthorized("nope")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(ApiError::OtpExpired), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ApiError::OtpInvalid), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ApiError::OtpExhausted), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(ApiError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_registration_error_mapping() {
        assert_eq!(
            status_of(RegistrationError::AlreadyRegistered.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(RegistrationError::NoPendingRegistration.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(RegistrationError::Exhausted.into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ApiError::OtpExpired.to_string(), "Verification code has expired");
        assert_eq!(ApiError::OtpInvalid.to_string(), "Invalid verification code");
        assert_eq!(ApiError::OtpExhausted.to_string(), "Too many failed attempts");
    }
}
