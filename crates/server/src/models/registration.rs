//! Pending signups awaiting OTP verification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mise_core::Email;

/// A signup that has been started but not yet verified, id = email.
///
/// Created on signup, refreshed on resend (new code, attempts back to 0),
/// bumped on every failed verification, and deleted only when verification
/// succeeds. Failed or exhausted registrations stay in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRegistration {
    /// Document id (always equals the email).
    pub id: String,
    /// The email being verified.
    pub email: Email,
    /// One-way hashed password, carried into the account on success.
    #[serde(rename = "passwordHash")]
    pub password_hash: String,
    /// Digest of the current verification code.
    #[serde(rename = "otpHash")]
    pub otp_hash: String,
    /// When the current code stops being accepted.
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
    /// Failed verification attempts against the current record.
    pub attempts: u32,
    /// Registration status (always "pending").
    pub status: String,
}

impl PendingRegistration {
    /// Build a fresh pending registration.
    #[must_use]
    pub fn new(
        email: &Email,
        password_hash: String,
        otp_hash: String,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: email.as_str().to_owned(),
            email: email.clone(),
            password_hash,
            otp_hash,
            expires_at,
            attempts: 0,
            status: "pending".to_owned(),
        }
    }

    /// Replace the code and expiry, resetting the attempt counter.
    pub fn refresh(&mut self, otp_hash: String, expires_at: DateTime<Utc>) {
        self.otp_hash = otp_hash;
        self.expires_at = expires_at;
        self.attempts = 0;
    }

    /// Whether the code has expired. The comparison is strict: a request
    /// arriving at the exact expiry instant is still accepted.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn registration(expires_at: DateTime<Utc>) -> PendingRegistration {
        let email = Email::parse("chef@example.com").unwrap();
        PendingRegistration::new(&email, "pw-hash".to_owned(), "otp-hash".to_owned(), expires_at)
    }

    #[test]
    fn test_new_starts_pending_with_zero_attempts() {
        let reg = registration(Utc::now());
        assert_eq!(reg.id, "chef@example.com");
        assert_eq!(reg.attempts, 0);
        assert_eq!(reg.status, "pending");
    }

    #[test]
    fn test_refresh_resets_attempts() {
        let mut reg = registration(Utc::now());
        reg.attempts = 2;
        let new_expiry = Utc::now() + Duration::minutes(10);
        reg.refresh("new-hash".to_owned(), new_expiry);
        assert_eq!(reg.attempts, 0);
        assert_eq!(reg.otp_hash, "new-hash");
        assert_eq!(reg.expires_at, new_expiry);
    }

    #[test]
    fn test_expiry_is_strictly_after() {
        let now = Utc::now();
        let reg = registration(now);
        // At the exact expiry instant the code is still accepted.
        assert!(!reg.is_expired(now));
        assert!(reg.is_expired(now + Duration::microseconds(1)));
    }

    #[test]
    fn test_document_shape() {
        let reg = registration(Utc::now());
        let doc = serde_json::to_value(&reg).unwrap();
        assert_eq!(doc["id"], "chef@example.com");
        assert_eq!(doc["passwordHash"], "pw-hash");
        assert_eq!(doc["otpHash"], "otp-hash");
        assert_eq!(doc["attempts"], 0);
        assert_eq!(doc["status"], "pending");
    }
}
