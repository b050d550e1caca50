//! The signup verification flow.
//!
//! A registration moves through: no record, pending, then verified (account
//! created, record deleted), expired (record left as-is), or exhausted
//! (three failed attempts; the record also survives, and only a resend
//! revives it). All transitions run against the store through full-document
//! writes.

use chrono::{Duration, Utc};
use thiserror::Error;

use mise_core::Email;

use crate::db::{DocumentStore, RegistrationRepository, StoreError, UserRepository};
use crate::models::{PendingRegistration, UserAccount};
use crate::services::email::{EmailError, OtpNotifier};
use crate::services::otp;
use crate::services::token::SessionIssuer;

/// Failed verification attempts allowed before a registration locks.
pub const MAX_OTP_ATTEMPTS: u32 = 3;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors from the registration flow.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// An account already exists for this email.
    #[error("Email already registered")]
    AlreadyRegistered,

    /// The password is too short.
    #[error("Password must be at least 8 characters long")]
    WeakPassword,

    /// No pending registration exists for this email.
    #[error("No pending registration found")]
    NoPendingRegistration,

    /// The verification code has expired.
    #[error("Verification code has expired")]
    Expired,

    /// The submitted code does not match.
    #[error("Invalid verification code")]
    InvalidCode,

    /// Three failed attempts; only a resend can revive the registration.
    #[error("Too many failed attempts")]
    Exhausted,

    /// The code could not be delivered. The pending record stays written.
    #[error("Failed to send verification code")]
    Delivery(#[source] EmailError),

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Password hashing failure.
    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// Token signing failure.
    #[error("token signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Orchestrates signup, resend, and verification.
pub struct RegistrationService<'a> {
    store: &'a dyn DocumentStore,
    notifier: &'a dyn OtpNotifier,
    issuer: &'a SessionIssuer,
    otp_ttl: Duration,
}

impl<'a> RegistrationService<'a> {
    /// Create a new registration service.
    #[must_use]
    pub const fn new(
        store: &'a dyn DocumentStore,
        notifier: &'a dyn OtpNotifier,
        issuer: &'a SessionIssuer,
        otp_ttl: Duration,
    ) -> Self {
        Self {
            store,
            notifier,
            issuer,
            otp_ttl,
        }
    }

    /// Start a signup: hash the password, write a pending registration with
    /// a fresh code, and dispatch the code.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRegistered` if an account exists for this email,
    /// `WeakPassword` for a short password, `Delivery` if the code could not
    /// be sent (the pending record stays written; a resend recovers).
    pub async fn start(&self, email: &Email, password: &str) -> Result<(), RegistrationError> {
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(RegistrationError::WeakPassword);
        }

        let users = UserRepository::new(self.store);
        if users.exists(email).await? {
            return Err(RegistrationError::AlreadyRegistered);
        }

        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
        let code = otp::generate_code();
        let registration = PendingRegistration::new(
            email,
            password_hash,
            otp::hash_code(&code),
            Utc::now() + self.otp_ttl,
        );

        RegistrationRepository::new(self.store)
            .save(&registration)
            .await?;

        // Not rolled back on delivery failure; resend reuses the record.
        self.notifier
            .send_otp(email, &code)
            .await
            .map_err(RegistrationError::Delivery)?;

        tracing::info!(email = %email, "Signup started, verification code dispatched");
        Ok(())
    }

    /// Issue a fresh code for an existing pending registration, resetting
    /// the attempt counter.
    ///
    /// # Errors
    ///
    /// Returns `NoPendingRegistration` if no signup is in flight, `Delivery`
    /// if the code could not be sent (same semantics as `start`).
    pub async fn resend(&self, email: &Email) -> Result<(), RegistrationError> {
        let registrations = RegistrationRepository::new(self.store);
        let mut registration = registrations
            .get_by_email(email)
            .await?
            .ok_or(RegistrationError::NoPendingRegistration)?;

        let code = otp::generate_code();
        registration.refresh(otp::hash_code(&code), Utc::now() + self.otp_ttl);
        registrations.save(&registration).await?;

        self.notifier
            .send_otp(email, &code)
            .await
            .map_err(RegistrationError::Delivery)?;

        tracing::info!(email = %email, "Verification code resent");
        Ok(())
    }

    /// Verify a submitted code. On success: creates the account, deletes the
    /// pending registration, and returns the account with a session token.
    ///
    /// # Errors
    ///
    /// Returns `NoPendingRegistration`, `Expired`, `Exhausted` (already at
    /// the attempt limit, or the failure that reaches it), or `InvalidCode`.
    pub async fn verify(
        &self,
        email: &Email,
        code: &str,
    ) -> Result<(UserAccount, String), RegistrationError> {
        let registrations = RegistrationRepository::new(self.store);
        let mut registration = registrations
            .get_by_email(email)
            .await?
            .ok_or(RegistrationError::NoPendingRegistration)?;

        let now = Utc::now();
        if registration.is_expired(now) {
            return Err(RegistrationError::Expired);
        }

        // A registration that already burned its attempts stays locked until
        // a resend, even for a correct code.
        if registration.attempts >= MAX_OTP_ATTEMPTS {
            return Err(RegistrationError::Exhausted);
        }

        if otp::hash_code(code) != registration.otp_hash {
            registration.attempts += 1;
            registrations.save(&registration).await?;

            if registration.attempts >= MAX_OTP_ATTEMPTS {
                return Err(RegistrationError::Exhausted);
            }
            return Err(RegistrationError::InvalidCode);
        }

        let user = UserAccount::new_verified(email, registration.password_hash.clone(), now);
        UserRepository::new(self.store).create(&user).await?;
        registrations.delete(email).await?;

        let token = self.issuer.issue(&user.id, false)?;

        tracing::info!(email = %email, "Email verified, account created");
        Ok((user, token))
    }
}
