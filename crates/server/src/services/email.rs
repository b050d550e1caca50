//! OTP delivery.
//!
//! The [`OtpNotifier`] trait is the whole contract the registration flow
//! has with email: deliver one code to one address, succeed or fail. The
//! SMTP implementation uses lettre; without SMTP configured the server
//! falls back to logging the code, which keeps local development flowing.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use mise_core::Email;

use crate::config::SmtpConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Delivers one-time verification codes.
#[async_trait]
pub trait OtpNotifier: Send + Sync {
    /// Send `code` to `to`.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the message cannot be built or delivered.
    async fn send_otp(&self, to: &Email, code: &str) -> Result<(), EmailError>;
}

/// SMTP-backed notifier.
#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpNotifier {
    /// Create a notifier from SMTP configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &SmtpConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_owned(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl OtpNotifier for SmtpNotifier {
    async fn send_otp(&self, to: &Email, code: &str) -> Result<(), EmailError> {
        let text_body = format!(
            "Your verification code is: {code}\nThis code will expire in 10 minutes."
        );
        let html_body = format!(
            r#"<html>
<body style="font-family: Arial, sans-serif;">
  <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Your Verification Code</h2>
    <p>Your verification code is: <strong style="font-size: 18px;">{code}</strong></p>
    <p>This code will expire in 10 minutes.</p>
    <hr style="border: 1px solid #eee; margin: 20px 0;">
    <p style="color: #666; font-size: 12px;">This is an automated message, please do not reply.</p>
  </div>
</body>
</html>"#
        );

        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .as_str()
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.as_str().to_owned()))?)
            .subject("Your Verification Code")
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )?;

        self.mailer.send(message).await?;

        tracing::info!(to = %to, "Verification code sent");
        Ok(())
    }
}

/// Notifier used when SMTP is not configured: logs the code instead of
/// sending it. Never use outside local development.
pub struct LogNotifier;

#[async_trait]
impl OtpNotifier for LogNotifier {
    async fn send_otp(&self, to: &Email, code: &str) -> Result<(), EmailError> {
        tracing::warn!(
            to = %to,
            code = %code,
            "SMTP not configured - verification code logged (dev mode)"
        );
        Ok(())
    }
}

/// Test notifier that records every dispatch and can be told to fail.
#[cfg(test)]
pub struct RecordingNotifier {
    pub sent: std::sync::Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: std::sync::Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: std::sync::Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// The most recently dispatched code for `to`, if any.
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .iter()
            .rev()
            .find(|(recipient, _)| recipient == to)
            .map(|(_, code)| code.clone())
    }

    pub fn dispatch_count(&self) -> usize {
        self.sent.lock().expect("notifier mutex poisoned").len()
    }
}

#[cfg(test)]
#[async_trait]
impl OtpNotifier for RecordingNotifier {
    async fn send_otp(&self, to: &Email, code: &str) -> Result<(), EmailError> {
        if self.fail {
            return Err(EmailError::InvalidAddress(to.as_str().to_owned()));
        }
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push((to.as_str().to_owned(), code.to_owned()));
        Ok(())
    }
}
