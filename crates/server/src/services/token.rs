//! Session token issuing.
//!
//! Tokens are HS256 JWTs carrying the user id, issue time, and an absolute
//! expiry. No endpoint in this service consumes them, but any collaborator
//! that does must reject a bad signature or a passed expiry - [`verify`]
//! implements that contract.
//!
//! [`verify`]: SessionIssuer::verify

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

/// Claims embedded in a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id (email).
    pub sub: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Issues and verifies signed session tokens.
pub struct SessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl: Duration,
    remember_me_ttl: Duration,
}

impl SessionIssuer {
    /// Build an issuer from the authentication configuration.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            token_ttl: config.token_ttl,
            remember_me_ttl: config.remember_me_ttl,
        }
    }

    /// Issue a token for `user_id`. `remember_me` selects the long expiry.
    ///
    /// # Errors
    ///
    /// Returns `jsonwebtoken::errors::Error` if signing fails.
    pub fn issue(
        &self,
        user_id: &str,
        remember_me: bool,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let ttl = if remember_me {
            self.remember_me_ttl
        } else {
            self.token_ttl
        };
        let claims = Claims {
            sub: user_id.to_owned(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify a token's signature and expiry, returning its claims.
    ///
    /// # Errors
    ///
    /// Returns `jsonwebtoken::errors::Error` if the signature is invalid or
    /// the expiry has passed.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))?;
        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn config(token_ttl: Duration) -> AuthConfig {
        AuthConfig {
            jwt_secret: SecretString::from("kX9#mP2$vL8@qR5!wT3%yU7&zA1*bC4^"),
            token_ttl,
            remember_me_ttl: Duration::days(30),
            otp_ttl: Duration::minutes(10),
        }
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let issuer = SessionIssuer::new(&config(Duration::hours(24)));
        let token = issuer.issue("chef@example.com", false).unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, "chef@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_remember_me_extends_expiry() {
        let issuer = SessionIssuer::new(&config(Duration::hours(24)));
        let short = issuer.issue("chef@example.com", false).unwrap();
        let long = issuer.issue("chef@example.com", true).unwrap();

        let short_exp = issuer.verify(&short).unwrap().exp;
        let long_exp = issuer.verify(&long).unwrap().exp;
        // 30 days vs 24 hours, allow a couple of seconds of skew.
        let difference = long_exp - short_exp;
        assert!((difference - 29 * 24 * 3600).abs() < 5);
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let issuer = SessionIssuer::new(&config(Duration::hours(24)));
        let token = issuer.issue("chef@example.com", false).unwrap();

        let mut other_config = config(Duration::hours(24));
        other_config.jwt_secret = SecretString::from("d7F!jK0@nQ3#sV6$xZ9%cE2&hM5*pT8^");
        let other = SessionIssuer::new(&other_config);
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        // Expiry in the past, beyond the default 60s validation leeway.
        let issuer = SessionIssuer::new(&config(Duration::minutes(-5)));
        let token = issuer.issue("chef@example.com", false).unwrap();
        assert!(issuer.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let issuer = SessionIssuer::new(&config(Duration::hours(24)));
        assert!(issuer.verify("not-a-token").is_err());
    }
}
