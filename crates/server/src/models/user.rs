//! Verified user accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mise_core::Email;

/// A verified user account, id = email.
///
/// Created exactly once per email, only by a successful OTP verification.
/// Never deleted by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    /// Document id (always equals the email).
    pub id: String,
    /// The owner's email address.
    pub email: Email,
    /// One-way hashed login credential (bcrypt).
    #[serde(rename = "passwordHash")]
    pub password_hash: String,
    /// When verification succeeded and the account was created.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Whether the email was verified (always true; accounts only exist
    /// after verification).
    pub verified: bool,
    /// Account status ("active").
    pub status: String,
    /// Whether the profile fields below have been filled in.
    #[serde(rename = "profileComplete")]
    pub profile_complete: bool,
    /// Last successful login, if any.
    #[serde(
        rename = "lastLogin",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_login: Option<DateTime<Utc>>,
    /// Last profile update, if any.
    #[serde(
        rename = "updatedAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    /// Optional profile fields, filled in by the profile update endpoint.
    #[serde(flatten)]
    pub profile: Profile,
}

/// Profile fields a user fills in after verification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl UserAccount {
    /// Build the account created at verification success.
    #[must_use]
    pub fn new_verified(email: &Email, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: email.as_str().to_owned(),
            email: email.clone(),
            password_hash,
            created_at: now,
            verified: true,
            status: "active".to_owned(),
            profile_complete: false,
            last_login: None,
            updated_at: None,
            profile: Profile::default(),
        }
    }

    /// Apply a full profile update, marking the profile complete.
    pub fn apply_profile(&mut self, profile: Profile, now: DateTime<Utc>) {
        self.profile = profile;
        self.profile_complete = true;
        self.updated_at = Some(now);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn account() -> UserAccount {
        let email = Email::parse("chef@example.com").unwrap();
        UserAccount::new_verified(&email, "hash".to_owned(), Utc::now())
    }

    #[test]
    fn test_new_verified_defaults() {
        let user = account();
        assert_eq!(user.id, "chef@example.com");
        assert!(user.verified);
        assert_eq!(user.status, "active");
        assert!(!user.profile_complete);
        assert!(user.last_login.is_none());
    }

    #[test]
    fn test_apply_profile_marks_complete() {
        let mut user = account();
        user.apply_profile(
            Profile {
                first_name: Some("Jules".to_owned()),
                last_name: Some("Verne".to_owned()),
                company_name: Some("Nautilus".to_owned()),
                phone_number: Some("555-0100".to_owned()),
                country: Some("FR".to_owned()),
            },
            Utc::now(),
        );
        assert!(user.profile_complete);
        assert!(user.updated_at.is_some());
        assert_eq!(user.profile.first_name.as_deref(), Some("Jules"));
    }

    #[test]
    fn test_document_shape() {
        let user = account();
        let doc = serde_json::to_value(&user).unwrap();
        assert_eq!(doc["id"], "chef@example.com");
        assert_eq!(doc["passwordHash"], "hash");
        assert_eq!(doc["profileComplete"], false);
        // Unset optionals stay out of the document entirely.
        assert!(doc.get("lastLogin").is_none());
        assert!(doc.get("first_name").is_none());
    }

    #[test]
    fn test_profile_fields_flatten_into_document() {
        let mut user = account();
        user.apply_profile(
            Profile {
                first_name: Some("Jules".to_owned()),
                ..Profile::default()
            },
            Utc::now(),
        );
        let doc = serde_json::to_value(&user).unwrap();
        assert_eq!(doc["first_name"], "Jules");
    }
}
