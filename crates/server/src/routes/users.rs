//! User profile handlers.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use mise_core::Email;

use crate::db::UserRepository;
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::models::Profile;
use crate::state::AppState;

/// Request to update a user's profile. Every field is required.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub phone_number: Option<String>,
    pub country: Option<String>,
}

/// The updated profile echoed back to the caller.
#[derive(Debug, Serialize)]
pub struct ProfileEcho {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub phone_number: String,
    pub country: String,
}

/// Response for a profile update.
#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub status: &'static str,
    pub message: String,
    pub user: ProfileEcho,
}

/// Update a user's profile, marking it complete.
///
/// POST /api/users/update
#[instrument(skip(state, body))]
pub async fn update_profile(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<UpdateProfileRequest>,
) -> Result<Json<UpdateProfileResponse>, ApiError> {
    let present = |field: Option<String>| field.filter(|value| !value.is_empty());

    let (
        Some(email),
        Some(first_name),
        Some(last_name),
        Some(company_name),
        Some(phone_number),
        Some(country),
    ) = (
        present(body.email),
        present(body.first_name),
        present(body.last_name),
        present(body.company_name),
        present(body.phone_number),
        present(body.country),
    )
    else {
        return Err(ApiError::validation("All fields are required"));
    };

    let email =
        Email::parse(&email).map_err(|_| ApiError::validation("Invalid email address"))?;

    let users = UserRepository::new(state.store());
    let Some(mut user) = users.get_by_email(&email).await? else {
        return Err(ApiError::not_found("User not found"));
    };

    user.apply_profile(
        Profile {
            first_name: Some(first_name.clone()),
            last_name: Some(last_name.clone()),
            company_name: Some(company_name.clone()),
            phone_number: Some(phone_number.clone()),
            country: Some(country.clone()),
        },
        Utc::now(),
    );
    users.save(&user).await?;

    Ok(Json(UpdateProfileResponse {
        status: "success",
        message: "User information updated successfully".to_owned(),
        user: ProfileEcho {
            email: email.into_inner(),
            first_name,
            last_name,
            company_name,
            phone_number,
            country,
        },
    }))
}
