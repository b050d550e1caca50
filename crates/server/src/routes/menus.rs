//! Menu handlers: add an item, list the menu.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use mise_core::Email;

use crate::db::MenuRepository;
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::models::{MenuRecipe, NewMenuItem};
use crate::state::AppState;

/// Request to add a menu item.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct AddMenuItemRequest {
    pub email: Option<String>,
    pub item_name: Option<String>,
    /// Linked recipe references from the menu editor. Accepted for
    /// compatibility; the ingredient list starts empty either way.
    pub recipes: Option<Vec<Value>>,
    pub category: Option<String>,
    pub size: Option<String>,
    pub menu_price: Option<f64>,
    pub method: Option<String>,
}

/// Request to list a user's menus.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetMenusRequest {
    pub email: Option<String>,
}

/// Response carrying the created record.
#[derive(Debug, Serialize)]
pub struct AddMenuItemResponse {
    pub status: &'static str,
    pub message: String,
    pub data: MenuRecipe,
}

/// Treat empty strings like absent fields.
fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

fn parse_email(raw: &str) -> Result<Email, ApiError> {
    Email::parse(raw).map_err(|_| ApiError::validation("Invalid email address"))
}

/// Add a menu item, advancing the per-user sequence counter.
///
/// POST /api/menus/add
#[instrument(skip(state, body))]
pub async fn add_menu_item(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<AddMenuItemRequest>,
) -> Result<(StatusCode, Json<AddMenuItemResponse>), ApiError> {
    let (Some(email), Some(item_name), Some(category), Some(size), Some(menu_price)) = (
        present(body.email),
        present(body.item_name),
        present(body.category),
        present(body.size),
        body.menu_price,
    ) else {
        return Err(ApiError::validation("Missing required fields"));
    };
    let email = parse_email(&email)?;

    let repository = MenuRepository::new(state.store());
    let mut aggregate = repository.load_or_default(&email).await?;
    let recipe = aggregate.append_menu_item(
        &email,
        NewMenuItem {
            name: item_name,
            category,
            size,
            menu_price,
            method: body.method,
        },
        Utc::now(),
    );
    repository.save(&aggregate).await?;

    tracing::info!(email = %email, sequence = recipe.sequence_number, "Menu item added");

    Ok((
        StatusCode::CREATED,
        Json(AddMenuItemResponse {
            status: "success",
            message: "Menu item added successfully".to_owned(),
            data: recipe,
        }),
    ))
}

/// List a user's menu records.
///
/// POST /api/menus
#[instrument(skip(state, body))]
pub async fn get_menus(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<GetMenusRequest>,
) -> Result<Json<Value>, ApiError> {
    let Some(email) = present(body.email) else {
        return Err(ApiError::validation("Email is required"));
    };
    let email = parse_email(&email)?;

    let aggregate = MenuRepository::new(state.store()).load(&email).await?;

    let menus: Vec<Value> = aggregate
        .as_ref()
        .map(|aggregate| aggregate.records(&email))
        .unwrap_or_default()
        .iter()
        .map(format_menu_record)
        .collect();

    Ok(Json(json!({ "status": "success", "menus": menus })))
}

/// Project one record onto the menu listing shape.
fn format_menu_record(recipe: &MenuRecipe) -> Value {
    json!({
        "Recipe Name": recipe.data.recipe_name,
        "Yields": recipe.data.total_yield,
        "Servings": recipe.data.servings,
        "items_per_serving": recipe.data.items_per_serving,
        "Ingredients": recipe.data.ingredients,
        "total_cost": recipe.data.total_cost,
    })
}
