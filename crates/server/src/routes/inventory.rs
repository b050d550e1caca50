//! Inventory handlers: add, update, delete, and list.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use mise_core::Email;

use crate::db::InventoryRepository;
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::models::{InventoryAggregate, InventoryItem, Location, NewInventoryItem};
use crate::state::AppState;

/// Item fields shared by add and update requests.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ItemFields {
    pub email: Option<String>,
    pub inventory_item: Option<String>,
    pub item_type: Option<String>,
    pub nutritional_label: Option<String>,
    pub upc: Option<String>,
    pub active: Option<bool>,
    pub inventory_category: Option<String>,
    pub inventory_count_by: Option<String>,
    pub unit_of_measure: Option<String>,
    pub locations: Option<Vec<LocationInput>>,
    pub image: Option<String>,
    /// Only meaningful for update; the add path ignores it.
    pub item_number: Option<String>,
}

/// A storage location in a request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationInput {
    pub name: Option<String>,
    pub status: Option<String>,
}

/// Request to delete an item by its key.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct DeleteItemRequest {
    pub email: Option<String>,
    pub item_number: Option<String>,
}

/// Request to list a user's inventory.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetInventoryRequest {
    pub email: Option<String>,
}

/// Response carrying one item.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub status: &'static str,
    pub message: String,
    pub data: InventoryItem,
}

/// Response for a delete.
#[derive(Debug, Serialize)]
pub struct DeleteItemResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(rename = "itemCount")]
    pub item_count: usize,
}

/// Treat empty strings like absent fields.
fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

fn parse_email(raw: &str) -> Result<Email, ApiError> {
    Email::parse(raw).map_err(|_| ApiError::validation("Invalid email address"))
}

impl ItemFields {
    /// Convert into a validated draft, consuming the optional fields.
    fn into_draft(self, name: String, item_type: String) -> NewInventoryItem {
        NewInventoryItem {
            name,
            item_type,
            nutritional_label: self.nutritional_label,
            upc: self.upc,
            active: self.active.unwrap_or(true),
            category: self.inventory_category.unwrap_or_default(),
            count_by: self.inventory_count_by.unwrap_or_default(),
            unit_of_measure: self.unit_of_measure,
            locations: self
                .locations
                .unwrap_or_default()
                .into_iter()
                .map(|location| Location {
                    name: location.name.unwrap_or_default(),
                    status: location.status.unwrap_or_else(|| "active".to_owned()),
                })
                .collect(),
            image: self.image,
        }
    }
}

/// Add an inventory item, assigning the next batch number.
///
/// POST /api/inventory/add
#[instrument(skip(state, body))]
pub async fn add_item(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ItemFields>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let (Some(email), Some(name), Some(item_type), Some(_), Some(_)) = (
        present(body.email.clone()),
        present(body.inventory_item.clone()),
        present(body.item_type.clone()),
        present(body.inventory_category.clone()),
        present(body.inventory_count_by.clone()),
    ) else {
        return Err(ApiError::validation("Missing required fields"));
    };
    let email = parse_email(&email)?;

    let repository = InventoryRepository::new(state.store());
    let mut aggregate = repository.load_or_default(&email).await?;
    let item = aggregate.append(body.into_draft(name, item_type), Utc::now());
    repository.save(&aggregate).await?;

    tracing::info!(email = %email, batch_number = ?item.batch_number, "Inventory item added");

    Ok((
        StatusCode::CREATED,
        Json(ItemResponse {
            status: "success",
            message: "Inventory item added successfully".to_owned(),
            data: item,
        }),
    ))
}

/// Overwrite an existing item, matched by its "Item Number".
///
/// POST /api/inventory/update
#[instrument(skip(state, body))]
pub async fn update_item(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ItemFields>,
) -> Result<Json<ItemResponse>, ApiError> {
    let (Some(email), Some(name), Some(item_number)) = (
        present(body.email.clone()),
        present(body.inventory_item.clone()),
        present(body.item_number.clone()),
    ) else {
        return Err(ApiError::validation("Missing required fields"));
    };
    let email = parse_email(&email)?;
    let item_type = present(body.item_type.clone()).unwrap_or_default();

    let repository = InventoryRepository::new(state.store());
    // Document-level absence is distinct from item-not-found.
    let Some(mut aggregate) = repository.load(&email).await? else {
        return Err(ApiError::not_found("User document not found"));
    };

    let item = aggregate.update(&item_number, body.into_draft(name, item_type), Utc::now())?;
    repository.save(&aggregate).await?;

    Ok(Json(ItemResponse {
        status: "success",
        message: "Inventory item updated successfully".to_owned(),
        data: item,
    }))
}

/// Delete every item matching the given "Item Number".
///
/// POST /api/inventory/delete
#[instrument(skip(state, body))]
pub async fn delete_item(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<DeleteItemRequest>,
) -> Result<Json<DeleteItemResponse>, ApiError> {
    let (Some(email), Some(item_number)) = (present(body.email), present(body.item_number))
    else {
        return Err(ApiError::validation("Email and itemNumber are required"));
    };
    let email = parse_email(&email)?;

    let repository = InventoryRepository::new(state.store());
    let Some(mut aggregate) = repository.load(&email).await? else {
        return Err(ApiError::not_found("User document not found"));
    };

    let item_count = aggregate.remove(&item_number)?;
    repository.save(&aggregate).await?;

    tracing::info!(email = %email, item_count, "Inventory item deleted");

    Ok(Json(DeleteItemResponse {
        status: "success",
        message: "Item deleted successfully".to_owned(),
        item_count,
    }))
}

/// List a user's inventory, fail-open: absent fields render as defaults.
///
/// POST /api/inventory
#[instrument(skip(state, body))]
pub async fn get_inventory(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<GetInventoryRequest>,
) -> Result<Json<Value>, ApiError> {
    let Some(email) = present(body.email) else {
        return Err(ApiError::validation("Email is required"));
    };
    let email = parse_email(&email)?;

    let aggregate = InventoryRepository::new(state.store()).load(&email).await?;

    let response = match aggregate {
        Some(aggregate) if !aggregate.items.is_empty() => format_inventory(&aggregate),
        // Missing document and empty document answer identically.
        _ => json!({
            "status": "success",
            "inventory": [],
            "supplier_name": null,
            "timestamp": null,
            "itemCount": 0,
        }),
    };

    Ok(Json(response))
}

fn format_inventory(aggregate: &InventoryAggregate) -> Value {
    let items: Vec<Value> = aggregate.items.iter().map(format_item).collect();
    json!({
        "status": "success",
        "inventory": items,
        "supplier_name": aggregate.extra.get("supplier_name").cloned().unwrap_or(Value::Null),
        "timestamp": aggregate.extra.get("timestamp").cloned().unwrap_or(Value::Null),
        "itemCount": aggregate.items.len(),
    })
}

/// Project one stored item onto the external listing shape. Every field is
/// always present; gaps render as empty strings.
fn format_item(item: &InventoryItem) -> Value {
    let extra = |key: &str| item.extra.get(key).cloned().unwrap_or_else(|| json!(""));
    json!({
        "Supplier Name": extra("Supplier Name"),
        "Inventory Item Name": item.name,
        "Inventory Unit of Measure": item.unit_of_measure,
        "Brand": extra("Brand"),
        "Item Name": extra("Item Name"),
        "Item Number": item.item_number.clone().unwrap_or_default(),
        "Quantity In a Case": extra("Quantity In a Case"),
        "Measurement Of Each Item": extra("Measurement Of Each Item"),
        "Measured In": extra("Measured In"),
        "Total Units": extra("Total Units"),
        "Case Price": extra("Case Price"),
        "Catch Weight": extra("Catch Weight"),
        "Priced By": extra("Priced By"),
        "Splitable": extra("Splitable"),
        "Split Price": extra("Split Price"),
        "Cost of a Unit": extra("Cost of a Unit"),
        "Category": item.category,
        "timestamp": item.timestamp,
        "batchNumber": item.batch_number.map_or_else(|| json!(""), |n| json!(n)),
    })
}
