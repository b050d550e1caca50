//! Recipe read handler.
//!
//! Recipes are written by the invoice pipeline; this endpoint projects them
//! and enriches each ingredient with metadata from the caller's inventory,
//! matched case-insensitively by name. A miss enriches with `null`, never an
//! error.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use mise_core::Email;

use crate::db::{InventoryRepository, RecipeRepository};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::models::{InventoryAggregate, MenuRecipe};
use crate::state::AppState;

/// Request to list a user's recipes.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetRecipesRequest {
    pub email: Option<String>,
}

/// List a user's recipes with inventory enrichment.
///
/// POST /api/recipes
#[instrument(skip(state, body))]
pub async fn get_recipes(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<GetRecipesRequest>,
) -> Result<Json<Value>, ApiError> {
    let Some(email) = body.email.filter(|value| !value.is_empty()) else {
        return Err(ApiError::validation("Email is required"));
    };
    let email =
        Email::parse(&email).map_err(|_| ApiError::validation("Invalid email address"))?;

    let document = RecipeRepository::new(state.store()).load(&email).await?;
    let inventory = InventoryRepository::new(state.store())
        .load_or_default(&email)
        .await?;

    let recipes: Vec<Value> = document
        .as_ref()
        .map(|document| document.records(&email))
        .unwrap_or_default()
        .iter()
        .map(|recipe| format_recipe_record(recipe, &inventory))
        .collect();

    Ok(Json(json!({ "status": "success", "recipes": recipes })))
}

/// Project one record onto the recipe listing shape, enriching ingredients.
fn format_recipe_record(recipe: &MenuRecipe, inventory: &InventoryAggregate) -> Value {
    let ingredients: Vec<Value> = recipe
        .data
        .ingredients
        .iter()
        .map(|ingredient| enrich_ingredient(ingredient, inventory))
        .collect();

    json!({
        "Recipe Name": recipe.data.recipe_name,
        "Yields": recipe.data.total_yield,
        "Servings": recipe.data.servings,
        "items_per_serving": recipe.data.items_per_serving,
        "Ingredients": ingredients,
    })
}

/// Attach inventory metadata to one ingredient under an `inventory` key.
fn enrich_ingredient(ingredient: &Value, inventory: &InventoryAggregate) -> Value {
    let Value::Object(fields) = ingredient else {
        return ingredient.clone();
    };

    let name = fields
        .get("name")
        .or_else(|| fields.get("Ingredient Name"))
        .and_then(Value::as_str);

    let enrichment = name
        .and_then(|name| inventory.find_by_name(name))
        .map_or(Value::Null, |item| {
            json!({
                "Inventory Item Name": item.name,
                "Inventory Unit of Measure": item.unit_of_measure,
                "Inventory Count By": item.count_by,
                "Category": item.category,
                "batchNumber": item.batch_number,
            })
        });

    let mut enriched = fields.clone();
    enriched.insert("inventory".to_owned(), enrichment);
    Value::Object(enriched)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use crate::models::NewInventoryItem;

    use super::*;

    fn inventory_with(name: &str) -> InventoryAggregate {
        let email = Email::parse("chef@example.com").unwrap();
        let mut aggregate = InventoryAggregate::empty(&email);
        aggregate.append(
            NewInventoryItem {
                name: name.to_owned(),
                item_type: "Produce".to_owned(),
                nutritional_label: None,
                upc: None,
                active: true,
                category: "Vegetables".to_owned(),
                count_by: "Case".to_owned(),
                unit_of_measure: None,
                locations: vec![],
                image: None,
            },
            Utc::now(),
        );
        aggregate
    }

    #[test]
    fn test_enrich_matches_case_insensitively() {
        let inventory = inventory_with("Roma Tomatoes");
        let ingredient = json!({"name": "roma tomatoes", "quantity": 2});

        let enriched = enrich_ingredient(&ingredient, &inventory);
        assert_eq!(enriched["inventory"]["Inventory Item Name"], "Roma Tomatoes");
        assert_eq!(enriched["inventory"]["Category"], "Vegetables");
        // Original fields survive.
        assert_eq!(enriched["quantity"], 2);
    }

    #[test]
    fn test_enrich_miss_is_null_not_error() {
        let inventory = inventory_with("Roma Tomatoes");
        let ingredient = json!({"name": "saffron"});

        let enriched = enrich_ingredient(&ingredient, &inventory);
        assert_eq!(enriched["inventory"], Value::Null);
    }

    #[test]
    fn test_enrich_passes_non_object_through() {
        let inventory = inventory_with("Roma Tomatoes");
        let ingredient = json!("just a string");
        assert_eq!(enrich_ingredient(&ingredient, &inventory), ingredient);
    }
}
