//! Per-user menu and recipe documents.
//!
//! Menus and recipes share one document shape: a `recipes` map keyed by the
//! per-user collection key, holding ordered recipe records. The menu
//! endpoint appends records with `Type = "Menu"`; the (out-of-scope) recipe
//! pipeline writes records with `Type = "Recipe"` into the recipes
//! collection. `recipe_count` counts every append ever made and never
//! decreases.
//!
//! Recipe `data` blocks from the pipeline carry free-form numbers and
//! strings, so the cost/serving fields stay as raw JSON values here and are
//! normalized at projection time.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use mise_core::Email;

use super::{de, iso_timestamp};

/// The single menu (or recipe) document for one user, id = email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuAggregate {
    /// Document id (always equals the email).
    pub id: String,
    /// Document discriminator (always "user").
    #[serde(rename = "type", default = "default_doc_type")]
    pub doc_type: String,
    /// Number of recipes ever appended. Strictly increasing.
    #[serde(default)]
    pub recipe_count: u64,
    /// Recipe records grouped by per-user collection key.
    #[serde(default)]
    pub recipes: BTreeMap<String, Vec<MenuRecipe>>,
    /// When the document was last mutated through this API.
    #[serde(default, deserialize_with = "de::optional_string")]
    pub last_updated: Option<String>,
    /// Fields written by other pipelines, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_doc_type() -> String {
    "user".to_owned()
}

/// One recipe record inside the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuRecipe {
    /// Record id, derived from the email and the sequence number.
    pub id: String,
    /// 1-based append ordinal.
    pub sequence_number: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub data: RecipeData,
}

/// The nested recipe payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeData {
    #[serde(default)]
    pub recipe_name: String,
    #[serde(default = "zero")]
    pub servings: Value,
    #[serde(default = "one")]
    pub items_per_serving: Value,
    #[serde(default)]
    pub serving_size: Value,
    #[serde(default)]
    pub total_yield: Value,
    #[serde(default)]
    pub ingredients: Vec<Value>,
    #[serde(default = "zero")]
    pub total_cost: Value,
    #[serde(default = "zero")]
    pub cost_per_serving: Value,
    /// Record discriminator: "Menu" or "Recipe".
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "Size_Name", default)]
    pub size_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "Menu_Price", default = "zero")]
    pub menu_price: Value,
    #[serde(rename = "Total_cost_percentage", default = "zero")]
    pub total_cost_percentage: Value,
    #[serde(rename = "Gross_Profit", default = "zero")]
    pub gross_profit: Value,
    #[serde(rename = "Gross_Profit_percentage", default = "zero")]
    pub gross_profit_percentage: Value,
    #[serde(default)]
    pub method: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn zero() -> Value {
    json!(0)
}

fn one() -> Value {
    json!(1)
}

impl Default for RecipeData {
    fn default() -> Self {
        Self {
            recipe_name: String::new(),
            servings: zero(),
            items_per_serving: one(),
            serving_size: Value::Null,
            total_yield: Value::Null,
            ingredients: Vec::new(),
            total_cost: zero(),
            cost_per_serving: zero(),
            kind: String::new(),
            size_name: String::new(),
            category: String::new(),
            menu_price: zero(),
            total_cost_percentage: zero(),
            gross_profit: zero(),
            gross_profit_percentage: zero(),
            method: String::new(),
            extra: Map::new(),
        }
    }
}

/// Validated fields for a menu item create.
#[derive(Debug, Clone)]
pub struct NewMenuItem {
    pub name: String,
    pub category: String,
    pub size: String,
    pub menu_price: f64,
    pub method: Option<String>,
}

impl MenuAggregate {
    /// Synthesize the empty document for a user with no menu yet.
    /// Not persisted until a mutation lands.
    #[must_use]
    pub fn empty(email: &Email) -> Self {
        Self {
            id: email.as_str().to_owned(),
            doc_type: default_doc_type(),
            recipe_count: 0,
            recipes: BTreeMap::new(),
            last_updated: None,
            extra: Map::new(),
        }
    }

    /// The per-user key recipe records are grouped under.
    #[must_use]
    pub fn collection_key(email: &Email) -> String {
        format!("inventory-items-{email}")
    }

    /// Recipe records for this user, empty if none were ever appended.
    #[must_use]
    pub fn records(&self, email: &Email) -> &[MenuRecipe] {
        self.recipes
            .get(&Self::collection_key(email))
            .map_or(&[], Vec::as_slice)
    }

    /// Append a menu item, advancing `recipe_count`.
    ///
    /// Returns a copy of the stored record for the response body.
    pub fn append_menu_item(
        &mut self,
        email: &Email,
        draft: NewMenuItem,
        now: DateTime<Utc>,
    ) -> MenuRecipe {
        let sequence = self.recipe_count + 1;
        let key = Self::collection_key(email);
        let recipe = MenuRecipe {
            id: format!("{email}_{key}_{sequence}"),
            sequence_number: sequence,
            name: draft.name.clone(),
            created_at: iso_timestamp(now),
            data: RecipeData {
                recipe_name: draft.name,
                kind: "Menu".to_owned(),
                size_name: draft.size,
                category: draft.category,
                menu_price: json!(draft.menu_price),
                method: draft.method.unwrap_or_default(),
                ..RecipeData::default()
            },
        };

        self.recipes.entry(key).or_default().push(recipe.clone());
        self.recipe_count = sequence;
        self.last_updated = Some(iso_timestamp(now));
        recipe
    }
}
