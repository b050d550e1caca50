//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (store connectivity)
//!
//! # Auth
//! POST /api/auth/signup         - Start signup, dispatch verification code
//! POST /api/auth/resend-otp     - Resend the verification code
//! POST /api/auth/verify         - Verify the code, create account, issue token
//! POST /api/auth/login          - Log in, issue token
//!
//! # Users
//! POST /api/users/update        - Update profile (all fields required)
//!
//! # Inventory
//! POST /api/inventory           - List inventory
//! POST /api/inventory/add       - Add an item (assigns batch number)
//! POST /api/inventory/update    - Overwrite an item by "Item Number"
//! POST /api/inventory/delete    - Delete items by "Item Number"
//!
//! # Menus & Recipes
//! POST /api/menus               - List menu records
//! POST /api/menus/add           - Add a menu item
//! POST /api/recipes             - List recipes with inventory enrichment
//!
//! # Invoices
//! POST /api/invoices            - List invoices (read-only)
//! ```
//!
//! All bodies are JSON. Success responses carry `{"status": "success", ...}`;
//! failures carry `{"error": {"message": "..."}}`.

pub mod auth;
pub mod inventory;
pub mod invoices;
pub mod menus;
pub mod recipes;
pub mod users;

use axum::{Router, routing::post};

use crate::state::AppState;

/// Build the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/resend-otp", post(auth::resend_otp))
        .route("/api/auth/verify", post(auth::verify_signup))
        .route("/api/auth/login", post(auth::login))
        // Users
        .route("/api/users/update", post(users::update_profile))
        // Inventory
        .route("/api/inventory", post(inventory::get_inventory))
        .route("/api/inventory/add", post(inventory::add_item))
        .route("/api/inventory/update", post(inventory::update_item))
        .route("/api/inventory/delete", post(inventory::delete_item))
        // Menus & recipes
        .route("/api/menus", post(menus::get_menus))
        .route("/api/menus/add", post(menus::add_menu_item))
        .route("/api/recipes", post(recipes::get_recipes))
        // Invoices
        .route("/api/invoices", post(invoices::get_invoices))
}
