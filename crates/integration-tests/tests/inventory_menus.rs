//! Integration tests for inventory, menu, and read endpoints.
//!
//! These tests require a running `mise-server` (see crate docs). Each test
//! uses a unique email, so the documents it creates never collide across
//! runs.
//!
//! Run with: cargo test -p mise-integration-tests -- --ignored

use reqwest::Client;
use serde_json::json;

use mise_integration_tests::{post_json, unique_email};

#[tokio::test]
#[ignore = "Requires running mise-server"]
async fn test_add_inventory_assigns_batch_numbers() {
    let client = Client::new();
    let email = unique_email("inv");

    for expected in 1..=3 {
        let (status, body) = post_json(
            &client,
            "/api/inventory/add",
            &json!({
                "email": email,
                "inventoryItem": format!("Item {expected}"),
                "itemType": "Produce",
                "inventoryCategory": "Vegetables",
                "inventoryCountBy": "Case"
            }),
        )
        .await;
        assert_eq!(status, 201);
        assert_eq!(body["data"]["batchNumber"], expected);
    }

    let (status, body) = post_json(&client, "/api/inventory", &json!({"email": email})).await;
    assert_eq!(status, 200);
    assert_eq!(body["itemCount"], 3);
}

#[tokio::test]
#[ignore = "Requires running mise-server"]
async fn test_add_inventory_defaults_optional_fields() {
    let client = Client::new();
    let email = unique_email("invdefaults");

    let (status, body) = post_json(
        &client,
        "/api/inventory/add",
        &json!({
            "email": email,
            "inventoryItem": "Tomatoes",
            "itemType": "Produce",
            "inventoryCategory": "Vegetables",
            "inventoryCountBy": "Case"
        }),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(body["data"]["Nutritional Label"], "");
    assert_eq!(body["data"]["UPC"], "");
    assert_eq!(body["data"]["Active"], "Yes");

    // Every projected field is present in the listing.
    let (_, body) = post_json(&client, "/api/inventory", &json!({"email": email})).await;
    let listed = &body["inventory"][0];
    for key in ["Supplier Name", "Brand", "Case Price", "Category", "batchNumber"] {
        assert!(listed.get(key).is_some(), "missing field {key}");
    }
}

#[tokio::test]
#[ignore = "Requires running mise-server"]
async fn test_inventory_add_rejects_missing_fields() {
    let client = Client::new();
    let email = unique_email("invmissing");

    let (status, body) = post_json(
        &client,
        "/api/inventory/add",
        &json!({"email": email, "inventoryItem": "Tomatoes"}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["message"], "Missing required fields");
}

#[tokio::test]
#[ignore = "Requires running mise-server"]
async fn test_update_without_document_is_not_found() {
    let client = Client::new();
    let email = unique_email("invupdate");

    let (status, body) = post_json(
        &client,
        "/api/inventory/update",
        &json!({"email": email, "inventoryItem": "Tomatoes", "itemNumber": "A-1"}),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["message"], "User document not found");
}

#[tokio::test]
#[ignore = "Requires running mise-server"]
async fn test_add_menu_item_and_list() {
    let client = Client::new();
    let email = unique_email("menu");

    let (status, body) = post_json(
        &client,
        "/api/menus/add",
        &json!({
            "email": email,
            "itemName": "Margherita",
            "category": "Pizza",
            "size": "12 inch",
            "menuPrice": 14.0
        }),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(body["data"]["sequence_number"], 1);
    assert_eq!(body["data"]["data"]["Type"], "Menu");

    let (status, body) = post_json(&client, "/api/menus", &json!({"email": email})).await;
    assert_eq!(status, 200);
    assert_eq!(body["menus"][0]["Recipe Name"], "Margherita");
}

#[tokio::test]
#[ignore = "Requires running mise-server"]
async fn test_reads_are_empty_not_errors_for_new_users() {
    let client = Client::new();
    let email = unique_email("fresh");

    let (status, body) = post_json(&client, "/api/inventory", &json!({"email": email})).await;
    assert_eq!(status, 200);
    assert_eq!(body["itemCount"], 0);

    let (status, body) = post_json(&client, "/api/menus", &json!({"email": email})).await;
    assert_eq!(status, 200);
    assert_eq!(body["menus"], json!([]));

    let (status, body) = post_json(&client, "/api/recipes", &json!({"email": email})).await;
    assert_eq!(status, 200);
    assert_eq!(body["recipes"], json!([]));

    let (status, body) = post_json(&client, "/api/invoices", &json!({"email": email})).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["invoices"], json!([]));
}
