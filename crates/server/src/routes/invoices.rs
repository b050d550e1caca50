//! Invoice read handler.
//!
//! Invoice documents come entirely from the ingestion pipeline, so the
//! projection works on raw JSON with an explicit default for every field.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use mise_core::Email;

use crate::db::InvoiceRepository;
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

/// Request to list a user's invoices.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetInvoicesRequest {
    pub email: Option<String>,
}

/// List a user's invoices with every field defaulted.
///
/// POST /api/invoices
#[instrument(skip(state, body))]
pub async fn get_invoices(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<GetInvoicesRequest>,
) -> Result<Json<Value>, ApiError> {
    let Some(email) = body.email.filter(|value| !value.is_empty()) else {
        return Err(ApiError::validation("Email is required"));
    };
    let email =
        Email::parse(&email).map_err(|_| ApiError::validation("Invalid email address"))?;

    let document = InvoiceRepository::new(state.store())
        .get_by_user(&email)
        .await?;

    let data = document.map_or_else(
        || {
            json!({
                "id": email.as_str(),
                "userId": email.as_str(),
                "invoices": [],
            })
        },
        |document| format_invoice_document(&document, &email),
    );

    Ok(Json(json!({ "status": "success", "data": data })))
}

fn format_invoice_document(document: &Value, email: &Email) -> Value {
    let invoices: Vec<Value> = document
        .get("invoices")
        .and_then(Value::as_array)
        .map(|invoices| invoices.iter().map(format_invoice).collect())
        .unwrap_or_default();

    json!({
        "id": field(document, "id", json!(email.as_str())),
        "userId": field(document, "userId", json!(email.as_str())),
        "invoices": invoices,
    })
}

/// Project one invoice with its complete external structure.
fn format_invoice(invoice: &Value) -> Value {
    let items: Vec<Value> = invoice
        .get("Items")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(format_invoice_item).collect())
        .unwrap_or_default();

    json!({
        "Supplier Name": field(invoice, "Supplier Name", json!("")),
        "Sold to Address": field(invoice, "Sold to Address", json!("")),
        "Order Date": field(invoice, "Order Date", json!("")),
        "Ship Date": field(invoice, "Ship Date", json!("")),
        "Invoice Number": field(invoice, "Invoice Number", json!("")),
        "Shipping Address": field(invoice, "Shipping Address", json!("")),
        "Total": field(invoice, "Total", json!(0)),
        "PO_NUMBER": field(invoice, "PO_NUMBER", json!("")),
        "location": field(invoice, "location", json!("")),
        "status": field(invoice, "status", json!("")),
        "Items": items,
    })
}

/// Project one invoice line item with its complete external structure.
fn format_invoice_item(item: &Value) -> Value {
    json!({
        "Item Number": field(item, "Item Number", json!("")),
        "Item Name": field(item, "Item Name", json!("")),
        "Product Category": field(item, "Product Category", json!("")),
        "Quantity In a Case": field(item, "Quantity In a Case", json!(0)),
        "Measurement Of Each Item": field(item, "Measurement Of Each Item", json!(0)),
        "Measured In": field(item, "Measured In", json!("")),
        "Quantity Shipped": field(item, "Quantity Shipped", json!(0)),
        "Extended Price": field(item, "Extended Price", json!(0)),
        "Total Units Ordered": field(item, "Total Units Ordered", json!(0)),
        "Case Price": field(item, "Case Price", json!(0)),
        "Catch Weight": field(item, "Catch Weight", json!("N/A")),
        "Priced By": field(item, "Priced By", json!("per each")),
        "Splitable": field(item, "Splitable", json!("NO")),
        "Split Price": field(item, "Split Price", json!("N/A")),
        "Cost of a Unit": field(item, "Cost of a Unit", json!(0)),
        "Cost of Each Item": field(item, "Cost of Each Item", json!(0)),
        "Currency": field(item, "Currency", json!("USD")),
        "page_number": field(item, "page_number", json!(1)),
        "item_index": field(item, "item_index", json!(0)),
    })
}

fn field(value: &Value, key: &str, default: Value) -> Value {
    value.get(key).cloned().unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_invoice_item_defaults() {
        let formatted = format_invoice_item(&json!({"Item Name": "Flour"}));
        assert_eq!(formatted["Item Name"], "Flour");
        assert_eq!(formatted["Quantity In a Case"], 0);
        assert_eq!(formatted["Currency"], "USD");
        assert_eq!(formatted["Priced By"], "per each");
        assert_eq!(formatted["Catch Weight"], "N/A");
        assert_eq!(formatted["Splitable"], "NO");
        assert_eq!(formatted["page_number"], 1);
    }

    #[test]
    fn test_format_invoice_keeps_line_items() {
        let invoice = json!({
            "Supplier Name": "US Foods",
            "Total": 241.50,
            "Items": [{"Item Name": "Flour"}, {"Item Name": "Salt"}]
        });
        let formatted = format_invoice(&invoice);
        assert_eq!(formatted["Supplier Name"], "US Foods");
        assert_eq!(formatted["Total"], 241.50);
        assert_eq!(formatted["Items"].as_array().unwrap().len(), 2);
        assert_eq!(formatted["Sold to Address"], "");
    }
}
