//! Inbound order payload for invoice generation.
//!
//! Field names follow the JSON wire contract of the web shop
//! (`unitPrice`, `shippingCost`, ...), hence the camelCase renames.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Customer identity and billing address.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[validate(length(min = 1, message = "Customer name cannot be empty"))]
    pub name: String,
    #[validate(email(message = "Invalid customer email address"))]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub city: String,
}

/// One product/quantity/price entry on an order.
///
/// `total` is optional; when absent the effective line total is derived
/// as `quantity * unit_price`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[validate(length(min = 1, message = "Item name cannot be empty"))]
    pub name: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total: Option<Decimal>,
}

/// Order payload accepted by `POST /invoices`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[validate(nested)]
    pub customer: Customer,
    #[validate(length(min = 1, message = "Order must contain at least one item"), nested)]
    pub items: Vec<LineItem>,
    /// Pre-assigned invoice number; when absent the service allocates one.
    pub invoice_number: Option<String>,
    pub payment_method: Option<String>,
    /// Accepted as raw JSON so that malformed amounts degrade to 0 instead
    /// of rejecting the whole order (the coercion is logged).
    #[serde(default)]
    pub shipping_cost: Option<serde_json::Value>,
    #[serde(default)]
    pub discount_amount: Option<serde_json::Value>,
}
