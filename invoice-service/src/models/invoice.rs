//! Assembled invoice document, the input contract for the PDF renderer
//! and the email body.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::order::{Customer, LineItem};
use crate::services::totals::effective_line_total;

/// Computed totals summary for one order. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub discount: Decimal,
    pub grand_total: Decimal,
}

/// One rendered table row with its effective total resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total: Decimal,
}

/// Everything the renderer and the notifier need about one invoice.
#[derive(Debug, Clone)]
pub struct Invoice {
    pub invoice_number: String,
    pub customer: Customer,
    pub items: Vec<InvoiceLine>,
    pub payment_method: String,
    pub totals: Totals,
    pub issued_on: NaiveDate,
}

impl Invoice {
    pub fn assemble(
        invoice_number: String,
        customer: Customer,
        items: &[LineItem],
        payment_method: Option<String>,
        totals: Totals,
        issued_on: NaiveDate,
    ) -> Self {
        let items = items
            .iter()
            .map(|item| InvoiceLine {
                name: item.name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                total: effective_line_total(item),
            })
            .collect();

        Self {
            invoice_number,
            customer,
            items,
            payment_method: payment_method.unwrap_or_else(|| "—".to_string()),
            totals,
            issued_on,
        }
    }
}

/// Display formatting to two decimal places; the calculator itself never
/// rounds.
pub fn format_eur(amount: Decimal) -> String {
    format!("€{:.2}", amount)
}
