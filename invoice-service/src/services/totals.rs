//! Deterministic arithmetic mapping an order's line items and adjustments
//! to a totals summary.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::models::invoice::Totals;
use crate::models::order::LineItem;

/// Effective total of one line: the explicit `total` when present, else
/// `quantity * unit_price`.
pub fn effective_line_total(item: &LineItem) -> Decimal {
    match item.total {
        Some(total) => total,
        None => Decimal::from(item.quantity) * item.unit_price,
    }
}

/// Compute subtotal, shipping, discount and grand total.
///
/// Pure: identical inputs always yield identical outputs, and no rounding
/// is applied. Malformed shipping/discount values degrade to 0 (logged as
/// a recovered default, never an error). The grand total is deliberately
/// not clamped at zero: a discount exceeding subtotal + shipping produces
/// a negative amount due.
pub fn compute_totals(
    items: &[LineItem],
    shipping_cost: Option<&Value>,
    discount_amount: Option<&Value>,
) -> Totals {
    let subtotal: Decimal = items.iter().map(effective_line_total).sum();
    let shipping = coerce_amount(shipping_cost, "shippingCost");
    let discount = coerce_amount(discount_amount, "discountAmount");

    Totals {
        subtotal,
        shipping,
        discount,
        grand_total: subtotal + shipping - discount,
    }
}

/// Coerce a caller-supplied JSON value to a money amount.
///
/// Absent and null values are a normal omission; anything else that fails
/// to parse as a number is logged and defaulted to 0.
fn coerce_amount(value: Option<&Value>, field: &str) -> Decimal {
    match value {
        None | Some(Value::Null) => Decimal::ZERO,
        Some(Value::Number(n)) => n.to_string().parse().unwrap_or_else(|_| {
            tracing::warn!(field, value = %n, "non-representable amount, defaulting to 0");
            Decimal::ZERO
        }),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(field, value = %s, "non-numeric amount, defaulting to 0");
            Decimal::ZERO
        }),
        Some(other) => {
            tracing::warn!(field, value = %other, "non-numeric amount, defaulting to 0");
            Decimal::ZERO
        }
    }
}
