use axum::{extract::State, http::StatusCode, Json};
use chrono::Local;
use serde::Serialize;
use validator::Validate;

use crate::error::AppError;
use crate::models::{Invoice, OrderRequest, Totals};
use crate::services::{
    compute_totals, render_invoice_email_html, render_invoice_pdf, InvoiceEmail,
};
use crate::startup::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInvoiceResponse {
    pub invoice_number: String,
    pub totals: Totals,
    pub status: String,
}

/// Generate an invoice for one order: allocate a number (unless the caller
/// supplied one), compute totals, render the PDF, and email it to the
/// customer with a best-effort copy to the internal accounting mailbox.
///
/// The number is allocated before rendering and delivery and is not rolled
/// back if either fails, so a failed request can burn a number.
#[tracing::instrument(skip(state, request))]
pub async fn generate_invoice(
    State(state): State<AppState>,
    Json(request): Json<OrderRequest>,
) -> Result<(StatusCode, Json<GenerateInvoiceResponse>), AppError> {
    request.validate()?;

    let invoice_number = match request.invoice_number.as_deref() {
        Some(n) if !n.trim().is_empty() => n.to_string(),
        _ => state.sequence.allocate().await?,
    };

    let totals = compute_totals(
        &request.items,
        request.shipping_cost.as_ref(),
        request.discount_amount.as_ref(),
    );

    let invoice = Invoice::assemble(
        invoice_number.clone(),
        request.customer,
        &request.items,
        request.payment_method,
        totals.clone(),
        Local::now().date_naive(),
    );

    // printpdf is synchronous; keep it off the runtime workers.
    let company = state.config.company.clone();
    let pdf_invoice = invoice.clone();
    let pdf = tokio::task::spawn_blocking(move || render_invoice_pdf(&pdf_invoice, &company))
        .await
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("PDF render task failed: {e}")))??;

    let body_html = render_invoice_email_html(&invoice, &state.config.company);
    let email = InvoiceEmail {
        to: invoice.customer.email.clone(),
        subject: format!("Ihre Rechnung {}", invoice_number),
        body_html,
        attachment_name: format!("rechnung-{}.pdf", invoice_number),
        pdf,
    };

    state
        .email_provider
        .send(&email)
        .await
        .map_err(|e| AppError::EmailError(e.to_string()))?;

    // Best-effort internal copy; a failure here must not fail the request.
    let copy = InvoiceEmail {
        to: state.config.invoicing.internal_copy_email.clone(),
        ..email
    };
    if let Err(e) = state.email_provider.send(&copy).await {
        tracing::warn!(
            invoice_number = %invoice_number,
            to = %copy.to,
            error = %e,
            "Failed to send internal invoice copy"
        );
    }

    tracing::info!(
        invoice_number = %invoice_number,
        customer = %invoice.customer.email,
        grand_total = %totals.grand_total,
        "Invoice generated and sent"
    );

    Ok((
        StatusCode::CREATED,
        Json(GenerateInvoiceResponse {
            invoice_number,
            totals,
            status: "sent".to_string(),
        }),
    ))
}
