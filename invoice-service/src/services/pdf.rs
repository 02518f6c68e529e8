//! A4 invoice PDF rendering with printpdf.
//!
//! Single-page, hand-positioned layout: company header, title, customer
//! and invoice detail blocks, line-item table, totals, and the
//! small-business exemption footer.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use rust_decimal::Decimal;

use crate::config::CompanyConfig;
use crate::error::AppError;
use crate::models::{format_eur, Invoice};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;

// Table column x positions (mm).
const COL_PRODUCT: f32 = MARGIN;
const COL_QTY: f32 = 120.0;
const COL_UNIT: f32 = 145.0;
const COL_TOTAL: f32 = 175.0;

const ROW_HEIGHT: f32 = 7.0;

fn text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    s: &str,
    size: f32,
    x: f32,
    y: f32,
) {
    layer.use_text(s, size, Mm(x), Mm(y), font);
}

fn divider(layer: &PdfLayerReference, y: f32) {
    layer.add_line(printpdf::Line {
        points: vec![
            (printpdf::Point::new(Mm(MARGIN), Mm(y)), false),
            (printpdf::Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(y)), false),
        ],
        is_closed: false,
    });
}

/// Render one invoice to an in-memory PDF.
///
/// More line items than fit on a single page is a caller error; the
/// layout is deliberately single-page.
pub fn render_invoice_pdf(invoice: &Invoice, company: &CompanyConfig) -> Result<Vec<u8>, AppError> {
    let (doc, page, layer_idx) =
        PdfDocument::new("Rechnung", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let layer = doc.get_page(page).get_layer(layer_idx);

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("PDF font error: {e}")))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("PDF font error: {e}")))?;

    // Company header, right-aligned block in the original; a left block
    // reads fine without the logo asset.
    let mut y = PAGE_HEIGHT - MARGIN;
    text(&layer, &font_bold, &company.name, 14.0, MARGIN, y);
    y -= 6.0;
    text(&layer, &font, &company.email, 10.0, MARGIN, y);
    y -= 5.0;
    text(&layer, &font, &company.address, 10.0, MARGIN, y);
    y -= 5.0;
    text(&layer, &font, &company.city, 10.0, MARGIN, y);

    y -= 8.0;
    divider(&layer, y);

    // Title
    y -= 14.0;
    text(&layer, &font_bold, "Rechnung", 24.0, MARGIN, y);

    // Customer block (left) and invoice details (right)
    y -= 14.0;
    let details_x = PAGE_WIDTH / 2.0;
    text(&layer, &font_bold, "Kunde:", 12.0, MARGIN, y);
    text(&layer, &font_bold, "Rechnungsdetails:", 12.0, details_x, y);

    y -= 7.0;
    text(&layer, &font, &invoice.customer.name, 10.0, MARGIN, y);
    text(
        &layer,
        &font,
        &format!("Rechnungsnummer: {}", invoice.invoice_number),
        10.0,
        details_x,
        y,
    );

    y -= 5.0;
    text(&layer, &font, &invoice.customer.address, 10.0, MARGIN, y);
    text(
        &layer,
        &font,
        &format!("Datum: {}", invoice.issued_on.format("%d.%m.%Y")),
        10.0,
        details_x,
        y,
    );

    y -= 5.0;
    text(
        &layer,
        &font,
        &format!("{} {}", invoice.customer.zip, invoice.customer.city),
        10.0,
        MARGIN,
        y,
    );
    text(
        &layer,
        &font,
        &format!("Zahlungsart: {}", invoice.payment_method),
        10.0,
        details_x,
        y,
    );

    // Table header
    y -= 14.0;
    text(&layer, &font_bold, "Produkt", 10.0, COL_PRODUCT, y);
    text(&layer, &font_bold, "Anzahl", 10.0, COL_QTY, y);
    text(&layer, &font_bold, "Einzelpreis", 10.0, COL_UNIT, y);
    text(&layer, &font_bold, "Gesamt", 10.0, COL_TOTAL, y);

    y -= 3.0;
    divider(&layer, y);
    y -= ROW_HEIGHT;

    // Rows; totals block and footer need roughly 60mm below the table.
    for line in &invoice.items {
        if y < 75.0 {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "too many line items for a single-page invoice"
            )));
        }

        text(&layer, &font, &line.name, 10.0, COL_PRODUCT, y);
        text(&layer, &font, &line.quantity.to_string(), 10.0, COL_QTY, y);
        text(&layer, &font, &format_eur(line.unit_price), 10.0, COL_UNIT, y);
        text(&layer, &font, &format_eur(line.total), 10.0, COL_TOTAL, y);
        y -= ROW_HEIGHT;
    }

    y -= 2.0;
    divider(&layer, y);

    // Totals
    y -= 9.0;
    let totals = &invoice.totals;
    text(&layer, &font, "Zwischensumme:", 11.0, COL_UNIT, y);
    text(&layer, &font, &format_eur(totals.subtotal), 11.0, COL_TOTAL, y);
    y -= 6.0;
    text(&layer, &font, "Versandkosten:", 11.0, COL_UNIT, y);
    text(&layer, &font, &format_eur(totals.shipping), 11.0, COL_TOTAL, y);
    if totals.discount > Decimal::ZERO {
        y -= 6.0;
        text(&layer, &font, "Rabatt:", 11.0, COL_UNIT, y);
        text(
            &layer,
            &font,
            &format!("-{}", format_eur(totals.discount)),
            11.0,
            COL_TOTAL,
            y,
        );
    }
    y -= 6.0;
    text(&layer, &font, "MwSt (0%):", 11.0, COL_UNIT, y);
    text(&layer, &font, "€0.00", 11.0, COL_TOTAL, y);
    y -= 8.0;
    text(&layer, &font_bold, "Gesamtbetrag:", 13.0, COL_UNIT, y);
    text(
        &layer,
        &font_bold,
        &format_eur(totals.grand_total),
        13.0,
        COL_TOTAL,
        y,
    );

    // Footer
    text(
        &layer,
        &font,
        "*Gemäß § 6 Abs. 1 Z 27 UStG steuerfrei – Kleinunternehmerregelung",
        9.0,
        MARGIN,
        MARGIN + 8.0,
    );
    text(
        &layer,
        &font,
        &format!("{} • {}", company.website, company.email),
        9.0,
        MARGIN,
        MARGIN,
    );

    let mut writer = std::io::BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("PDF write error: {e}")))?;
    writer
        .into_inner()
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("PDF buffer error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, Invoice, InvoiceLine, Totals};
    use chrono::NaiveDate;

    fn test_company() -> CompanyConfig {
        CompanyConfig {
            name: "PECTO e.U.".to_string(),
            email: "info@pecto.at".to_string(),
            address: "In der Wiesen 13/1/16".to_string(),
            city: "1230 Wien".to_string(),
            website: "www.pecto.at".to_string(),
        }
    }

    fn test_invoice(item_count: usize) -> Invoice {
        Invoice {
            invoice_number: "2026-0042".to_string(),
            customer: Customer {
                name: "Max Mustermann".to_string(),
                email: "max@example.com".to_string(),
                address: "Musterstraße 1".to_string(),
                zip: "1010".to_string(),
                city: "Wien".to_string(),
            },
            items: (0..item_count)
                .map(|i| InvoiceLine {
                    name: format!("Produkt {}", i + 1),
                    quantity: 1,
                    unit_price: "9.90".parse().unwrap(),
                    total: "9.90".parse().unwrap(),
                })
                .collect(),
            payment_method: "Kreditkarte".to_string(),
            totals: Totals {
                subtotal: "9.90".parse().unwrap(),
                shipping: "4.49".parse().unwrap(),
                discount: "0".parse().unwrap(),
                grand_total: "14.39".parse().unwrap(),
            },
            issued_on: NaiveDate::from_ymd_opt(2026, 8, 29).unwrap(),
        }
    }

    #[test]
    fn renders_a_pdf_byte_stream() {
        let bytes = render_invoice_pdf(&test_invoice(3), &test_company()).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1000);
    }

    #[test]
    fn too_many_items_for_one_page_is_an_error() {
        let err = render_invoice_pdf(&test_invoice(40), &test_company()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
