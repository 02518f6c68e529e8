//! HTML email body mirroring the figures on the PDF invoice.

use crate::config::CompanyConfig;
use crate::models::{format_eur, Invoice};

/// Minimal HTML escaping for interpolated order data.
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the order confirmation / invoice email body.
pub fn render_invoice_email_html(invoice: &Invoice, company: &CompanyConfig) -> String {
    let product_rows: String = invoice
        .items
        .iter()
        .map(|line| {
            format!(
                r#"<tr>
      <td style="padding:10px;border-bottom:1px solid #eee;">{name}</td>
      <td style="padding:10px;border-bottom:1px solid #eee;text-align:center;">{quantity}</td>
      <td style="padding:10px;border-bottom:1px solid #eee;text-align:right;">{unit_price}</td>
      <td style="padding:10px;border-bottom:1px solid #eee;text-align:right;">{total}</td>
    </tr>"#,
                name = escape(&line.name),
                quantity = line.quantity,
                unit_price = format_eur(line.unit_price),
                total = format_eur(line.total),
            )
        })
        .collect();

    let customer = &invoice.customer;
    let totals = &invoice.totals;

    format!(
        r#"<!DOCTYPE html>
<html lang="de">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Rechnung {invoice_number}</title>
</head>
<body style="margin:0;padding:0;background:#F8F8F8;font-family:Helvetica,Arial,sans-serif;color:#333;">
  <table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="background:#F8F8F8;padding:30px 0;">
    <tr><td>
      <table role="presentation" cellpadding="0" cellspacing="0" style="max-width:640px;margin:0 auto;background:#fff;border-radius:8px;overflow:hidden;">
        <tr><td style="padding:0 20px 10px;">
          <h2 style="margin:20px 0 10px;">Bestellbestätigung &amp; Rechnung</h2>
          <p style="margin:0 0 8px;">Rechnungsnummer: <strong>{invoice_number}</strong></p>
          <p style="margin:0 0 8px;">Kunde: <strong>{customer_name}</strong></p>
          <p style="margin:0 0 8px;">Adresse: {address}, {zip} {city}</p>
          <p style="margin:0 0 8px;">Zahlungsart: {payment_method}</p>
        </td></tr>

        <tr><td style="padding:0 20px 20px;">
          <table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="border-collapse:collapse;">
            <thead>
              <tr>
                <th align="left" style="padding:12px 10px;border-bottom:2px solid #333;">Produkt</th>
                <th align="center" style="padding:12px 10px;border-bottom:2px solid #333;">Anzahl</th>
                <th align="right" style="padding:12px 10px;border-bottom:2px solid #333;">Einzelpreis</th>
                <th align="right" style="padding:12px 10px;border-bottom:2px solid #333;">Gesamt</th>
              </tr>
            </thead>
            <tbody>{product_rows}</tbody>
          </table>
        </td></tr>

        <tr><td style="padding:0 20px 20px;">
          <table role="presentation" width="100%" cellpadding="0" cellspacing="0">
            <tr>
              <td style="padding:6px 0;">Zwischensumme</td>
              <td align="right" style="padding:6px 0;">{subtotal}</td>
            </tr>
            <tr>
              <td style="padding:6px 0;">Versand</td>
              <td align="right" style="padding:6px 0;">{shipping}</td>
            </tr>
            <tr>
              <td style="padding:6px 0;">Rabatt</td>
              <td align="right" style="padding:6px 0;">-{discount}</td>
            </tr>
            <tr>
              <td style="padding:10px 0;border-top:1px solid #eee;font-weight:bold;">Gesamt</td>
              <td align="right" style="padding:10px 0;border-top:1px solid #eee;font-weight:bold;">{grand_total}</td>
            </tr>
          </table>
        </td></tr>

        <tr>
          <td style="background:#F8F8F8;color:#666;padding:16px 20px;text-align:center;font-size:12px;">
            <p style="margin:6px 0;">Die Rechnung ist als PDF im Anhang beigefügt.</p>
            <p style="margin:6px 0;">Kleinunternehmerregelung gem. § 6 Abs. 1 Z 27 UStG – keine USt. ausgewiesen.</p>
            <p style="margin:6px 0;">Fragen? Antworte einfach auf diese E-Mail oder schreib uns an <a href="mailto:{company_email}">{company_email}</a>.</p>
          </td>
        </tr>
      </table>
    </td></tr>
  </table>
</body>
</html>
"#,
        invoice_number = escape(&invoice.invoice_number),
        customer_name = escape(&customer.name),
        address = escape(&customer.address),
        zip = escape(&customer.zip),
        city = escape(&customer.city),
        payment_method = escape(&invoice.payment_method),
        subtotal = format_eur(totals.subtotal),
        shipping = format_eur(totals.shipping),
        discount = format_eur(totals.discount),
        grand_total = format_eur(totals.grand_total),
        company_email = escape(&company.email),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, Invoice, InvoiceLine, Totals};
    use chrono::NaiveDate;

    #[test]
    fn email_body_carries_number_and_totals() {
        let invoice = Invoice {
            invoice_number: "2026-0007".to_string(),
            customer: Customer {
                name: "Eva <Test>".to_string(),
                email: "eva@example.com".to_string(),
                address: "Hauptplatz 3".to_string(),
                zip: "8010".to_string(),
                city: "Graz".to_string(),
            },
            items: vec![InvoiceLine {
                name: "Widget".to_string(),
                quantity: 2,
                unit_price: "35".parse().unwrap(),
                total: "70".parse().unwrap(),
            }],
            payment_method: "PayPal".to_string(),
            totals: Totals {
                subtotal: "70".parse().unwrap(),
                shipping: "4.49".parse().unwrap(),
                discount: "5".parse().unwrap(),
                grand_total: "69.49".parse().unwrap(),
            },
            issued_on: NaiveDate::from_ymd_opt(2026, 8, 29).unwrap(),
        };
        let company = CompanyConfig {
            name: "PECTO e.U.".to_string(),
            email: "info@pecto.at".to_string(),
            address: "In der Wiesen 13/1/16".to_string(),
            city: "1230 Wien".to_string(),
            website: "www.pecto.at".to_string(),
        };

        let html = render_invoice_email_html(&invoice, &company);

        assert!(html.contains("2026-0007"));
        assert!(html.contains("€69.49"));
        assert!(html.contains("€4.49"));
        // Customer-supplied text is escaped.
        assert!(html.contains("Eva &lt;Test&gt;"));
        assert!(!html.contains("Eva <Test>"));
    }
}
