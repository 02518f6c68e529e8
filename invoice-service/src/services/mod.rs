pub mod email;
pub mod pdf;
pub mod sequence;
pub mod template;
pub mod totals;

pub use email::{EmailProvider, InvoiceEmail, MockEmailProvider, ProviderError, SmtpProvider};
pub use pdf::render_invoice_pdf;
pub use sequence::InvoiceSequence;
pub use template::render_invoice_email_html;
pub use totals::compute_totals;
