pub mod invoice;
pub mod order;

pub use invoice::{format_eur, Invoice, InvoiceLine, Totals};
pub use order::{Customer, LineItem, OrderRequest};
