pub mod health;
pub mod invoice;

pub use health::{health_check, readiness_check};
pub use invoice::generate_invoice;
