//! invoice-service: turns order data into a numbered PDF invoice and
//! emails it to the customer, with a copy to an internal mailbox.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod services;
pub mod startup;
