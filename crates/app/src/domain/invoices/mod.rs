//! Invoices

pub mod service;

pub use service::*;
