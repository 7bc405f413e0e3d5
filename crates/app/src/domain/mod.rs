//! Vetshop Backend Resources

pub mod appointments;
pub mod catalog;
pub mod invoices;
pub mod vaccinations;
