//! Clinic Records
//!
//! Shapes of the records the backend API returns and accepts.

pub mod appointments;
pub mod catalog;
pub mod invoices;
pub mod vaccinations;
