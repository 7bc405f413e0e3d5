//! Appointments

pub mod service;

pub use service::*;
