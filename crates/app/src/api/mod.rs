//! Backend API

mod client;
mod errors;

pub use client::{ApiClient, TENANT_HEADER};
pub use errors::ApiError;
