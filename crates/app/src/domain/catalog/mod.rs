//! Catalog

pub mod lookups;
pub mod service;

pub use lookups::{Catalog, CatalogError};
pub use service::*;
