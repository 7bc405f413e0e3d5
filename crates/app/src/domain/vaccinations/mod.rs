//! Vaccinations

pub mod booster;
pub mod service;

pub use booster::{BoosterChainer, BoosterError, RecordedDose};
pub use service::*;
