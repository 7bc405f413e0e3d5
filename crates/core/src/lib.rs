//! Vetshop
//!
//! Billing core for the veterinary console: the client-side cart, invoice drafts and their
//! totals, eligibility of completed appointments and vaccinations, and booster dose chaining.

pub mod boosters;
pub mod cart;
pub mod eligibility;
pub mod ids;
pub mod invoice;
pub mod prelude;
pub mod pricing;
pub mod records;
