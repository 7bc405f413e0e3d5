//! Billing
//!
//! Flows that turn a pet's completed visits into an invoice.

pub mod assembler;
pub mod checkout;
pub mod eligible;
pub mod reconciliation;

pub use assembler::{InvoiceAssembler, SubmitError};
pub use checkout::{Checkout, CheckoutReport};
pub use eligible::{EligibleServiceResolver, EligibleServices, SelectionError, SelectionOutcome};
pub use reconciliation::{ReconcileFailure, ReconcileOutcome, Reconciler};
