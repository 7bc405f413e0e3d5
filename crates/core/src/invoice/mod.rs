//! Invoices
//!
//! Invoice drafts assembled from the cart, selected clinic records and manual entries.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::pricing::PercentError;

mod detail;
mod draft;
mod totals;
mod tracking;

pub use detail::{InvoiceDetail, ManualDetail};
pub use draft::{InvoiceDraft, NewInvoice};
pub use totals::{InvoiceTotals, compute_totals};
pub use tracking::InvoiceTracking;

/// Errors raised while assembling or validating an invoice draft.
#[derive(Debug, Error, PartialEq)]
pub enum InvoiceError {
    /// Nothing to invoice.
    #[error("an invoice needs at least one detail line")]
    NoDetails,

    /// No client selected.
    #[error("select the client to invoice")]
    MissingClient,

    /// No employee selected.
    #[error("select the employee issuing the invoice")]
    MissingEmployee,

    /// A manual line names neither a product nor a service.
    #[error("a detail line needs a product or a service")]
    MissingReference,

    /// Quantities start at one.
    #[error("quantity must be greater than zero, got {0}")]
    InvalidQuantity(u32),

    /// Unit prices cannot be negative.
    #[error("unit price cannot be negative, got {0}")]
    NegativePrice(Decimal),

    /// Discount or tax outside `[0, 100]`.
    #[error(transparent)]
    Percent(#[from] PercentError),
}
