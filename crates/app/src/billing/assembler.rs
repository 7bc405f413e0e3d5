//! Invoice assembly.

use std::sync::Arc;

use thiserror::Error;
use tracing::{Span, info};
use vetshop::{
    cart::CartSession,
    invoice::{InvoiceDraft, InvoiceError},
    records::invoices::Invoice,
};

use crate::{api::ApiError, domain::invoices::InvoicesService};

/// Errors raised when submitting an invoice.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The draft is incomplete; nothing was sent.
    #[error(transparent)]
    Validation(#[from] InvoiceError),

    /// The backend refused the invoice or could not be reached.
    #[error(transparent)]
    Backend(#[from] ApiError),
}

/// Opens invoice drafts and submits them.
#[derive(Clone)]
pub struct InvoiceAssembler {
    invoices: Arc<dyn InvoicesService>,
}

impl std::fmt::Debug for InvoiceAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvoiceAssembler").finish_non_exhaustive()
    }
}

impl InvoiceAssembler {
    #[must_use]
    pub fn new(invoices: Arc<dyn InvoicesService>) -> Self {
        Self { invoices }
    }

    /// A new draft seeded from the cart.
    pub fn open(&self, cart: &CartSession) -> InvoiceDraft {
        let mut draft = InvoiceDraft::new();

        draft.seed_from_cart(cart);

        draft
    }

    /// Validate the draft and create the invoice.
    ///
    /// Validation failures never reach the backend. Backend failures are returned as is and
    /// not retried.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Validation`]: the draft is incomplete.
    /// - [`SubmitError::Backend`]: the backend call failed.
    #[tracing::instrument(
        name = "billing.assembler.submit",
        skip(self, draft),
        fields(
            detail_count = draft.details().len(),
            invoice_id = tracing::field::Empty
        ),
        err
    )]
    pub async fn submit(&self, draft: &InvoiceDraft) -> Result<Invoice, SubmitError> {
        let request = draft.validate()?;
        let invoice = self.invoices.create_invoice(request).await?;

        Span::current().record("invoice_id", tracing::field::display(invoice.id));

        info!(invoice_id = %invoice.id, total = %invoice.total, "created invoice");

        Ok(invoice)
    }
}
