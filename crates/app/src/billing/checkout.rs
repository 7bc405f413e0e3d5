//! Checkout.
//!
//! Submits a draft, empties the cart and flags the billed records.

use tracing::{info, warn};
use vetshop::{cart::CartStore, invoice::InvoiceDraft, records::invoices::Invoice};

use crate::billing::{
    assembler::{InvoiceAssembler, SubmitError},
    reconciliation::{ReconcileOutcome, Reconciler},
};

/// Outcome of a successful checkout.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckoutReport {
    /// The created invoice.
    pub invoice: Invoice,

    /// Per-record reconciliation results.
    pub reconciliation: Vec<ReconcileOutcome>,
}

impl CheckoutReport {
    /// Whether every billed record was flagged as invoiced.
    pub fn fully_reconciled(&self) -> bool {
        self.reconciliation.iter().all(ReconcileOutcome::is_success)
    }
}

/// Invoice submission followed by its obligations.
#[derive(Clone, Debug)]
pub struct Checkout {
    assembler: InvoiceAssembler,
    reconciler: Reconciler,
}

impl Checkout {
    #[must_use]
    pub fn new(assembler: InvoiceAssembler, reconciler: Reconciler) -> Self {
        Self {
            assembler,
            reconciler,
        }
    }

    /// Submit `draft`, then clear the cart and reconcile the billed records.
    ///
    /// The cart is only cleared once the invoice exists. A failure to persist the cleared cart
    /// is logged; the invoice stands.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmitError`] when the invoice was not created; the cart is left untouched.
    #[tracing::instrument(name = "billing.checkout.submit", skip_all, err)]
    pub async fn submit(
        &self,
        cart: &mut CartStore,
        draft: &InvoiceDraft,
    ) -> Result<CheckoutReport, SubmitError> {
        let tracking = draft.tracking();
        let invoice = self.assembler.submit(draft).await?;

        if let Err(error) = cart.clear() {
            warn!(invoice_id = %invoice.id, %error, "invoice created but the cart could not be cleared");
        }

        let reconciliation = self.reconciler.reconcile(&tracking).await;

        let report = CheckoutReport {
            invoice,
            reconciliation,
        };

        info!(
            invoice_id = %report.invoice.id,
            fully_reconciled = report.fully_reconciled(),
            "checkout complete"
        );

        Ok(report)
    }
}
