//! Invoice Draft

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    cart::CartSession,
    eligibility::MaterializedSelection,
    ids::{ClientId, EmployeeId},
    invoice::{
        InvoiceDetail, InvoiceError, InvoiceTotals, InvoiceTracking, ManualDetail, compute_totals,
    },
    pricing::Percent,
};

/// The in-progress invoice behind the invoice form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InvoiceDraft {
    /// Client being invoiced.
    pub client_id: Option<ClientId>,

    /// Employee issuing the invoice.
    pub employee_id: Option<EmployeeId>,

    /// Free-form notes printed on the invoice.
    pub notes: String,

    discount: Percent,
    tax: Percent,
    details: Vec<InvoiceDetail>,
    seeded: bool,
}

/// Invoice creation request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoice {
    pub client_id: ClientId,
    pub employee_id: EmployeeId,
    #[serde(rename = "discountPercent")]
    pub discount: Percent,
    #[serde(rename = "taxPercent")]
    pub tax: Percent,
    pub notes: Option<String>,
    pub details: Vec<InvoiceDetail>,
}

impl InvoiceDraft {
    /// Create an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the cart into the draft, once per draft.
    ///
    /// Later calls do nothing, so cart changes made while the form is open do not re-seed it.
    /// The cart's client is pre-selected unless the draft already names one. Returns whether
    /// this call seeded the draft.
    pub fn seed_from_cart(&mut self, cart: &CartSession) -> bool {
        if self.seeded {
            return false;
        }

        self.seeded = true;

        if cart.is_empty() {
            return false;
        }

        self.details.extend(cart.lines().iter().map(InvoiceDetail::from));

        if self.client_id.is_none() {
            self.client_id = cart.client().map(|client| client.id);
        }

        true
    }

    /// Add a line typed in on the form.
    ///
    /// # Errors
    ///
    /// - [`InvoiceError::MissingReference`]: the line names neither a product nor a service.
    /// - [`InvoiceError::InvalidQuantity`]: the quantity is zero.
    /// - [`InvoiceError::NegativePrice`]: the unit price is negative.
    /// - [`InvoiceError::Percent`]: the discount lies outside `[0, 100]`.
    pub fn add_manual_detail(&mut self, detail: ManualDetail) -> Result<(), InvoiceError> {
        if !detail.item.has_reference() {
            return Err(InvoiceError::MissingReference);
        }

        if detail.quantity == 0 {
            return Err(InvoiceError::InvalidQuantity(detail.quantity));
        }

        if detail.unit_price < Decimal::ZERO {
            return Err(InvoiceError::NegativePrice(detail.unit_price));
        }

        let discount = Percent::new(detail.discount)?;

        self.details.push(InvoiceDetail::new(
            detail.item,
            detail.name,
            detail.quantity,
            detail.unit_price,
            discount,
        ));

        Ok(())
    }

    /// Add selected appointments and vaccinations, skipping records the draft already bills.
    pub fn add_selection(&mut self, selection: &MaterializedSelection) {
        let tracked = self.tracking();

        let fresh: Vec<InvoiceDetail> = selection
            .details()
            .into_iter()
            .filter(|detail| {
                detail
                    .source()
                    .is_none_or(|source| !tracked.sources().any(|s| s == source))
            })
            .collect();

        self.details.extend(fresh);
    }

    /// Remove the detail at `index`, returning it.
    pub fn remove_detail(&mut self, index: usize) -> Option<InvoiceDetail> {
        (index < self.details.len()).then(|| self.details.remove(index))
    }

    /// Set the invoice-wide discount, in percent points.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::Percent`] outside `[0, 100]`.
    pub fn set_discount(&mut self, points: Decimal) -> Result<(), InvoiceError> {
        self.discount = Percent::new(points)?;

        Ok(())
    }

    /// Set the tax rate, in percent points.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::Percent`] outside `[0, 100]`.
    pub fn set_tax(&mut self, points: Decimal) -> Result<(), InvoiceError> {
        self.tax = Percent::new(points)?;

        Ok(())
    }

    /// Invoice-wide discount.
    pub fn discount(&self) -> Percent {
        self.discount
    }

    /// Tax rate.
    pub fn tax(&self) -> Percent {
        self.tax
    }

    /// Detail lines.
    pub fn details(&self) -> &[InvoiceDetail] {
        &self.details
    }

    /// Appointments and vaccinations billed by this draft.
    pub fn tracking(&self) -> InvoiceTracking {
        self.details.iter().filter_map(InvoiceDetail::source).collect()
    }

    /// Totals derived from the current details, discount and tax.
    pub fn totals(&self) -> InvoiceTotals {
        compute_totals(&self.details, self.discount, self.tax)
    }

    /// Check the draft and build the creation request.
    ///
    /// # Errors
    ///
    /// - [`InvoiceError::NoDetails`]: the draft has no lines.
    /// - [`InvoiceError::MissingClient`]: no client selected.
    /// - [`InvoiceError::MissingEmployee`]: no employee selected.
    pub fn validate(&self) -> Result<NewInvoice, InvoiceError> {
        if self.details.is_empty() {
            return Err(InvoiceError::NoDetails);
        }

        let client_id = self.client_id.ok_or(InvoiceError::MissingClient)?;
        let employee_id = self.employee_id.ok_or(InvoiceError::MissingEmployee)?;

        let notes = self.notes.trim();

        Ok(NewInvoice {
            client_id,
            employee_id,
            discount: self.discount,
            tax: self.tax,
            notes: (!notes.is_empty()).then(|| notes.to_owned()),
            details: self.details.clone(),
        })
    }
}
