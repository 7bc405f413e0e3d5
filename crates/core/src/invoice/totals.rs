//! Invoice Totals

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{invoice::InvoiceDetail, pricing::Percent};

/// Amounts shown at the foot of an invoice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    /// Sum of detail subtotals.
    pub subtotal: Decimal,

    /// Invoice-wide discount taken off the subtotal.
    pub discount_amount: Decimal,

    /// Tax on the discounted subtotal.
    pub tax_amount: Decimal,

    /// Amount due.
    pub total: Decimal,
}

/// Compute invoice totals from the detail lines and the invoice-wide discount and tax.
///
/// ```text
/// subtotal        = Σ detail.subtotal
/// discount_amount = subtotal × discount / 100
/// tax_amount      = (subtotal − discount_amount) × tax / 100
/// total           = subtotal − discount_amount + tax_amount
/// ```
#[must_use]
pub fn compute_totals(details: &[InvoiceDetail], discount: Percent, tax: Percent) -> InvoiceTotals {
    let subtotal: Decimal = details.iter().map(InvoiceDetail::subtotal).sum();
    let discount_amount = discount.of(subtotal);
    let tax_amount = tax.of(subtotal - discount_amount);

    InvoiceTotals {
        subtotal,
        discount_amount,
        tax_amount,
        total: subtotal - discount_amount + tax_amount,
    }
}
