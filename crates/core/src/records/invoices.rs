//! Invoice Records

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{ClientId, EmployeeId, InvoiceId};

/// Invoice state as reported by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    /// Issued, awaiting payment.
    #[serde(rename = "PENDIENTE")]
    Pending,

    /// Paid in full.
    #[serde(rename = "PAGADA")]
    Paid,

    /// Voided.
    #[serde(rename = "ANULADA")]
    Cancelled,

    /// Any state this console does not know about.
    #[serde(other)]
    Other,
}

/// Invoice Record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    #[serde(default)]
    pub number: Option<String>,
    pub client_id: ClientId,
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    pub subtotal: Decimal,
    #[serde(default)]
    pub discount_amount: Decimal,
    #[serde(default)]
    pub tax_amount: Decimal,
    pub total: Decimal,
    pub status: InvoiceStatus,
}
