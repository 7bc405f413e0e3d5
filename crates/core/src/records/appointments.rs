//! Appointment Records

use jiff::civil::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{AppointmentId, ClientId, PetId, ServiceId};

/// Appointment lifecycle state as reported by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    /// Booked, not yet confirmed.
    #[serde(rename = "PENDIENTE")]
    Pending,

    /// Confirmed with the client.
    #[serde(rename = "CONFIRMADA")]
    Confirmed,

    /// The pet is being attended.
    #[serde(rename = "EN_PROCESO")]
    InProgress,

    /// Attended; billable once.
    #[serde(rename = "COMPLETADA")]
    Completed,

    /// Cancelled before attention.
    #[serde(rename = "CANCELADA")]
    Cancelled,

    /// Any state this console does not know about.
    #[serde(other)]
    Other,
}

/// Appointment Record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub pet_id: PetId,
    #[serde(default)]
    pub client_id: Option<ClientId>,
    #[serde(default)]
    pub service_id: Option<ServiceId>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub service_price: Option<Decimal>,
    #[serde(default)]
    pub scheduled_for: Option<DateTime>,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub invoiced: bool,
}

impl Appointment {
    /// Completed and not yet invoiced.
    #[must_use]
    pub fn is_billable(&self) -> bool {
        self.status == AppointmentStatus::Completed && !self.invoiced
    }
}

/// Invoice projection of an appointment, with pricing computed by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentInvoiceData {
    pub appointment_id: AppointmentId,
    pub service_id: ServiceId,
    pub service_name: String,
    pub service_price: Decimal,
    pub pet_id: PetId,
    pub pet_name: String,
    pub client_id: ClientId,
    pub client_name: String,
}

impl AppointmentInvoiceData {
    /// Label for the billed service, naming the pet it was provided to.
    #[must_use]
    pub fn line_label(&self) -> String {
        format!("{} - Mascota: {}", self.service_name, self.pet_name)
    }
}
