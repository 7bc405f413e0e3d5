//! Eligibility
//!
//! Which completed appointments and vaccinations of a pet can still be billed, and the
//! operator's selection among them.

use std::collections::BTreeSet;

use crate::{
    cart::{CartSession, SourceRef},
    ids::{AppointmentId, VaccinationId},
    invoice::{InvoiceDetail, InvoiceTracking},
    records::{
        appointments::{Appointment, AppointmentInvoiceData},
        vaccinations::{Vaccination, VaccinationInvoiceData},
    },
};

/// Completed, uninvoiced appointments that are not already in the cart.
pub fn eligible_appointments(records: &[Appointment], cart: &CartSession) -> Vec<Appointment> {
    records
        .iter()
        .filter(|record| {
            record.is_billable() && !cart.is_present(SourceRef::Appointment(record.id))
        })
        .cloned()
        .collect()
}

/// Completed, uninvoiced vaccinations that are not already in the cart.
pub fn eligible_vaccinations(records: &[Vaccination], cart: &CartSession) -> Vec<Vaccination> {
    records
        .iter()
        .filter(|record| {
            record.is_billable() && !cart.is_present(SourceRef::Vaccination(record.id))
        })
        .cloned()
        .collect()
}

/// Records ticked by the operator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    appointments: BTreeSet<AppointmentId>,
    vaccinations: BTreeSet<VaccinationId>,
}

impl Selection {
    /// Flip membership of `source`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, source: SourceRef) -> bool {
        fn flip<T: Ord>(set: &mut BTreeSet<T>, id: T) -> bool {
            if set.remove(&id) {
                false
            } else {
                set.insert(id)
            }
        }

        match source {
            SourceRef::Appointment(id) => flip(&mut self.appointments, id),
            SourceRef::Vaccination(id) => flip(&mut self.vaccinations, id),
        }
    }

    /// Whether `source` is selected.
    pub fn contains(&self, source: SourceRef) -> bool {
        match source {
            SourceRef::Appointment(id) => self.appointments.contains(&id),
            SourceRef::Vaccination(id) => self.vaccinations.contains(&id),
        }
    }

    /// Selected appointments, ascending.
    pub fn appointments(&self) -> impl Iterator<Item = AppointmentId> + '_ {
        self.appointments.iter().copied()
    }

    /// Selected vaccinations, ascending.
    pub fn vaccinations(&self) -> impl Iterator<Item = VaccinationId> + '_ {
        self.vaccinations.iter().copied()
    }

    /// Number of selected records.
    pub fn len(&self) -> usize {
        self.appointments.len() + self.vaccinations.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty() && self.vaccinations.is_empty()
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.appointments.clear();
        self.vaccinations.clear();
    }
}

/// Invoice projections fetched for a [`Selection`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterializedSelection {
    pub appointments: Vec<AppointmentInvoiceData>,
    pub vaccinations: Vec<VaccinationInvoiceData>,
}

impl MaterializedSelection {
    /// One detail per record, appointments first.
    pub fn details(&self) -> Vec<InvoiceDetail> {
        self.appointments
            .iter()
            .map(InvoiceDetail::from)
            .chain(self.vaccinations.iter().map(InvoiceDetail::from))
            .collect()
    }

    /// Sources covered by the selection.
    pub fn tracking(&self) -> InvoiceTracking {
        self.appointments
            .iter()
            .map(|data| SourceRef::Appointment(data.appointment_id))
            .chain(
                self.vaccinations
                    .iter()
                    .map(|data| SourceRef::Vaccination(data.vaccination_id)),
            )
            .collect()
    }

    /// Whether nothing was materialized.
    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty() && self.vaccinations.is_empty()
    }
}
