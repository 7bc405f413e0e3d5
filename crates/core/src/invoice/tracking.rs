//! Invoice Tracking
//!
//! Appointments and vaccinations folded into a draft, kept so they can be flagged as invoiced
//! once the invoice exists.

use crate::{
    cart::SourceRef,
    ids::{AppointmentId, VaccinationId},
};

/// Source records of an invoice, de-duplicated and in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvoiceTracking {
    appointments: Vec<AppointmentId>,
    vaccinations: Vec<VaccinationId>,
}

impl InvoiceTracking {
    /// Record a source. Recording the same source twice has no effect.
    pub fn record(&mut self, source: SourceRef) {
        match source {
            SourceRef::Appointment(id) => {
                if !self.appointments.contains(&id) {
                    self.appointments.push(id);
                }
            }
            SourceRef::Vaccination(id) => {
                if !self.vaccinations.contains(&id) {
                    self.vaccinations.push(id);
                }
            }
        }
    }

    /// Tracked appointments.
    pub fn appointments(&self) -> &[AppointmentId] {
        &self.appointments
    }

    /// Tracked vaccinations.
    pub fn vaccinations(&self) -> &[VaccinationId] {
        &self.vaccinations
    }

    /// Every tracked source, appointments first.
    pub fn sources(&self) -> impl Iterator<Item = SourceRef> + '_ {
        self.appointments
            .iter()
            .copied()
            .map(SourceRef::Appointment)
            .chain(self.vaccinations.iter().copied().map(SourceRef::Vaccination))
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty() && self.vaccinations.is_empty()
    }
}

impl Extend<SourceRef> for InvoiceTracking {
    fn extend<I: IntoIterator<Item = SourceRef>>(&mut self, iter: I) {
        for source in iter {
            self.record(source);
        }
    }
}

impl FromIterator<SourceRef> for InvoiceTracking {
    fn from_iter<I: IntoIterator<Item = SourceRef>>(iter: I) -> Self {
        let mut tracking = Self::default();

        tracking.extend(iter);

        tracking
    }
}
