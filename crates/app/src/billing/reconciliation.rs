//! Post-invoice reconciliation.
//!
//! Once an invoice exists, each appointment and vaccination it bills is flagged as invoiced.
//! Failures are reported per record and never undo the invoice.

use std::sync::Arc;

use tracing::{info, warn};
use vetshop::{cart::SourceRef, invoice::InvoiceTracking};

use crate::{
    api::ApiError,
    domain::{appointments::AppointmentsService, vaccinations::VaccinationsService},
};

/// Why a record could not be flagged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileFailure {
    /// HTTP status, when the backend answered.
    pub status: Option<u16>,

    /// Human-readable reason.
    pub message: String,
}

impl From<&ApiError> for ReconcileFailure {
    fn from(error: &ApiError) -> Self {
        Self {
            status: error.status(),
            message: error.to_string(),
        }
    }
}

/// Result of flagging one record as invoiced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// The record.
    pub source: SourceRef,

    /// `None` when the record was flagged.
    pub failure: Option<ReconcileFailure>,
}

impl ReconcileOutcome {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Flags invoiced records on the backend.
#[derive(Clone)]
pub struct Reconciler {
    appointments: Arc<dyn AppointmentsService>,
    vaccinations: Arc<dyn VaccinationsService>,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler").finish_non_exhaustive()
    }
}

impl Reconciler {
    #[must_use]
    pub fn new(
        appointments: Arc<dyn AppointmentsService>,
        vaccinations: Arc<dyn VaccinationsService>,
    ) -> Self {
        Self {
            appointments,
            vaccinations,
        }
    }

    /// Flag every tracked appointment, then every tracked vaccination, one call at a time.
    #[tracing::instrument(
        name = "billing.reconciliation.reconcile",
        skip(self, tracking),
        fields(
            appointments = tracking.appointments().len(),
            vaccinations = tracking.vaccinations().len()
        )
    )]
    pub async fn reconcile(&self, tracking: &InvoiceTracking) -> Vec<ReconcileOutcome> {
        let mut outcomes = Vec::new();

        for source in tracking.sources() {
            let result = match source {
                SourceRef::Appointment(id) => self.appointments.mark_invoiced(id).await,
                SourceRef::Vaccination(id) => self.vaccinations.mark_invoiced(id).await,
            };

            let failure = result.err().map(|error| {
                warn!(
                    %source,
                    status = ?error.status(),
                    %error,
                    "failed to flag record as invoiced"
                );

                ReconcileFailure::from(&error)
            });

            outcomes.push(ReconcileOutcome { source, failure });
        }

        let failed = outcomes.iter().filter(|outcome| !outcome.is_success()).count();

        info!(flagged = outcomes.len() - failed, failed, "reconciled invoice sources");

        outcomes
    }
}
