//! Eligible services.
//!
//! Lists what a pet can still be billed for and moves the operator's selection into the cart
//! or an invoice draft.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use vetshop::{
    cart::{CartError, CartSession, CartStore, LineId, SourceRef},
    eligibility::{MaterializedSelection, Selection, eligible_appointments, eligible_vaccinations},
    ids::PetId,
    records::{appointments::Appointment, vaccinations::Vaccination},
};

use crate::{
    api::ApiError,
    domain::{appointments::AppointmentsService, vaccinations::VaccinationsService},
};

/// Billable records of a pet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EligibleServices {
    /// Completed appointments not yet invoiced nor in the cart.
    pub appointments: Vec<Appointment>,

    /// Completed vaccinations not yet invoiced nor in the cart.
    pub vaccinations: Vec<Vaccination>,
}

impl EligibleServices {
    /// Whether there is nothing to bill.
    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty() && self.vaccinations.is_empty()
    }
}

/// Why a selected record did not reach the cart.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// Its invoice projection could not be fetched.
    #[error("failed to fetch invoice data")]
    Fetch(#[from] ApiError),

    /// The cart refused it.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Result of adding one selected record to the cart.
#[derive(Debug)]
pub struct SelectionOutcome {
    /// The selected record.
    pub source: SourceRef,

    /// The new cart line, or why none was added.
    pub result: Result<LineId, SelectionError>,
}

/// Resolves billable appointments and vaccinations.
#[derive(Clone)]
pub struct EligibleServiceResolver {
    appointments: Arc<dyn AppointmentsService>,
    vaccinations: Arc<dyn VaccinationsService>,
}

impl std::fmt::Debug for EligibleServiceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EligibleServiceResolver")
            .finish_non_exhaustive()
    }
}

impl EligibleServiceResolver {
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

    /// Billable records of `pet` that are not already in `cart`.
    ///
    /// A failed listing is logged and treated as empty.
    #[tracing::instrument(name = "billing.eligible.load_for_pet", skip(self, cart))]
    pub async fn load_eligible_for_pet(&self, pet: PetId, cart: &CartSession) -> EligibleServices {
        let appointments = match self.appointments.list_for_pet(pet).await {
            Ok(records) => eligible_appointments(&records, cart),
            Err(error) => {
                warn!(pet_id = %pet, status = ?error.status(), %error, "failed to list appointments");

                Vec::new()
            }
        };

        let vaccinations = match self.vaccinations.list_for_pet(pet).await {
            Ok(records) => eligible_vaccinations(&records, cart),
            Err(error) => {
                warn!(pet_id = %pet, status = ?error.status(), %error, "failed to list vaccinations");

                Vec::new()
            }
        };

        EligibleServices {
            appointments,
            vaccinations,
        }
    }

    /// Fetch the invoice projection of every selected record.
    ///
    /// Records whose projection cannot be fetched are logged and skipped.
    #[tracing::instrument(
        name = "billing.eligible.materialize_selected",
        skip(self, selection),
        fields(selected = selection.len())
    )]
    pub async fn materialize_selected(&self, selection: &Selection) -> MaterializedSelection {
        let mut materialized = MaterializedSelection::default();

        for id in selection.appointments() {
            match self.appointments.invoice_data(id).await {
                Ok(data) => materialized.appointments.push(data),
                Err(error) => {
                    warn!(appointment_id = %id, status = ?error.status(), %error, "skipping appointment");
                }
            }
        }

        for id in selection.vaccinations() {
            match self.vaccinations.invoice_data(id).await {
                Ok(data) => materialized.vaccinations.push(data),
                Err(error) => {
                    warn!(vaccination_id = %id, status = ?error.status(), %error, "skipping vaccination");
                }
            }
        }

        materialized
    }

    /// Add every selected record to the cart, one at a time.
    ///
    /// A rejected record does not stop the rest; each gets its own outcome.
    #[tracing::instrument(
        name = "billing.eligible.add_selected_to_cart",
        skip(self, selection, cart),
        fields(selected = selection.len())
    )]
    pub async fn add_selected_to_cart(
        &self,
        selection: &Selection,
        cart: &mut CartStore,
    ) -> Vec<SelectionOutcome> {
        let mut outcomes = Vec::with_capacity(selection.len());

        for id in selection.appointments() {
            let result = match self.appointments.invoice_data(id).await {
                Ok(data) => cart.add_from_appointment(&data).map_err(SelectionError::from),
                Err(error) => Err(error.into()),
            };

            outcomes.push(SelectionOutcome {
                source: SourceRef::Appointment(id),
                result,
            });
        }

        for id in selection.vaccinations() {
            let result = match self.vaccinations.invoice_data(id).await {
                Ok(data) => cart.add_from_vaccination(&data).map_err(SelectionError::from),
                Err(error) => Err(error.into()),
            };

            outcomes.push(SelectionOutcome {
                source: SourceRef::Vaccination(id),
                result,
            });
        }

        for outcome in &outcomes {
            if let Err(error) = &outcome.result {
                warn!(source = %outcome.source, %error, "selected record not added to cart");
            }
        }

        info!(
            added = outcomes.iter().filter(|outcome| outcome.result.is_ok()).count(),
            "added selection to cart"
        );

        outcomes
    }
}
