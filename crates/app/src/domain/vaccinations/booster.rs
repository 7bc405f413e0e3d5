//! Booster dose chaining.
//!
//! Recording dose `N > 1` of a vaccine closes the open dose `N − 1` of the same pet and vaccine,
//! noting which record superseded it.

use std::sync::Arc;

use thiserror::Error;
use tracing::{Span, info, warn};
use vetshop::{
    boosters::{complete_previous, find_previous_dose, requires_chain},
    ids::VaccinationId,
    records::vaccinations::{BoosterDose, NewVaccination, Vaccination},
};

use crate::{api::ApiError, domain::vaccinations::VaccinationsService};

/// Errors raised while recording a dose.
#[derive(Debug, Error)]
pub enum BoosterError {
    /// The new dose was not recorded.
    #[error("failed to record the vaccination")]
    Create(#[source] ApiError),

    /// The new dose was recorded but the previous one could not be completed.
    #[error("recorded vaccination {} but failed to complete vaccination {previous}", .created.id)]
    CompletePrevious {
        /// The dose that was recorded.
        created: Box<Vaccination>,
        /// The dose left open.
        previous: VaccinationId,
        /// Backend failure.
        #[source]
        source: ApiError,
    },
}

/// Outcome of recording a dose.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedDose {
    /// The dose that was recorded.
    pub created: Vaccination,

    /// The previous dose, as completed by this call.
    pub completed_previous: Option<Vaccination>,
}

/// Records vaccination doses, closing the previous dose of a chain.
#[derive(Clone)]
pub struct BoosterChainer {
    vaccinations: Arc<dyn VaccinationsService>,
}

impl std::fmt::Debug for BoosterChainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoosterChainer").finish_non_exhaustive()
    }
}

impl BoosterChainer {
    #[must_use]
    pub fn new(vaccinations: Arc<dyn VaccinationsService>) -> Self {
        Self { vaccinations }
    }

    /// Record a dose, completing the open previous dose when one exists.
    ///
    /// A failure to look up previous doses is logged and the dose is recorded on its own.
    ///
    /// # Errors
    ///
    /// - [`BoosterError::Create`]: the dose was not recorded.
    /// - [`BoosterError::CompletePrevious`]: the dose was recorded but the previous one was
    ///   not completed.
    #[tracing::instrument(
        name = "vaccinations.booster.record_dose",
        skip(self, dose),
        fields(
            pet_id = %dose.pet_id,
            dose_number = dose.dose_number,
            previous_id = tracing::field::Empty
        ),
        err
    )]
    pub async fn record_dose(&self, dose: NewVaccination) -> Result<RecordedDose, BoosterError> {
        let dose_number = dose.dose_number;

        let previous = if requires_chain(dose_number) {
            self.previous_dose(&dose).await
        } else {
            None
        };

        if let Some(previous) = &previous {
            Span::current().record("previous_id", tracing::field::display(previous.id));
        }

        let created = self
            .vaccinations
            .create_vaccination(dose)
            .await
            .map_err(BoosterError::Create)?;

        info!(vaccination_id = %created.id, "recorded vaccination dose");

        let Some(previous) = previous else {
            return Ok(RecordedDose {
                created,
                completed_previous: None,
            });
        };

        let update = complete_previous(&previous, dose_number, created.id);

        match self
            .vaccinations
            .update_vaccination(previous.id, update)
            .await
        {
            Ok(completed) => {
                info!(
                    vaccination_id = %created.id,
                    previous_id = %previous.id,
                    "completed previous dose"
                );

                Ok(RecordedDose {
                    created,
                    completed_previous: Some(completed),
                })
            }
            Err(source) => Err(BoosterError::CompletePrevious {
                created: Box::new(created),
                previous: previous.id,
                source,
            }),
        }
    }

    /// Record the dose following `source` for the same pet, vaccine and product.
    ///
    /// # Errors
    ///
    /// As [`BoosterChainer::record_dose`].
    pub async fn record_booster(
        &self,
        source: &Vaccination,
        dose: BoosterDose,
    ) -> Result<RecordedDose, BoosterError> {
        self.record_dose(NewVaccination::booster_of(source, dose))
            .await
    }

    async fn previous_dose(&self, dose: &NewVaccination) -> Option<Vaccination> {
        match self.vaccinations.list_for_pet(dose.pet_id).await {
            Ok(records) => {
                find_previous_dose(&records, &dose.vaccine_name, dose.dose_number).cloned()
            }
            Err(error) => {
                warn!(
                    pet_id = %dose.pet_id,
                    status = ?error.status(),
                    %error,
                    "failed to look up previous doses; recording without chaining"
                );

                None
            }
        }
    }
}
