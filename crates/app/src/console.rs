//! Console
//!
//! Owns the cart for the lifetime of a session and runs the billing flows against it.

use tracing::info;
use vetshop::{
    cart::{CartError, CartStore, JsonFileStorage},
    eligibility::Selection,
    ids::PetId,
    invoice::InvoiceDraft,
    records::vaccinations::{BoosterDose, NewVaccination, Vaccination},
};

use crate::{
    api::ApiError,
    billing::{CheckoutReport, EligibleServices, SelectionOutcome, SubmitError},
    config::ConsoleConfig,
    context::{AppContext, AppInitError},
    domain::{
        catalog::Catalog,
        vaccinations::{BoosterError, RecordedDose},
    },
};

/// A billing session: backend services plus the single cart instance.
#[derive(Debug)]
pub struct Console {
    context: AppContext,
    cart: CartStore,
}

impl Console {
    /// Wire the backend services and restore the cart from the configured file.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend client cannot be configured or the cart file exists
    /// but cannot be read.
    pub fn init(config: &ConsoleConfig) -> Result<Self, AppInitError> {
        let context = AppContext::from_config(&config.api)?;
        let storage = JsonFileStorage::open(&config.cart.cart_path)?;

        info!(path = %config.cart.cart_path.display(), "opened cart storage");

        Ok(Self::new(context, CartStore::init(Box::new(storage))))
    }

    #[must_use]
    pub fn new(context: AppContext, cart: CartStore) -> Self {
        Self { context, cart }
    }

    /// Flush the cart and end the session.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] when the final flush fails.
    pub fn dispose(self) -> Result<(), CartError> {
        self.cart.dispose()
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    /// Fresh catalogue snapshot.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the first failed listing.
    pub async fn load_catalog(&self) -> Result<Catalog, ApiError> {
        Catalog::load(self.context.catalog.as_ref()).await
    }

    /// Billable records of `pet` not yet in the cart.
    pub async fn eligible_for_pet(&self, pet: PetId) -> EligibleServices {
        self.context
            .resolver()
            .load_eligible_for_pet(pet, self.cart.session())
            .await
    }

    /// Add the selected records to the cart.
    pub async fn add_selected_to_cart(&mut self, selection: &Selection) -> Vec<SelectionOutcome> {
        self.context
            .resolver()
            .add_selected_to_cart(selection, &mut self.cart)
            .await
    }

    /// A new invoice draft seeded from the cart.
    pub fn open_invoice(&self) -> InvoiceDraft {
        self.context.assembler().open(self.cart.session())
    }

    /// Submit a draft, clearing the cart and flagging the billed records.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmitError`] when the invoice was not created.
    pub async fn checkout(&mut self, draft: &InvoiceDraft) -> Result<CheckoutReport, SubmitError> {
        self.context.checkout().submit(&mut self.cart, draft).await
    }

    /// Record a vaccination dose.
    ///
    /// # Errors
    ///
    /// See [`crate::domain::vaccinations::BoosterChainer::record_dose`].
    pub async fn record_dose(&self, dose: NewVaccination) -> Result<RecordedDose, BoosterError> {
        self.context.booster_chainer().record_dose(dose).await
    }

    /// Record the booster following `source`.
    ///
    /// # Errors
    ///
    /// See [`crate::domain::vaccinations::BoosterChainer::record_dose`].
    pub async fn record_booster(
        &self,
        source: &Vaccination,
        dose: BoosterDose,
    ) -> Result<RecordedDose, BoosterError> {
        self.context
            .booster_chainer()
            .record_booster(source, dose)
            .await
    }
}
