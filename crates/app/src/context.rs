//! App Context

use std::sync::Arc;

use thiserror::Error;
use vetshop::cart::StorageError;

use crate::{
    api::{ApiClient, ApiError},
    billing::{Checkout, EligibleServiceResolver, InvoiceAssembler, Reconciler},
    config::ApiConfig,
    domain::{
        appointments::{AppointmentsService, HttpAppointmentsService},
        catalog::{CatalogService, HttpCatalogService},
        invoices::{HttpInvoicesService, InvoicesService},
        vaccinations::{BoosterChainer, HttpVaccinationsService, VaccinationsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to configure the backend client")]
    Api(#[from] ApiError),

    #[error("failed to open cart storage")]
    Storage(#[from] StorageError),
}

#[derive(Clone)]
pub struct AppContext {
    pub appointments: Arc<dyn AppointmentsService>,
    pub vaccinations: Arc<dyn VaccinationsService>,
    pub invoices: Arc<dyn InvoicesService>,
    pub catalog: Arc<dyn CatalogService>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context backed by the REST API.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend client cannot be configured.
    pub fn from_config(config: &ApiConfig) -> Result<Self, AppInitError> {
        let client = ApiClient::new(config)?;

        Ok(Self {
            appointments: Arc::new(HttpAppointmentsService::new(client.clone())),
            vaccinations: Arc::new(HttpVaccinationsService::new(client.clone())),
            invoices: Arc::new(HttpInvoicesService::new(client.clone())),
            catalog: Arc::new(HttpCatalogService::new(client)),
        })
    }

    #[must_use]
    pub fn resolver(&self) -> EligibleServiceResolver {
        EligibleServiceResolver::new(
            Arc::clone(&self.appointments),
            Arc::clone(&self.vaccinations),
        )
    }

    #[must_use]
    pub fn assembler(&self) -> InvoiceAssembler {
        InvoiceAssembler::new(Arc::clone(&self.invoices))
    }

    #[must_use]
    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(
            Arc::clone(&self.appointments),
            Arc::clone(&self.vaccinations),
        )
    }

    #[must_use]
    pub fn checkout(&self) -> Checkout {
        Checkout::new(self.assembler(), self.reconciler())
    }

    #[must_use]
    pub fn booster_chainer(&self) -> BoosterChainer {
        BoosterChainer::new(Arc::clone(&self.vaccinations))
    }
}
