//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use vetshop::records::catalog::{Client, Pet, Product, Service};

use crate::api::{ApiClient, ApiError};

#[derive(Debug, Clone)]
pub struct HttpCatalogService {
    client: ApiClient,
}

impl HttpCatalogService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogService for HttpCatalogService {
    #[tracing::instrument(name = "catalog.service.list_products", skip(self), err)]
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.client.get("/products").await
    }

    #[tracing::instrument(name = "catalog.service.list_services", skip(self), err)]
    async fn list_services(&self) -> Result<Vec<Service>, ApiError> {
        self.client.get("/services").await
    }

    #[tracing::instrument(name = "catalog.service.list_clients", skip(self), err)]
    async fn list_clients(&self) -> Result<Vec<Client>, ApiError> {
        self.client.get("/clients").await
    }

    #[tracing::instrument(name = "catalog.service.list_pets", skip(self), err)]
    async fn list_pets(&self) -> Result<Vec<Pet>, ApiError> {
        self.client.get("/pets").await
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Retrieves all products, active or not.
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;

    /// Retrieves all services, active or not.
    async fn list_services(&self) -> Result<Vec<Service>, ApiError>;

    /// Retrieves all clients.
    async fn list_clients(&self) -> Result<Vec<Client>, ApiError>;

    /// Retrieves all pets.
    async fn list_pets(&self) -> Result<Vec<Pet>, ApiError>;
}
