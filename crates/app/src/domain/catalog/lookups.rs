//! Catalog lookups.
//!
//! A read-only snapshot of the catalogue used to fill in invoice lines and display names.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;
use vetshop::{
    cart::LineItem,
    ids::{ClientId, PetId, ProductId, ServiceId},
    invoice::ManualDetail,
    records::catalog::{Client, Pet, Product, Service},
};

use crate::{api::ApiError, domain::catalog::CatalogService};

/// Errors raised by catalogue lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// No active product with this id.
    #[error("product {0} is not in the catalogue")]
    UnknownProduct(ProductId),

    /// No active service with this id.
    #[error("service {0} is not in the catalogue")]
    UnknownService(ServiceId),
}

/// Catalogue snapshot. Inactive products and services are left out.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: FxHashMap<ProductId, Product>,
    services: FxHashMap<ServiceId, Service>,
    clients: FxHashMap<ClientId, Client>,
    pets: FxHashMap<PetId, Pet>,
}

impl Catalog {
    /// Fetch a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first [`ApiError`] raised while listing.
    #[tracing::instrument(name = "catalog.load", skip(service), err)]
    pub async fn load(service: &dyn CatalogService) -> Result<Self, ApiError> {
        let products = service.list_products().await?;
        let services = service.list_services().await?;
        let clients = service.list_clients().await?;
        let pets = service.list_pets().await?;

        let catalog = Self::from_parts(products, services, clients, pets);

        debug!(
            products = catalog.products.len(),
            services = catalog.services.len(),
            clients = catalog.clients.len(),
            pets = catalog.pets.len(),
            "loaded catalogue"
        );

        Ok(catalog)
    }

    /// Build a snapshot from already fetched records.
    pub fn from_parts(
        products: Vec<Product>,
        services: Vec<Service>,
        clients: Vec<Client>,
        pets: Vec<Pet>,
    ) -> Self {
        Self {
            products: products
                .into_iter()
                .filter(|product| product.active)
                .map(|product| (product.id, product))
                .collect(),
            services: services
                .into_iter()
                .filter(|service| service.active)
                .map(|service| (service.id, service))
                .collect(),
            clients: clients
                .into_iter()
                .map(|client| (client.id, client))
                .collect(),
            pets: pets.into_iter().map(|pet| (pet.id, pet)).collect(),
        }
    }

    /// Active product by id.
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Active service by id.
    pub fn service(&self, id: ServiceId) -> Option<&Service> {
        self.services.get(&id)
    }

    /// Active products sorted by name.
    pub fn products(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.products.values().collect();

        products.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        products
    }

    /// Active services sorted by name.
    pub fn services(&self) -> Vec<&Service> {
        let mut services: Vec<&Service> = self.services.values().collect();

        services.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        services
    }

    /// Display name of a client.
    pub fn client_name(&self, id: ClientId) -> Option<&str> {
        self.clients.get(&id).map(|client| client.name.as_str())
    }

    /// `"{pet} ({owner})"`, or the pet name alone when the owner is unknown.
    pub fn pet_label(&self, id: PetId) -> Option<String> {
        let pet = self.pets.get(&id)?;

        Some(match self.client_name(pet.client_id) {
            Some(owner) => format!("{} ({owner})", pet.name),
            None => pet.name.clone(),
        })
    }

    /// Pets owned by a client, sorted by name.
    pub fn pets_of(&self, client: ClientId) -> Vec<&Pet> {
        let mut pets: Vec<&Pet> = self
            .pets
            .values()
            .filter(|pet| pet.client_id == client)
            .collect();

        pets.sort_by(|a, b| a.name.cmp(&b.name));

        pets
    }

    /// Invoice line for a catalogue product at its list price.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownProduct`] for an unknown or inactive product.
    pub fn manual_detail_for_product(
        &self,
        id: ProductId,
        quantity: u32,
        discount: Decimal,
    ) -> Result<ManualDetail, CatalogError> {
        let product = self.product(id).ok_or(CatalogError::UnknownProduct(id))?;

        Ok(ManualDetail {
            item: LineItem::product(id),
            name: product.name.clone(),
            quantity,
            unit_price: product.price,
            discount,
        })
    }

    /// Invoice line for a catalogue service at its list price.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownService`] for an unknown or inactive service.
    pub fn manual_detail_for_service(
        &self,
        id: ServiceId,
        quantity: u32,
        discount: Decimal,
    ) -> Result<ManualDetail, CatalogError> {
        let service = self.service(id).ok_or(CatalogError::UnknownService(id))?;

        Ok(ManualDetail {
            item: LineItem::service(id),
            name: service.name.clone(),
            quantity,
            unit_price: service.price,
            discount,
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::domain::catalog::MockCatalogService;

    use super::*;

    fn product(id: u64, name: &str, active: bool) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            price: dec!(18000),
            active,
        }
    }

    fn mock_catalog() -> MockCatalogService {
        let mut catalog = MockCatalogService::new();

        catalog.expect_list_products().returning(|| {
            Ok(vec![
                product(1, "Shampoo", true),
                product(2, "Collar", false),
                product(3, "Arena", true),
            ])
        });

        catalog.expect_list_services().returning(|| {
            Ok(vec![Service {
                id: ServiceId::new(7),
                name: "Baño".to_owned(),
                price: dec!(35000),
                active: true,
            }])
        });

        catalog.expect_list_clients().returning(|| {
            Ok(vec![Client {
                id: ClientId::new(3),
                name: "Ana Ruiz".to_owned(),
                document: None,
            }])
        });

        catalog.expect_list_pets().returning(|| {
            Ok(vec![
                Pet {
                    id: PetId::new(9),
                    name: "Luna".to_owned(),
                    client_id: ClientId::new(3),
                    species: Some("Felino".to_owned()),
                },
                Pet {
                    id: PetId::new(10),
                    name: "Toby".to_owned(),
                    client_id: ClientId::new(44),
                    species: None,
                },
            ])
        });

        catalog
    }

    #[tokio::test]
    async fn load_keeps_only_active_products() -> TestResult {
        let catalog = Catalog::load(&mock_catalog()).await?;

        let names: Vec<&str> = catalog
            .products()
            .iter()
            .map(|product| product.name.as_str())
            .collect();

        assert_eq!(names, vec!["Arena", "Shampoo"]);
        assert!(catalog.product(ProductId::new(2)).is_none());

        Ok(())
    }

    #[tokio::test]
    async fn pet_label_names_the_owner() -> TestResult {
        let catalog = Catalog::load(&mock_catalog()).await?;

        assert_eq!(
            catalog.pet_label(PetId::new(9)).as_deref(),
            Some("Luna (Ana Ruiz)")
        );
        assert_eq!(catalog.pet_label(PetId::new(10)).as_deref(), Some("Toby"));
        assert_eq!(catalog.pet_label(PetId::new(99)), None);
        assert_eq!(catalog.pets_of(ClientId::new(3)).len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn manual_details_use_list_prices() -> TestResult {
        let catalog = Catalog::load(&mock_catalog()).await?;

        let detail = catalog.manual_detail_for_service(ServiceId::new(7), 2, dec!(10))?;

        assert_eq!(detail.name, "Baño");
        assert_eq!(detail.unit_price, dec!(35000));
        assert_eq!(detail.item, LineItem::service(ServiceId::new(7)));

        assert_eq!(
            catalog.manual_detail_for_product(ProductId::new(2), 1, dec!(0)),
            Err(CatalogError::UnknownProduct(ProductId::new(2)))
        );

        Ok(())
    }

    #[tokio::test]
    async fn load_fails_when_a_listing_fails() {
        let mut catalog = MockCatalogService::new();

        catalog.expect_list_products().returning(|| {
            Err(ApiError::Rejected {
                status: 401,
                message: "unauthorized".to_owned(),
            })
        });

        let result = Catalog::load(&catalog).await;

        assert!(matches!(result, Err(ApiError::Rejected { status: 401, .. })));
    }
}
