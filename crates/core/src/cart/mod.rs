//! Cart
//!
//! The cart holds lines for at most one client at a time and is persisted to [`CartStorage`]
//! after every mutation, so it survives a restart of the console.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    ids::{ClientId, ProductId, ServiceId},
    pricing::{Percent, PercentError},
    records::{appointments::AppointmentInvoiceData, vaccinations::VaccinationInvoiceData},
};

pub mod lines;
pub mod session;
pub mod storage;

pub use lines::{CartLine, LineId, LineItem, LineMetadata, SourceRef};
pub use session::{BoundClient, CartSession};
pub use storage::{CartStorage, JsonFileStorage, MemoryStorage, StorageError};

use storage::{CART_CLIENT_ID_KEY, CART_CLIENT_NAME_KEY, CART_ITEMS_KEY};

/// Errors raised by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantities start at one.
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(u32),

    /// Unit prices cannot be negative.
    #[error("unit price cannot be negative, got {0}")]
    NegativePrice(Decimal),

    /// Line discounts are percentages between 0 and 100.
    #[error("discount must be between 0 and 100, got {0}")]
    DiscountOutOfRange(Decimal),

    /// The cart is bound to another client.
    #[error(
        "the cart holds items for {bound_name}; invoice or clear them before adding items for {requested_name}"
    )]
    ClientMismatch {
        /// Client the cart is bound to.
        bound: ClientId,
        /// Name of the bound client.
        bound_name: String,
        /// Client of the rejected item.
        requested: ClientId,
        /// Name of the client of the rejected item.
        requested_name: String,
    },

    /// The record is already represented by a line.
    #[error("{0} is already in the cart")]
    AlreadyInCart(SourceRef),

    /// The change could not be persisted and was rolled back.
    #[error("failed to persist the cart")]
    Storage(#[from] StorageError),
}

impl From<PercentError> for CartError {
    fn from(error: PercentError) -> Self {
        match error {
            PercentError::OutOfRange(points) => Self::DiscountOutOfRange(points),
        }
    }
}

/// Single-instance cart store with an explicit `init`/`dispose` lifecycle.
#[derive(Debug)]
pub struct CartStore {
    session: CartSession,
    storage: Box<dyn CartStorage>,
}

impl CartStore {
    /// Restore the persisted cart from `storage`.
    ///
    /// Unreadable persisted state is discarded and the cart starts empty.
    pub fn init(storage: Box<dyn CartStorage>) -> Self {
        let session = restore(storage.as_ref()).unwrap_or_else(|error| {
            warn!(%error, "discarding unreadable persisted cart");

            CartSession::default()
        });

        debug!(lines = session.len(), "cart restored");

        Self { session, storage }
    }

    /// Flush the cart one last time and release the storage.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] when the final flush fails.
    pub fn dispose(mut self) -> Result<(), CartError> {
        self.persist()?;

        Ok(())
    }

    /// Current session.
    pub fn session(&self) -> &CartSession {
        &self.session
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        self.session.lines()
    }

    /// The bound client, if any.
    pub fn client(&self) -> Option<&BoundClient> {
        self.session.client()
    }

    /// Total units across all lines.
    pub fn count(&self) -> u64 {
        self.session.count()
    }

    /// Sum of line totals.
    pub fn total(&self) -> Decimal {
        self.session.total()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.session.is_empty()
    }

    /// Whether a line already originates from `source`.
    pub fn is_present(&self, source: SourceRef) -> bool {
        self.session.is_present(source)
    }

    /// Append a product line. Products are not de-duplicated and do not bind a client.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] for a zero quantity, a negative price, or a storage failure.
    pub fn add_product(
        &mut self,
        product_id: ProductId,
        name: impl Into<String>,
        price: Decimal,
        quantity: u32,
    ) -> Result<LineId, CartError> {
        self.add_catalogue_line(LineItem::product(product_id), name.into(), price, quantity)
    }

    /// Append a service line. Services are not de-duplicated and do not bind a client.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] for a zero quantity, a negative price, or a storage failure.
    pub fn add_service(
        &mut self,
        service_id: ServiceId,
        name: impl Into<String>,
        price: Decimal,
        quantity: u32,
    ) -> Result<LineId, CartError> {
        self.add_catalogue_line(LineItem::service(service_id), name.into(), price, quantity)
    }

    /// Append the service of a completed appointment, binding its client to the cart.
    ///
    /// # Errors
    ///
    /// - [`CartError::ClientMismatch`]: the cart already holds another client's lines.
    /// - [`CartError::AlreadyInCart`]: the appointment is already in the cart.
    /// - [`CartError::Storage`]: the cart could not be persisted.
    pub fn add_from_appointment(
        &mut self,
        appointment: &AppointmentInvoiceData,
    ) -> Result<LineId, CartError> {
        let source = SourceRef::Appointment(appointment.appointment_id);

        self.check_can_add(appointment.client_id, &appointment.client_name, source)?;

        let line = CartLine::new(
            LineItem::service(appointment.service_id),
            appointment.line_label(),
            1,
            appointment.service_price,
            LineMetadata {
                pet_id: Some(appointment.pet_id),
                pet_name: Some(appointment.pet_name.clone()),
                source: Some(source),
            },
        );

        self.push_sourced(line, appointment.client_id, &appointment.client_name)
    }

    /// Append a completed vaccination, binding its client to the cart.
    ///
    /// Vaccinations with a product are billed as that product, the rest as a service priced at
    /// zero unless the backend priced it.
    ///
    /// # Errors
    ///
    /// - [`CartError::ClientMismatch`]: the cart already holds another client's lines.
    /// - [`CartError::AlreadyInCart`]: the vaccination is already in the cart.
    /// - [`CartError::Storage`]: the cart could not be persisted.
    pub fn add_from_vaccination(
        &mut self,
        vaccination: &VaccinationInvoiceData,
    ) -> Result<LineId, CartError> {
        let source = SourceRef::Vaccination(vaccination.vaccination_id);

        self.check_can_add(vaccination.client_id, &vaccination.client_name, source)?;

        let line = CartLine::new(
            vaccination.line_item(),
            vaccination.line_label(),
            1,
            vaccination.unit_price(),
            LineMetadata {
                pet_id: Some(vaccination.pet_id),
                pet_name: Some(vaccination.pet_name.clone()),
                source: Some(source),
            },
        );

        self.push_sourced(line, vaccination.client_id, &vaccination.client_name)
    }

    /// Remove a line. Removing an unknown id is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] when the cart could not be persisted.
    pub fn remove_line(&mut self, id: &LineId) -> Result<(), CartError> {
        if self.session.line(id).is_none() {
            return Ok(());
        }

        self.commit(|session| session.remove(id))?;

        debug!(line_id = %id, "removed cart line");

        Ok(())
    }

    /// Change the quantity of a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a zero quantity, leaving the line unchanged,
    /// or [`CartError::Storage`] when the cart could not be persisted.
    pub fn update_quantity(&mut self, id: &LineId, quantity: u32) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        if self.session.line(id).is_none() {
            return Ok(());
        }

        self.commit(|session| {
            if let Some(line) = session.line_mut(id) {
                line.set_quantity(quantity);
            }
        })
    }

    /// Change the discount of a line, in percent points.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::DiscountOutOfRange`] outside `[0, 100]`, leaving the line unchanged,
    /// or [`CartError::Storage`] when the cart could not be persisted.
    pub fn update_discount(&mut self, id: &LineId, discount: Decimal) -> Result<(), CartError> {
        let discount = Percent::new(discount)?;

        if self.session.line(id).is_none() {
            return Ok(());
        }

        self.commit(|session| {
            if let Some(line) = session.line_mut(id) {
                line.set_discount(discount);
            }
        })
    }

    /// Empty the cart and unbind its client.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] when the cart could not be persisted.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.commit(CartSession::clear)?;

        debug!("cleared cart");

        Ok(())
    }

    fn add_catalogue_line(
        &mut self,
        item: LineItem,
        name: String,
        price: Decimal,
        quantity: u32,
    ) -> Result<LineId, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        if price < Decimal::ZERO {
            return Err(CartError::NegativePrice(price));
        }

        let line = CartLine::new(item, name, quantity, price, LineMetadata::default());
        let id = line.id().clone();

        self.commit(|session| session.push(line))?;

        debug!(line_id = %id, kind = item.kind(), "added catalogue line to cart");

        Ok(id)
    }

    fn check_can_add(
        &self,
        client: ClientId,
        client_name: &str,
        source: SourceRef,
    ) -> Result<(), CartError> {
        let bound = self
            .session
            .client()
            .filter(|bound| !self.session.is_empty() && bound.id != client);

        if let Some(bound) = bound {
            warn!(bound = %bound.id, requested = %client, %source, "rejected item for another client");

            return Err(CartError::ClientMismatch {
                bound: bound.id,
                bound_name: bound.name.clone(),
                requested: client,
                requested_name: client_name.to_owned(),
            });
        }

        if self.session.is_present(source) {
            warn!(%source, "rejected duplicate cart item");

            return Err(CartError::AlreadyInCart(source));
        }

        Ok(())
    }

    fn push_sourced(
        &mut self,
        line: CartLine,
        client: ClientId,
        client_name: &str,
    ) -> Result<LineId, CartError> {
        let id = line.id().clone();

        self.commit(|session| {
            if session.client().is_none() {
                session.bind(BoundClient {
                    id: client,
                    name: client_name.to_owned(),
                });
            }

            session.push(line);
        })?;

        debug!(line_id = %id, %client, "added sourced line to cart");

        Ok(id)
    }

    /// Apply `change` and persist it, restoring the previous session when persisting fails.
    fn commit<T>(&mut self, change: impl FnOnce(&mut CartSession) -> T) -> Result<T, CartError> {
        let previous = self.session.clone();
        let value = change(&mut self.session);

        if let Err(error) = self.persist() {
            warn!(%error, "failed to persist cart change, rolling back");

            self.session = previous;

            // Storage may hold part of the rejected change.
            if let Err(restore_error) = self.persist() {
                warn!(error = %restore_error, "failed to restore persisted cart");
            }

            return Err(error.into());
        }

        Ok(value)
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        if self.session.is_empty() {
            self.storage.remove(CART_ITEMS_KEY)?;
            self.storage.remove(CART_CLIENT_ID_KEY)?;
            self.storage.remove(CART_CLIENT_NAME_KEY)?;

            return Ok(());
        }

        self.storage
            .set(CART_ITEMS_KEY, serde_json::to_string(self.session.lines())?)?;

        match self.session.client() {
            Some(client) => {
                let (id, name) = (client.id.to_string(), client.name.clone());

                self.storage.set(CART_CLIENT_ID_KEY, id)?;
                self.storage.set(CART_CLIENT_NAME_KEY, name)?;
            }
            None => {
                self.storage.remove(CART_CLIENT_ID_KEY)?;
                self.storage.remove(CART_CLIENT_NAME_KEY)?;
            }
        }

        Ok(())
    }
}

fn restore(storage: &dyn CartStorage) -> Result<CartSession, StorageError> {
    let Some(items) = storage.get(CART_ITEMS_KEY)? else {
        return Ok(CartSession::default());
    };

    let mut lines: Vec<CartLine> = serde_json::from_str(&items)?;

    let before = lines.len();

    lines.retain(|line| line.quantity() >= 1 && line.unit_price() >= Decimal::ZERO);

    if lines.len() != before {
        warn!(
            dropped = before - lines.len(),
            "dropped invalid persisted cart lines"
        );
    }

    let client = match (
        storage.get(CART_CLIENT_ID_KEY)?,
        storage.get(CART_CLIENT_NAME_KEY)?,
    ) {
        (Some(id), Some(name)) => Some(BoundClient {
            id: serde_json::from_str(&id)?,
            name,
        }),
        _ => None,
    };

    if client.is_none() && lines.iter().any(|line| line.source().is_some()) {
        warn!("persisted cart has client records but no bound client, discarding it");

        return Ok(CartSession::default());
    }

    Ok(CartSession::from_parts(lines, client))
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
    };

    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::ids::{AppointmentId, PetId, VaccinationId};

    use super::*;

    fn store() -> (CartStore, MemoryStorage) {
        let storage = MemoryStorage::new();

        (CartStore::init(Box::new(storage.clone())), storage)
    }

    fn appointment(id: u64, client: u64) -> AppointmentInvoiceData {
        AppointmentInvoiceData {
            appointment_id: AppointmentId::new(id),
            service_id: ServiceId::new(1),
            service_name: "Consulta general".to_owned(),
            service_price: dec!(50000),
            pet_id: PetId::new(9),
            pet_name: "Luna".to_owned(),
            client_id: ClientId::new(client),
            client_name: format!("Cliente {client}"),
        }
    }

    fn vaccination(id: u64, client: u64, product: Option<u64>) -> VaccinationInvoiceData {
        VaccinationInvoiceData {
            vaccination_id: VaccinationId::new(id),
            vaccine_name: "Rabia".to_owned(),
            dose_number: 1,
            product_id: product.map(ProductId::new),
            product_name: product.map(|_| "Nobivac Rabia".to_owned()),
            product_price: product.map(|_| dec!(30000)),
            pet_id: PetId::new(9),
            pet_name: "Luna".to_owned(),
            client_id: ClientId::new(client),
            client_name: format!("Cliente {client}"),
        }
    }

    #[test]
    fn add_product_appends_undiscounted_line() -> TestResult {
        let (mut cart, _) = store();

        let id = cart.add_product(ProductId::new(4), "Collar", dec!(12000), 2)?;
        let line = cart.session().line(&id).ok_or("line missing")?;

        assert_eq!(line.discount(), Percent::ZERO);
        assert_eq!(line.line_total(), dec!(24000));
        assert_eq!(cart.client(), None);

        Ok(())
    }

    #[test]
    fn catalogue_lines_are_not_deduplicated() -> TestResult {
        let (mut cart, _) = store();

        cart.add_service(ServiceId::new(1), "Baño", dec!(20000), 1)?;
        cart.add_service(ServiceId::new(1), "Baño", dec!(20000), 1)?;

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.count(), 2);

        Ok(())
    }

    #[test]
    fn add_product_rejects_zero_quantity_and_negative_price() {
        let (mut cart, _) = store();

        assert!(matches!(
            cart.add_product(ProductId::new(4), "Collar", dec!(1), 0),
            Err(CartError::InvalidQuantity(0))
        ));
        assert!(matches!(
            cart.add_product(ProductId::new(4), "Collar", dec!(-1), 1),
            Err(CartError::NegativePrice(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn line_total_tracks_every_mutation() -> TestResult {
        let (mut cart, _) = store();

        let id = cart.add_product(ProductId::new(4), "Alimento", dec!(45500), 1)?;

        for (quantity, discount) in [(3, dec!(0)), (2, dec!(15)), (7, dec!(100)), (1, dec!(2.5))] {
            cart.update_quantity(&id, quantity)?;
            cart.update_discount(&id, discount)?;

            let line = cart.session().line(&id).ok_or("line missing")?;
            let expected = Decimal::from(quantity) * dec!(45500) * (dec!(1) - discount / dec!(100));

            assert_eq!(line.line_total(), expected);
        }

        Ok(())
    }

    #[test]
    fn invalid_updates_leave_the_line_unchanged() -> TestResult {
        let (mut cart, _) = store();

        let id = cart.add_product(ProductId::new(4), "Alimento", dec!(1000), 2)?;

        assert!(matches!(
            cart.update_quantity(&id, 0),
            Err(CartError::InvalidQuantity(0))
        ));
        assert!(matches!(
            cart.update_discount(&id, dec!(101)),
            Err(CartError::DiscountOutOfRange(_))
        ));

        let line = cart.session().line(&id).ok_or("line missing")?;

        assert_eq!(line.quantity(), 2);
        assert_eq!(line.discount(), Percent::ZERO);

        Ok(())
    }

    #[test]
    fn appointment_binds_client_and_prices_service() -> TestResult {
        let (mut cart, _) = store();

        let id = cart.add_from_appointment(&appointment(15, 3))?;
        let line = cart.session().line(&id).ok_or("line missing")?;

        assert_eq!(line.item(), LineItem::service(ServiceId::new(1)));
        assert_eq!(line.name(), "Consulta general - Mascota: Luna");
        assert_eq!(line.quantity(), 1);
        assert_eq!(line.line_total(), dec!(50000));
        assert_eq!(cart.client().map(|c| c.id), Some(ClientId::new(3)));

        Ok(())
    }

    #[test]
    fn second_client_is_rejected_without_changing_lines() -> TestResult {
        let (mut cart, _) = store();

        cart.add_from_appointment(&appointment(15, 3))?;

        let before = cart.lines().to_vec();

        let result = cart.add_from_vaccination(&vaccination(8, 4, Some(5)));

        assert!(
            matches!(result, Err(CartError::ClientMismatch { bound, requested, .. })
                if bound == ClientId::new(3) && requested == ClientId::new(4)),
            "expected ClientMismatch, got {result:?}"
        );
        assert_eq!(cart.lines(), before.as_slice());

        Ok(())
    }

    #[test]
    fn same_appointment_is_added_once() -> TestResult {
        let (mut cart, _) = store();

        cart.add_from_appointment(&appointment(15, 3))?;

        let result = cart.add_from_appointment(&appointment(15, 3));

        assert!(matches!(result, Err(CartError::AlreadyInCart(_))));

        let sourced = cart
            .lines()
            .iter()
            .filter(|line| line.source() == Some(SourceRef::Appointment(AppointmentId::new(15))))
            .count();

        assert_eq!(sourced, 1);
        assert!(cart.is_present(SourceRef::Appointment(AppointmentId::new(15))));

        Ok(())
    }

    #[test]
    fn vaccination_without_product_is_free_service() -> TestResult {
        let (mut cart, _) = store();

        let id = cart.add_from_vaccination(&vaccination(8, 3, None))?;
        let line = cart.session().line(&id).ok_or("line missing")?;

        assert_eq!(line.item(), LineItem::Service { service_id: None });
        assert_eq!(line.unit_price(), Decimal::ZERO);
        assert_eq!(line.name(), "Rabia (Dosis 1) - Mascota: Luna");

        Ok(())
    }

    #[test]
    fn vaccination_with_product_is_product_line() -> TestResult {
        let (mut cart, _) = store();

        let id = cart.add_from_vaccination(&vaccination(8, 3, Some(5)))?;
        let line = cart.session().line(&id).ok_or("line missing")?;

        assert_eq!(line.item(), LineItem::product(ProductId::new(5)));
        assert_eq!(line.unit_price(), dec!(30000));

        Ok(())
    }

    #[test]
    fn removing_last_line_unbinds_client_and_clears_storage() -> TestResult {
        let (mut cart, storage) = store();

        let id = cart.add_from_appointment(&appointment(15, 3))?;

        assert!(storage.contains(CART_ITEMS_KEY));
        assert!(storage.contains(CART_CLIENT_ID_KEY));
        assert!(storage.contains(CART_CLIENT_NAME_KEY));

        cart.remove_line(&id)?;

        assert_eq!(cart.client(), None);
        assert!(!storage.contains(CART_ITEMS_KEY));
        assert!(!storage.contains(CART_CLIENT_ID_KEY));
        assert!(!storage.contains(CART_CLIENT_NAME_KEY));

        Ok(())
    }

    #[test]
    fn removing_unknown_line_is_a_no_op() -> TestResult {
        let (mut cart, _) = store();

        cart.add_product(ProductId::new(4), "Collar", dec!(12000), 1)?;
        cart.remove_line(&LineId::from("PRODUCT-0-missing"))?;

        assert_eq!(cart.lines().len(), 1);

        Ok(())
    }

    #[test]
    fn after_emptying_another_client_may_bind() -> TestResult {
        let (mut cart, _) = store();

        cart.add_from_appointment(&appointment(15, 3))?;
        cart.clear()?;
        cart.add_from_appointment(&appointment(16, 4))?;

        assert_eq!(cart.client().map(|c| c.id), Some(ClientId::new(4)));

        Ok(())
    }

    #[test]
    fn count_and_total_sum_all_lines() -> TestResult {
        let (mut cart, _) = store();

        cart.add_from_appointment(&appointment(15, 3))?;
        cart.add_from_vaccination(&vaccination(8, 3, Some(5)))?;
        cart.add_product(ProductId::new(4), "Collar", dec!(12000), 2)?;

        assert_eq!(cart.count(), 4);
        assert_eq!(cart.total(), dec!(104000));

        Ok(())
    }

    #[test]
    fn init_restores_persisted_cart() -> TestResult {
        let storage = MemoryStorage::new();

        let mut cart = CartStore::init(Box::new(storage.clone()));
        let id = cart.add_from_appointment(&appointment(15, 3))?;
        cart.update_discount(&id, dec!(10))?;
        cart.dispose()?;

        let restored = CartStore::init(Box::new(storage));

        assert_eq!(restored.lines().len(), 1);
        assert_eq!(restored.total(), dec!(45000));
        assert_eq!(
            restored.client(),
            Some(&BoundClient {
                id: ClientId::new(3),
                name: "Cliente 3".to_owned(),
            })
        );

        Ok(())
    }

    #[test]
    fn init_discards_corrupt_state() -> TestResult {
        let mut storage = MemoryStorage::new();

        storage.set(CART_ITEMS_KEY, "{broken".to_owned())?;

        let cart = CartStore::init(Box::new(storage));

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn init_discards_sourced_lines_without_client() -> TestResult {
        let (mut cart, mut storage) = store();

        cart.add_from_appointment(&appointment(15, 3))?;
        storage.remove(CART_CLIENT_ID_KEY)?;

        let mut restored = CartStore::init(Box::new(storage.clone()));

        assert!(restored.is_empty());

        restored.add_from_appointment(&appointment(16, 4))?;

        assert_eq!(restored.client().map(|client| client.id), Some(ClientId::new(4)));

        Ok(())
    }

    /// Storage whose writes start failing once `broken` is set.
    #[derive(Debug, Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        broken: Arc<AtomicBool>,
    }

    impl CartStorage for FlakyStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(io::Error::other("disk full").into());
            }

            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(io::Error::other("disk full").into());
            }

            self.inner.remove(key)
        }
    }

    fn flaky_store() -> (CartStore, MemoryStorage, Arc<AtomicBool>) {
        let storage = FlakyStorage::default();
        let (inner, broken) = (storage.inner.clone(), Arc::clone(&storage.broken));

        (CartStore::init(Box::new(storage)), inner, broken)
    }

    #[test]
    fn failed_persist_leaves_the_cart_unchanged() -> TestResult {
        let (mut cart, _, broken) = flaky_store();

        broken.store(true, Ordering::SeqCst);

        let first = cart.add_from_appointment(&appointment(15, 3));

        assert!(matches!(first, Err(CartError::Storage(_))));
        assert!(cart.is_empty());
        assert_eq!(cart.client(), None);

        let retry = cart.add_from_appointment(&appointment(15, 3));

        assert!(matches!(retry, Err(CartError::Storage(_))));

        broken.store(false, Ordering::SeqCst);

        cart.add_from_appointment(&appointment(15, 3))?;

        assert_eq!(cart.lines().len(), 1);

        Ok(())
    }

    #[test]
    fn failed_persist_rolls_back_line_edits() -> TestResult {
        let (mut cart, inner, broken) = flaky_store();

        let id = cart.add_product(ProductId::new(4), "Collar", dec!(12000), 1)?;

        broken.store(true, Ordering::SeqCst);

        assert!(cart.update_quantity(&id, 3).is_err());
        assert!(cart.update_discount(&id, dec!(50)).is_err());
        assert!(cart.add_service(ServiceId::new(1), "Baño", dec!(20000), 1).is_err());
        assert!(cart.remove_line(&id).is_err());
        assert!(cart.clear().is_err());

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total(), dec!(12000));
        assert!(inner.contains(CART_ITEMS_KEY));

        Ok(())
    }

    #[test]
    fn unbound_cart_drops_client_keys() -> TestResult {
        let (mut cart, storage) = store();

        cart.add_product(ProductId::new(4), "Collar", dec!(12000), 1)?;

        assert!(storage.contains(CART_ITEMS_KEY));
        assert!(!storage.contains(CART_CLIENT_ID_KEY));

        Ok(())
    }
}
