//! Cart Lines

use std::fmt;

use jiff::Timestamp;
use rand::{Rng, distributions::Alphanumeric};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    ids::{AppointmentId, PetId, ProductId, ServiceId, VaccinationId},
    pricing::{Percent, line_total},
};

const LINE_ID_SUFFIX_LEN: usize = 9;

/// What a line sells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE", rename_all_fields = "camelCase")]
pub enum LineItem {
    /// A catalogue product.
    Product {
        /// Product sold.
        product_id: ProductId,
    },

    /// A clinic service. Vaccinations applied without a catalogue product carry no reference.
    Service {
        /// Service sold, when the backend names one.
        service_id: Option<ServiceId>,
    },
}

impl LineItem {
    /// Product line.
    #[must_use]
    pub const fn product(product_id: ProductId) -> Self {
        Self::Product { product_id }
    }

    /// Service line.
    #[must_use]
    pub const fn service(service_id: ServiceId) -> Self {
        Self::Service {
            service_id: Some(service_id),
        }
    }

    /// Whether the line points at a catalogue product or service.
    #[must_use]
    pub const fn has_reference(&self) -> bool {
        match self {
            Self::Product { .. } => true,
            Self::Service { service_id } => service_id.is_some(),
        }
    }

    /// Upper-case kind tag used on the wire.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Product { .. } => "PRODUCT",
            Self::Service { .. } => "SERVICE",
        }
    }

    const fn reference(&self) -> Option<u64> {
        match self {
            Self::Product { product_id } => Some(product_id.get()),
            Self::Service { service_id } => match service_id {
                Some(id) => Some(id.get()),
                None => None,
            },
        }
    }
}

/// The clinic record a line was created from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceRef {
    /// A completed appointment.
    Appointment(AppointmentId),

    /// A completed vaccination.
    Vaccination(VaccinationId),
}

impl SourceRef {
    const fn kind(self) -> &'static str {
        match self {
            Self::Appointment(_) => "CITA",
            Self::Vaccination(_) => "VACUNACION",
        }
    }

    const fn reference(self) -> u64 {
        match self {
            Self::Appointment(id) => id.get(),
            Self::Vaccination(id) => id.get(),
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Appointment(id) => write!(f, "appointment {id}"),
            Self::Vaccination(id) => write!(f, "vaccination {id}"),
        }
    }
}

/// Back-references kept for display and de-duplication.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineMetadata {
    /// Pet the line was provided to.
    pub pet_id: Option<PetId>,

    /// Pet name at the time the line was added.
    pub pet_name: Option<String>,

    /// Record the line originates from.
    pub source: Option<SourceRef>,
}

/// Opaque, unique cart line id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(String);

impl LineId {
    /// Generate an id of the form `{KIND}-{reference|timestamp}-{random}`.
    #[must_use]
    pub fn generate(kind: &str, reference: Option<u64>) -> Self {
        let reference =
            reference.map_or_else(|| Timestamp::now().as_millisecond().to_string(), |r| r.to_string());

        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(LINE_ID_SUFFIX_LEN)
            .map(|c| char::from(c).to_ascii_lowercase())
            .collect();

        Self(format!("{kind}-{reference}-{suffix}"))
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LineId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One purchasable unit pending invoicing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    id: LineId,
    #[serde(flatten)]
    item: LineItem,
    name: String,
    quantity: u32,
    unit_price: Decimal,
    discount: Percent,
    #[serde(default)]
    metadata: LineMetadata,
}

impl CartLine {
    /// Create an undiscounted line. The id kind follows the source record when there is one.
    pub(crate) fn new(
        item: LineItem,
        name: String,
        quantity: u32,
        unit_price: Decimal,
        metadata: LineMetadata,
    ) -> Self {
        let id = match metadata.source {
            Some(source) => LineId::generate(source.kind(), Some(source.reference())),
            None => LineId::generate(item.kind(), item.reference()),
        };

        Self {
            id,
            item,
            name,
            quantity,
            unit_price,
            discount: Percent::ZERO,
            metadata,
        }
    }

    /// Line id
    pub fn id(&self) -> &LineId {
        &self.id
    }

    /// What the line sells.
    pub fn item(&self) -> LineItem {
        self.item
    }

    /// Human-readable label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Units, at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price of one unit before discount.
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Per-line discount.
    pub fn discount(&self) -> Percent {
        self.discount
    }

    /// Back-references for display and de-duplication.
    pub fn metadata(&self) -> &LineMetadata {
        &self.metadata
    }

    /// The record the line originates from, if any.
    pub fn source(&self) -> Option<SourceRef> {
        self.metadata.source
    }

    /// `quantity × unit_price × (1 − discount / 100)`, derived from the current inputs.
    pub fn line_total(&self) -> Decimal {
        line_total(self.quantity, self.unit_price, self.discount)
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub(crate) fn set_discount(&mut self, discount: Percent) {
        self.discount = discount;
    }
}
