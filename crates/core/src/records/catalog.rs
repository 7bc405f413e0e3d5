//! Catalogue Records

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{ClientId, EmployeeId, PetId, ProductId, ServiceId};

/// Product sold over the counter or applied during a visit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

/// Billable clinic service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub price: Decimal,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

/// Pet owner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    #[serde(default)]
    pub document: Option<String>,
}

/// Pet
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub client_id: ClientId,
    #[serde(default)]
    pub species: Option<String>,
}

/// Clinic employee issuing invoices and applying vaccines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
}

const fn active_by_default() -> bool {
    true
}
