//! Vaccination Records

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    cart::LineItem,
    ids::{ClientId, EmployeeId, PetId, ProductId, VaccinationId},
};

/// Vaccination Record
///
/// Records for the same pet and vaccine name form a dose chain ordered by `dose_number`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vaccination {
    pub id: VaccinationId,
    pub pet_id: PetId,
    #[serde(default)]
    pub pet_name: Option<String>,
    pub vaccine_name: String,
    pub dose_number: u32,
    pub application_date: Date,
    #[serde(default)]
    pub next_dose_date: Option<Date>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    #[serde(default)]
    pub observations: Option<String>,
    pub is_completed: bool,
    #[serde(default)]
    pub invoiced: bool,
}

impl Vaccination {
    /// Completed and not yet invoiced.
    #[must_use]
    pub fn is_billable(&self) -> bool {
        self.is_completed && !self.invoiced
    }
}

/// Request body for recording a vaccination dose.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVaccination {
    pub pet_id: PetId,
    pub vaccine_name: String,
    pub dose_number: u32,
    pub application_date: Date,
    pub next_dose_date: Option<Date>,
    pub product_id: Option<ProductId>,
    pub employee_id: Option<EmployeeId>,
    pub observations: Option<String>,
    pub is_completed: bool,
}

/// Details of a booster dose recorded from an existing vaccination.
#[derive(Clone, Debug, PartialEq)]
pub struct BoosterDose {
    pub application_date: Date,
    pub next_dose_date: Option<Date>,
    pub employee_id: Option<EmployeeId>,
    pub observations: Option<String>,
}

impl NewVaccination {
    /// The dose following `source` for the same pet, vaccine and product.
    #[must_use]
    pub fn booster_of(source: &Vaccination, dose: BoosterDose) -> Self {
        Self {
            pet_id: source.pet_id,
            vaccine_name: source.vaccine_name.clone(),
            dose_number: source.dose_number.saturating_add(1),
            application_date: dose.application_date,
            next_dose_date: dose.next_dose_date,
            product_id: source.product_id,
            employee_id: dose.employee_id,
            observations: dose.observations,
            is_completed: false,
        }
    }
}

/// Request body replacing a vaccination record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationUpdate {
    pub pet_id: PetId,
    pub vaccine_name: String,
    pub dose_number: u32,
    pub application_date: Date,
    pub next_dose_date: Option<Date>,
    pub product_id: Option<ProductId>,
    pub employee_id: Option<EmployeeId>,
    pub observations: Option<String>,
    pub is_completed: bool,
}

impl From<&Vaccination> for VaccinationUpdate {
    fn from(record: &Vaccination) -> Self {
        Self {
            pet_id: record.pet_id,
            vaccine_name: record.vaccine_name.clone(),
            dose_number: record.dose_number,
            application_date: record.application_date,
            next_dose_date: record.next_dose_date,
            product_id: record.product_id,
            employee_id: record.employee_id,
            observations: record.observations.clone(),
            is_completed: record.is_completed,
        }
    }
}

/// Invoice projection of a vaccination, with pricing computed by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationInvoiceData {
    pub vaccination_id: VaccinationId,
    pub vaccine_name: String,
    pub dose_number: u32,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_price: Option<Decimal>,
    pub pet_id: PetId,
    pub pet_name: String,
    pub client_id: ClientId,
    pub client_name: String,
}

impl VaccinationInvoiceData {
    /// Vaccinations with a product are billed as that product, the rest as an unreferenced
    /// service.
    #[must_use]
    pub fn line_item(&self) -> LineItem {
        match self.product_id {
            Some(product_id) => LineItem::product(product_id),
            None => LineItem::Service { service_id: None },
        }
    }

    /// Label naming the product (or vaccine), dose and pet.
    #[must_use]
    pub fn line_label(&self) -> String {
        let label = self.product_name.as_deref().unwrap_or(&self.vaccine_name);

        format!(
            "{label} (Dosis {}) - Mascota: {}",
            self.dose_number, self.pet_name
        )
    }

    /// Product price, or zero when the backend did not price the vaccination.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.product_price.unwrap_or(Decimal::ZERO)
    }
}
