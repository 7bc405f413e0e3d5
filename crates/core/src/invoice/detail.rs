//! Invoice Details

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    cart::{CartLine, LineItem, SourceRef},
    pricing::{Percent, line_total},
    records::{appointments::AppointmentInvoiceData, vaccinations::VaccinationInvoiceData},
};

/// One line of an invoice.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetail {
    #[serde(flatten)]
    item: LineItem,
    name: String,
    quantity: u32,
    unit_price: Decimal,
    discount: Percent,
    subtotal: Decimal,
    #[serde(skip)]
    source: Option<SourceRef>,
}

impl InvoiceDetail {
    /// Create a detail, deriving its subtotal.
    pub fn new(
        item: LineItem,
        name: String,
        quantity: u32,
        unit_price: Decimal,
        discount: Percent,
    ) -> Self {
        Self {
            item,
            name,
            quantity,
            unit_price,
            discount,
            subtotal: line_total(quantity, unit_price, discount),
            source: None,
        }
    }

    fn sourced(mut self, source: Option<SourceRef>) -> Self {
        self.source = source;
        self
    }

    /// What the detail sells.
    pub fn item(&self) -> LineItem {
        self.item
    }

    /// Label printed on the invoice.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Units billed.
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

    /// `quantity × unit_price × (1 − discount / 100)`.
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// Clinic record the detail bills, if any.
    pub fn source(&self) -> Option<SourceRef> {
        self.source
    }
}

impl From<&CartLine> for InvoiceDetail {
    fn from(line: &CartLine) -> Self {
        Self::new(
            line.item(),
            line.name().to_owned(),
            line.quantity(),
            line.unit_price(),
            line.discount(),
        )
        .sourced(line.source())
    }
}

impl From<&AppointmentInvoiceData> for InvoiceDetail {
    fn from(data: &AppointmentInvoiceData) -> Self {
        Self::new(
            LineItem::service(data.service_id),
            data.line_label(),
            1,
            data.service_price,
            Percent::ZERO,
        )
        .sourced(Some(SourceRef::Appointment(data.appointment_id)))
    }
}

impl From<&VaccinationInvoiceData> for InvoiceDetail {
    fn from(data: &VaccinationInvoiceData) -> Self {
        Self::new(
            data.line_item(),
            data.line_label(),
            1,
            data.unit_price(),
            Percent::ZERO,
        )
        .sourced(Some(SourceRef::Vaccination(data.vaccination_id)))
    }
}

/// A line typed in on the invoice form.
#[derive(Clone, Debug, PartialEq)]
pub struct ManualDetail {
    /// Product or service sold.
    pub item: LineItem,

    /// Label printed on the invoice.
    pub name: String,

    /// Units billed.
    pub quantity: u32,

    /// Price of one unit before discount.
    pub unit_price: Decimal,

    /// Per-line discount in percent points.
    pub discount: Decimal,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::ids::{ClientId, PetId, ProductId, VaccinationId};

    use super::*;

    #[test]
    fn serializes_item_tag_and_subtotal() -> TestResult {
        let detail = InvoiceDetail::new(
            LineItem::product(ProductId::new(3)),
            "Antipulgas".to_owned(),
            2,
            dec!(10000),
            Percent::new(dec!(50))?,
        );

        let value = serde_json::to_value(&detail)?;

        assert_eq!(value.get("type").and_then(|v| v.as_str()), Some("PRODUCT"));
        assert_eq!(value.get("productId").and_then(|v| v.as_u64()), Some(3));
        assert_eq!(value.get("subtotal").and_then(|v| v.as_f64()), Some(10000.0));
        assert!(value.get("source").is_none());

        Ok(())
    }

    #[test]
    fn vaccination_detail_keeps_its_source() {
        let data = VaccinationInvoiceData {
            vaccination_id: VaccinationId::new(8),
            vaccine_name: "Rabia".to_owned(),
            dose_number: 2,
            product_id: None,
            product_name: None,
            product_price: None,
            pet_id: PetId::new(1),
            pet_name: "Luna".to_owned(),
            client_id: ClientId::new(3),
            client_name: "Ana".to_owned(),
        };

        let detail = InvoiceDetail::from(&data);

        assert_eq!(
            detail.source(),
            Some(SourceRef::Vaccination(VaccinationId::new(8)))
        );
        assert_eq!(detail.subtotal(), Decimal::ZERO);
        assert_eq!(detail.name(), "Rabia (Dosis 2) - Mascota: Luna");
    }
}
