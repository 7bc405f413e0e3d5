//! Appointments service.

use async_trait::async_trait;
use mockall::automock;
use vetshop::{
    ids::{AppointmentId, PetId},
    records::appointments::{Appointment, AppointmentInvoiceData},
};

use crate::api::{ApiClient, ApiError};

#[derive(Debug, Clone)]
pub struct HttpAppointmentsService {
    client: ApiClient,
}

impl HttpAppointmentsService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AppointmentsService for HttpAppointmentsService {
    #[tracing::instrument(name = "appointments.service.list_for_pet", skip(self), err)]
    async fn list_for_pet(&self, pet: PetId) -> Result<Vec<Appointment>, ApiError> {
        self.client.get(&format!("/appointments/pet/{pet}")).await
    }

    #[tracing::instrument(name = "appointments.service.get_appointment", skip(self), err)]
    async fn get_appointment(&self, appointment: AppointmentId) -> Result<Appointment, ApiError> {
        self.client
            .get(&format!("/appointments/{appointment}"))
            .await
    }

    #[tracing::instrument(name = "appointments.service.invoice_data", skip(self), err)]
    async fn invoice_data(
        &self,
        appointment: AppointmentId,
    ) -> Result<AppointmentInvoiceData, ApiError> {
        self.client
            .get(&format!("/appointments/{appointment}/invoice-data"))
            .await
    }

    #[tracing::instrument(name = "appointments.service.mark_invoiced", skip(self), err)]
    async fn mark_invoiced(&self, appointment: AppointmentId) -> Result<(), ApiError> {
        self.client
            .patch_empty(&format!("/appointments/{appointment}/invoiced"))
            .await
    }
}

#[automock]
#[async_trait]
pub trait AppointmentsService: Send + Sync {
    /// Retrieves every appointment of a pet.
    async fn list_for_pet(&self, pet: PetId) -> Result<Vec<Appointment>, ApiError>;

    /// Retrieve a single appointment.
    async fn get_appointment(&self, appointment: AppointmentId) -> Result<Appointment, ApiError>;

    /// Retrieve the invoice projection of an appointment.
    async fn invoice_data(
        &self,
        appointment: AppointmentId,
    ) -> Result<AppointmentInvoiceData, ApiError>;

    /// Flags an appointment as invoiced.
    async fn mark_invoiced(&self, appointment: AppointmentId) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;
    use testresult::TestResult;
    use vetshop::records::appointments::AppointmentStatus;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use crate::test::api_client;

    use super::*;

    #[tokio::test]
    async fn list_for_pet_decodes_appointments() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/appointments/pet/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": 15,
                    "petId": 9,
                    "clientId": 3,
                    "serviceId": 1,
                    "serviceName": "Consulta general",
                    "servicePrice": 50000,
                    "scheduledFor": "2024-05-02T09:30:00",
                    "status": "COMPLETADA",
                    "invoiced": false
                },
                { "id": 16, "petId": 9, "status": "REPROGRAMADA" }
            ])))
            .mount(&server)
            .await;

        let service = HttpAppointmentsService::new(api_client(&server)?);
        let appointments = service.list_for_pet(PetId::new(9)).await?;

        assert_eq!(appointments.len(), 2);

        let first = appointments.first().ok_or("no appointments")?;

        assert!(first.is_billable());
        assert_eq!(first.service_price, Some(dec!(50000)));
        assert_eq!(
            appointments.get(1).map(|record| record.status),
            Some(AppointmentStatus::Other)
        );

        Ok(())
    }

    #[tokio::test]
    async fn invoice_data_reads_projection() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/appointments/15/invoice-data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "appointmentId": 15,
                "serviceId": 1,
                "serviceName": "Consulta general",
                "servicePrice": 50000,
                "petId": 9,
                "petName": "Luna",
                "clientId": 3,
                "clientName": "Ana Ruiz"
            })))
            .mount(&server)
            .await;

        let service = HttpAppointmentsService::new(api_client(&server)?);
        let data = service.invoice_data(AppointmentId::new(15)).await?;

        assert_eq!(data.line_label(), "Consulta general - Mascota: Luna");

        Ok(())
    }

    #[tokio::test]
    async fn mark_invoiced_patches_the_appointment() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/appointments/15/invoiced"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let service = HttpAppointmentsService::new(api_client(&server)?);

        service.mark_invoiced(AppointmentId::new(15)).await?;

        Ok(())
    }
}
