//! Vaccinations service.

use async_trait::async_trait;
use mockall::automock;
use vetshop::{
    ids::{PetId, VaccinationId},
    records::vaccinations::{
        NewVaccination, Vaccination, VaccinationInvoiceData, VaccinationUpdate,
    },
};

use crate::api::{ApiClient, ApiError};

#[derive(Debug, Clone)]
pub struct HttpVaccinationsService {
    client: ApiClient,
}

impl HttpVaccinationsService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VaccinationsService for HttpVaccinationsService {
    #[tracing::instrument(name = "vaccinations.service.list_for_pet", skip(self), err)]
    async fn list_for_pet(&self, pet: PetId) -> Result<Vec<Vaccination>, ApiError> {
        self.client.get(&format!("/vaccinations/pet/{pet}")).await
    }

    #[tracing::instrument(name = "vaccinations.service.get_vaccination", skip(self), err)]
    async fn get_vaccination(&self, vaccination: VaccinationId) -> Result<Vaccination, ApiError> {
        self.client
            .get(&format!("/vaccinations/{vaccination}"))
            .await
    }

    #[tracing::instrument(name = "vaccinations.service.invoice_data", skip(self), err)]
    async fn invoice_data(
        &self,
        vaccination: VaccinationId,
    ) -> Result<VaccinationInvoiceData, ApiError> {
        self.client
            .get(&format!("/vaccinations/{vaccination}/invoice-data"))
            .await
    }

    #[tracing::instrument(name = "vaccinations.service.mark_invoiced", skip(self), err)]
    async fn mark_invoiced(&self, vaccination: VaccinationId) -> Result<(), ApiError> {
        self.client
            .patch_empty(&format!("/vaccinations/{vaccination}/invoiced"))
            .await
    }

    #[tracing::instrument(
        name = "vaccinations.service.create_vaccination",
        skip(self, vaccination),
        fields(
            pet_id = %vaccination.pet_id,
            dose_number = vaccination.dose_number
        ),
        err
    )]
    async fn create_vaccination(
        &self,
        vaccination: NewVaccination,
    ) -> Result<Vaccination, ApiError> {
        self.client.post("/vaccinations", &vaccination).await
    }

    #[tracing::instrument(
        name = "vaccinations.service.update_vaccination",
        skip(self, update),
        err
    )]
    async fn update_vaccination(
        &self,
        vaccination: VaccinationId,
        update: VaccinationUpdate,
    ) -> Result<Vaccination, ApiError> {
        self.client
            .put(&format!("/vaccinations/{vaccination}"), &update)
            .await
    }
}

#[automock]
#[async_trait]
pub trait VaccinationsService: Send + Sync {
    /// Retrieves every vaccination of a pet.
    async fn list_for_pet(&self, pet: PetId) -> Result<Vec<Vaccination>, ApiError>;

    /// Retrieve a single vaccination.
    async fn get_vaccination(&self, vaccination: VaccinationId) -> Result<Vaccination, ApiError>;

    /// Retrieve the invoice projection of a vaccination.
    async fn invoice_data(
        &self,
        vaccination: VaccinationId,
    ) -> Result<VaccinationInvoiceData, ApiError>;

    /// Flags a vaccination as invoiced.
    async fn mark_invoiced(&self, vaccination: VaccinationId) -> Result<(), ApiError>;

    /// Records a new dose.
    async fn create_vaccination(
        &self,
        vaccination: NewVaccination,
    ) -> Result<Vaccination, ApiError>;

    /// Replaces a vaccination record.
    async fn update_vaccination(
        &self,
        vaccination: VaccinationId,
        update: VaccinationUpdate,
    ) -> Result<Vaccination, ApiError>;
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use serde_json::{Value, json};
    use testresult::TestResult;
    use vetshop::ids::ProductId;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, method, path},
    };

    use crate::test::api_client;

    use super::*;

    fn record(id: u64, dose: u32, completed: bool) -> Value {
        json!({
            "id": id,
            "petId": 9,
            "vaccineName": "Rabia",
            "doseNumber": dose,
            "applicationDate": "2024-01-10",
            "productId": 5,
            "isCompleted": completed
        })
    }

    #[tokio::test]
    async fn create_vaccination_posts_camel_case_body() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/vaccinations"))
            .and(body_partial_json(json!({
                "petId": 9,
                "vaccineName": "Rabia",
                "doseNumber": 1,
                "applicationDate": "2024-01-10",
                "productId": 5,
                "isCompleted": false
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(record(30, 1, false)))
            .expect(1)
            .mount(&server)
            .await;

        let service = HttpVaccinationsService::new(api_client(&server)?);

        let created = service
            .create_vaccination(NewVaccination {
                pet_id: PetId::new(9),
                vaccine_name: "Rabia".to_owned(),
                dose_number: 1,
                application_date: date(2024, 1, 10),
                next_dose_date: None,
                product_id: Some(ProductId::new(5)),
                employee_id: None,
                observations: None,
                is_completed: false,
            })
            .await?;

        assert_eq!(created.id, VaccinationId::new(30));

        Ok(())
    }

    #[tokio::test]
    async fn update_vaccination_puts_the_record() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/vaccinations/30"))
            .and(body_partial_json(json!({ "isCompleted": true })))
            .respond_with(ResponseTemplate::new(200).set_body_json(record(30, 1, true)))
            .expect(1)
            .mount(&server)
            .await;

        let service = HttpVaccinationsService::new(api_client(&server)?);

        let existing: Vaccination = serde_json::from_value(record(30, 1, false))?;
        let update = VaccinationUpdate {
            is_completed: true,
            ..VaccinationUpdate::from(&existing)
        };

        let updated = service
            .update_vaccination(existing.id, update)
            .await?;

        assert!(updated.is_completed);

        Ok(())
    }

    #[tokio::test]
    async fn list_for_pet_surfaces_rejections() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/vaccinations/pet/9"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let service = HttpVaccinationsService::new(api_client(&server)?);
        let result = service.list_for_pet(PetId::new(9)).await;

        assert!(matches!(
            result,
            Err(ApiError::Rejected { status: 503, .. })
        ));

        Ok(())
    }
}
