//! Invoices service.

use async_trait::async_trait;
use mockall::automock;
use vetshop::{ids::InvoiceId, invoice::NewInvoice, records::invoices::Invoice};

use crate::api::{ApiClient, ApiError};

#[derive(Debug, Clone)]
pub struct HttpInvoicesService {
    client: ApiClient,
}

impl HttpInvoicesService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InvoicesService for HttpInvoicesService {
    #[tracing::instrument(
        name = "invoices.service.create_invoice",
        skip(self, invoice),
        fields(
            client_id = %invoice.client_id,
            detail_count = invoice.details.len()
        ),
        err
    )]
    async fn create_invoice(&self, invoice: NewInvoice) -> Result<Invoice, ApiError> {
        self.client.post("/invoices", &invoice).await
    }

    #[tracing::instrument(name = "invoices.service.cancel_invoice", skip(self), err)]
    async fn cancel_invoice(&self, invoice: InvoiceId) -> Result<Invoice, ApiError> {
        self.client
            .patch(&format!("/invoices/{invoice}/cancel"))
            .await
    }

    #[tracing::instrument(name = "invoices.service.delete_invoice", skip(self), err)]
    async fn delete_invoice(&self, invoice: InvoiceId) -> Result<(), ApiError> {
        self.client.delete(&format!("/invoices/{invoice}")).await
    }
}

#[automock]
#[async_trait]
pub trait InvoicesService: Send + Sync {
    /// Creates an invoice.
    async fn create_invoice(&self, invoice: NewInvoice) -> Result<Invoice, ApiError>;

    /// Voids an invoice, keeping it on record.
    async fn cancel_invoice(&self, invoice: InvoiceId) -> Result<Invoice, ApiError>;

    /// Deletes an invoice.
    async fn delete_invoice(&self, invoice: InvoiceId) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;
    use vetshop::records::invoices::InvoiceStatus;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use crate::test::api_client;

    use super::*;

    #[tokio::test]
    async fn cancel_invoice_returns_voided_invoice() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/invoices/4/cancel"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 4,
                "number": "F-0004",
                "clientId": 3,
                "subtotal": 50000,
                "total": 59500,
                "status": "ANULADA"
            })))
            .mount(&server)
            .await;

        let service = HttpInvoicesService::new(api_client(&server)?);
        let invoice = service.cancel_invoice(InvoiceId::new(4)).await?;

        assert_eq!(invoice.status, InvoiceStatus::Cancelled);
        assert_eq!(invoice.number.as_deref(), Some("F-0004"));

        Ok(())
    }

    #[tokio::test]
    async fn delete_invoice_sends_delete() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/invoices/4"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let service = HttpInvoicesService::new(api_client(&server)?);

        service.delete_invoice(InvoiceId::new(4)).await?;

        Ok(())
    }
}
