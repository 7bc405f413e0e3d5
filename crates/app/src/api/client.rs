//! HTTP client for the clinic backend REST API.

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{api::ApiError, config::ApiConfig};

/// Header naming the tenant every request acts for.
pub const TENANT_HEADER: &str = "X-Tenant-ID";

/// Shared HTTP client. Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    tenant: Option<String>,
    http: Client,
}

impl ApiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] for a base URL that is not absolute http(s), or
    /// [`ApiError::Network`] when the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()?;

        Self::with_client(config, http)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] for a base URL that is not absolute http(s).
    pub fn with_client(config: &ApiConfig, http: Client) -> Result<Self, ApiError> {
        let base_url = config.api_url.trim_end_matches('/');

        let valid = Url::parse(base_url)
            .is_ok_and(|url| matches!(url.scheme(), "http" | "https"));

        if !valid {
            return Err(ApiError::InvalidBaseUrl(config.api_url.clone()));
        }

        Ok(Self {
            base_url: base_url.to_owned(),
            token: config.api_token.clone().filter(|token| !token.is_empty()),
            tenant: config.tenant_id.clone().filter(|tenant| !tenant.is_empty()),
            http,
        })
    }

    /// Base URL requests are resolved against, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = Self::send(self.request(Method::GET, path)).await?;

        Ok(response.json().await?)
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = Self::send(self.request(Method::POST, path).json(body)).await?;

        Ok(response.json().await?)
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = Self::send(self.request(Method::PUT, path).json(body)).await?;

        Ok(response.json().await?)
    }

    pub(crate) async fn patch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = Self::send(self.request(Method::PATCH, path)).await?;

        Ok(response.json().await?)
    }

    /// PATCH without reading the response body.
    pub(crate) async fn patch_empty(&self, path: &str) -> Result<(), ApiError> {
        Self::send(self.request(Method::PATCH, path)).await?;

        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        Self::send(self.request(Method::DELETE, path)).await?;

        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self
            .http
            .request(method, format!("{}{path}", self.base_url));

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        if let Some(tenant) = &self.tenant {
            request = request.header(TENANT_HEADER, tenant);
        }

        request
    }

    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        debug!(url = %response.url(), status = status.as_u16(), "backend responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            return Err(ApiError::rejected(status.as_u16(), &body));
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use testresult::TestResult;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    use super::*;

    fn config(url: &str) -> ApiConfig {
        ApiConfig {
            api_url: url.to_owned(),
            api_token: Some("secret".to_owned()),
            tenant_id: Some("clinica-norte".to_owned()),
            api_timeout_seconds: 5,
        }
    }

    #[test]
    fn rejects_relative_or_non_http_base_urls() {
        for url in ["", "/api", "localhost:8080", "ftp://example.com"] {
            assert!(
                matches!(ApiClient::new(&config(url)), Err(ApiError::InvalidBaseUrl(_))),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn trims_trailing_slash() -> TestResult {
        let client = ApiClient::new(&config("http://localhost:8080/api/"))?;

        assert_eq!(client.base_url(), "http://localhost:8080/api");

        Ok(())
    }

    #[tokio::test]
    async fn sends_token_and_tenant_headers() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pets"))
            .and(header("Authorization", "Bearer secret"))
            .and(header(TENANT_HEADER, "clinica-norte"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&config(&server.uri()))?;
        let pets: Vec<Value> = client.get("/pets").await?;

        assert!(pets.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn surfaces_backend_rejection_message() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/invoices/4"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(json!({ "message": "La factura ya fue pagada" })),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(&config(&server.uri()))?;
        let result = client.delete("/invoices/4").await;

        match result {
            Err(ApiError::Rejected { status, message }) => {
                assert_eq!(status, 422);
                assert_eq!(message, "La factura ya fue pagada");
            }
            other => return Err(format!("expected rejection, got {other:?}").into()),
        }

        Ok(())
    }
}
