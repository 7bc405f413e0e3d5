//! Test Helpers

use wiremock::MockServer;

use crate::{
    api::{ApiClient, ApiError},
    config::ApiConfig,
};

/// Client pointed at a mock backend.
pub(crate) fn api_client(server: &MockServer) -> Result<ApiClient, ApiError> {
    ApiClient::new(&ApiConfig {
        api_url: server.uri(),
        api_token: Some("test-token".to_owned()),
        tenant_id: Some("clinica-test".to_owned()),
        api_timeout_seconds: 5,
    })
}
