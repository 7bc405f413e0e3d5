//! Backend API Config

use std::time::Duration;

use clap::Args;

/// Backend API settings.
#[derive(Clone, Debug, Args)]
pub struct ApiConfig {
    /// Backend base URL, e.g. `http://localhost:8080/api`
    #[arg(long, env = "VETSHOP_API_URL", default_value = "http://localhost:8080/api")]
    pub api_url: String,

    /// Bearer token sent with every request
    #[arg(long, env = "VETSHOP_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Tenant the console acts for, sent as `X-Tenant-ID`
    #[arg(long, env = "VETSHOP_TENANT_ID")]
    pub tenant_id: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "VETSHOP_API_TIMEOUT_SECONDS", default_value_t = 30_u64)]
    pub api_timeout_seconds: u64,
}

impl ApiConfig {
    /// Request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_seconds)
    }
}
