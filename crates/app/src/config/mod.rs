//! Console configuration module

use clap::Args;

pub use api::ApiConfig;
pub use cart::CartConfig;
pub use logging::{LogFormat, LoggingConfig};

mod api;
mod cart;
mod logging;

/// Vetshop console configuration, read from CLI arguments and the environment.
#[derive(Debug, Args)]
pub struct ConsoleConfig {
    /// Backend API settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Cart persistence settings.
    #[command(flatten)]
    pub cart: CartConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

/// Load a `.env` file from the working directory if present.
pub fn load_dotenv() {
    _ = dotenvy::dotenv();
}
