//! Cart Config

use std::path::PathBuf;

use clap::Args;

/// Cart persistence settings.
#[derive(Clone, Debug, Args)]
pub struct CartConfig {
    /// File the cart is persisted to between sessions
    #[arg(long, env = "VETSHOP_CART_PATH", default_value = ".vetshop/cart.json")]
    pub cart_path: PathBuf,
}
