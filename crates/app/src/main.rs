//! Vetshop Console CLI

use std::process;

use clap::{Parser, Subcommand};
use vetshop::ids::PetId;
use vetshop_app::{
    config::{self, ConsoleConfig},
    console::Console,
    observability,
};

#[derive(Debug, Parser)]
#[command(name = "vetshop", about = "Vetshop billing console", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConsoleConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the persisted cart
    Cart,

    /// Empty the persisted cart
    ClearCart,

    /// List what a pet can still be billed for
    Eligible {
        /// Pet id
        #[arg(long)]
        pet_id: u64,
    },
}

#[tokio::main]
pub async fn main() {
    config::load_dotenv();

    let cli = Cli::parse();

    if let Err(error) = observability::init_logging(&cli.config.logging) {
        eprintln!("{error}");
    }

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let mut console = Console::init(&cli.config)
        .map_err(|error| format!("failed to start console: {error}"))?;

    match cli.command {
        Commands::Cart => show_cart(&console),
        Commands::ClearCart => {
            console
                .cart_mut()
                .clear()
                .map_err(|error| format!("failed to clear cart: {error}"))?;

            println!("cart cleared");
        }
        Commands::Eligible { pet_id } => {
            let eligible = console.eligible_for_pet(PetId::new(pet_id)).await;

            if eligible.is_empty() {
                println!("nothing to bill for pet {pet_id}");
            }

            for appointment in &eligible.appointments {
                println!(
                    "appointment {}: {}",
                    appointment.id,
                    appointment.service_name.as_deref().unwrap_or("-")
                );
            }

            for vaccination in &eligible.vaccinations {
                println!(
                    "vaccination {}: {} (dose {})",
                    vaccination.id, vaccination.vaccine_name, vaccination.dose_number
                );
            }
        }
    }

    console
        .dispose()
        .map_err(|error| format!("failed to save cart: {error}"))
}

fn show_cart(console: &Console) {
    let cart = console.cart();

    if cart.is_empty() {
        println!("cart is empty");
        return;
    }

    if let Some(client) = cart.client() {
        println!("client: {} ({})", client.name, client.id);
    }

    for line in cart.lines() {
        println!(
            "{}  {} x{} @ {} -{} = {}",
            line.id(),
            line.name(),
            line.quantity(),
            line.unit_price(),
            line.discount(),
            line.line_total()
        );
    }

    println!("items: {}", cart.count());
    println!("total: {}", cart.total());
}
