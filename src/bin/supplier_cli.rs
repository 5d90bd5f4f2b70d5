// Operator CLI: runs single supplier calls with credentials from the environment
use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hotel_supplier_client::{HotelSupplier, SupplierClient, SupplierError};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Query the hotel supplier API", long_about = None)]
#[command(name = "supplier-cli")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Autocomplete regions by name
    Regions {
        query: String,
        #[arg(long, default_value = "en")]
        language: String,
    },
    /// Static details of one hotel
    Hotel {
        id: String,
        #[arg(long, default_value = "en")]
        language: String,
    },
    /// Re-check whether a rate can still be booked
    Availability { rate_id: String },
    /// Show a booking by partner order id
    Booking { id: String },
    /// Cancel a booking by partner order id
    Cancel { id: String },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("cannot render result")?;
    println!("{}", rendered);
    Ok(())
}

async fn run(client: &SupplierClient, command: Commands) -> anyhow::Result<Result<(), SupplierError>> {
    let outcome = match command {
        Commands::Regions { query, language } => match client.search_regions(&query, &language).await {
            Ok(regions) => Ok(print_json(&regions)?),
            Err(e) => Err(e),
        },
        Commands::Hotel { id, language } => match client.get_hotel_details(&id, &language).await {
            Ok(details) => Ok(print_json(&details)?),
            Err(e) => Err(e),
        },
        Commands::Availability { rate_id } => match client.check_availability(&rate_id).await {
            Ok(result) => Ok(print_json(&result)?),
            Err(e) => Err(e),
        },
        Commands::Booking { id } => match client.get_booking(&id).await {
            Ok(record) => Ok(print_json(&record)?),
            Err(e) => Err(e),
        },
        Commands::Cancel { id } => match client.cancel_booking(&id).await {
            Ok(confirmation) => Ok(print_json(&confirmation)?),
            Err(e) => Err(e),
        },
    };
    Ok(outcome)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_logging();
    let cli = Cli::parse();

    let client = SupplierClient::from_env().context("invalid supplier configuration")?;
    if !client.is_ready() {
        eprintln!("supplier client is not configured: set SUPPLIER_API_KEY and SUPPLIER_KEY_ID");
        return Ok(ExitCode::from(3));
    }

    match run(&client, cli.command).await? {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(error) => {
            tracing::error!(kind = ?error.kind(), status = error.status_code(), %error, "supplier call failed");
            eprintln!("{}", error.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
