//! HVAC dashboard CLI - Database and operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! hvac-cli migrate
//!
//! # Insert demo data into empty tables
//! hvac-cli seed
//!
//! # Create a user
//! hvac-cli user create -u dispatch -p 'furnace-filter-42' -r technician
//!
//! # Project annual savings
//! hvac-cli roi --truck-roll-cost 300 --energy-waste 1500
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run embedded migrations against `DATABASE_URL`
//! - `seed` - Idempotent demo data seed
//! - `user create` - Create a user with a hashed password
//! - `roi` - Print the ROI projection

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use hvac_dash_core::UserRole;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "hvac-cli")]
#[command(author, version, about = "HVAC dashboard CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert demo data into empty tables
    Seed,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Print the ROI projection
    Roi {
        /// Cost of one truck roll
        #[arg(long)]
        truck_roll_cost: Option<i64>,

        /// Annual energy waste per site
        #[arg(long)]
        energy_waste: Option<i64>,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Unique username
        #[arg(short, long)]
        username: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,

        /// Role (`admin`, `technician`, `viewer`)
        #[arg(short, long, default_value = "admin")]
        role: UserRole,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                password,
                role,
            } => commands::user::create(&username, &password, role).await?,
        },
        Commands::Roi {
            truck_roll_cost,
            energy_waste,
        } => commands::roi::run(truck_roll_cost, energy_waste)?,
    }
    Ok(())
}
