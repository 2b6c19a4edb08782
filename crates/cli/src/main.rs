//! Courtside CLI - database migrations and development tools.
//!
//! # Usage
//!
//! ```bash
//! # Run dashboard database migrations
//! cs-cli migrate
//!
//! # Mint a bearer token for local development
//! cs-cli token -u user_2abc --ttl-hours 8
//!
//! # Create a store owned by a user
//! cs-cli store create -u user_2abc -n "Courtside Boston"
//!
//! # Record demo orders for a store's products
//! cs-cli seed-orders -s <store-id> -c 24
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `token` - Issue a principal token signed with `IDENTITY_SIGNING_SECRET`
//! - `store create` - Bootstrap a store
//! - `seed-orders` - Seed demo orders for the overview page

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cs-cli")]
#[command(author, version, about = "Courtside CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Issue a bearer token for a user
    Token {
        /// Identity-provider user id
        #[arg(short, long)]
        user: String,

        /// Token lifetime in hours
        #[arg(long, default_value_t = 24)]
        ttl_hours: u64,
    },
    /// Manage stores
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
    /// Record demo orders against a store's products
    SeedOrders {
        /// Store id
        #[arg(short, long)]
        store: String,

        /// Number of orders to create
        #[arg(short, long, default_value_t = 24)]
        count: usize,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Create a store owned by a user
    Create {
        /// Identity-provider user id of the owner
        #[arg(short, long)]
        user: String,

        /// Store display name
        #[arg(short, long)]
        name: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Token { user, ttl_hours } => commands::token::issue(&user, ttl_hours)?,
        Commands::Store { action } => match action {
            StoreAction::Create { user, name } => {
                commands::store::create(&user, &name).await?;
            }
        },
        Commands::SeedOrders { store, count } => {
            commands::seed::orders(&store, count).await?;
        }
    }
    Ok(())
}
