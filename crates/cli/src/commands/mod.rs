//! CLI subcommands.

pub mod migrate;
pub mod seed;
pub mod store;
pub mod token;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use courtside_admin::db::{self, RepositoryError};
use courtside_admin::services::IdentityError;

const DEFAULT_MAX_CONNECTIONS: u32 = 2;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Gateway operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Token could not be issued.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// A command-line argument is invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Connect to the dashboard database named by `ADMIN_DATABASE_URL`
/// (or `DATABASE_URL`).
pub async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("ADMIN_DATABASE_URL"))?;

    tracing::info!("Connecting to dashboard database...");
    Ok(db::create_pool(&database_url, DEFAULT_MAX_CONNECTIONS).await?)
}
