//! CLI subcommands.

pub mod admin;
pub mod customers;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use minishop_api::config::{ConfigError, get_database_url};
use minishop_api::db::{self, RepositoryError};
use minishop_api::services::AuthError;

/// Environment variable holding the database connection string.
const DATABASE_URL_VAR: &str = "MINISHOP_DATABASE_URL";

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Missing or invalid environment.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection or query error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Account operation failed.
    #[error("Account error: {0}")]
    Auth(#[from] AuthError),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Seed file could not be read.
    #[error("Could not read seed file: {0}")]
    Io(#[from] std::io::Error),

    /// Seed file is not valid YAML for the seed format.
    #[error("Invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Connect to the database named by the environment.
async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url: SecretString = get_database_url(DATABASE_URL_VAR)?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&database_url).await?)
}
