//! Minishop CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply schema and session-table migrations
//! minishop migrate
//!
//! # Create an admin account
//! minishop admin create -u admin -p 'correct horse battery' -e admin@example.com
//!
//! # List customer accounts
//! minishop customers list
//!
//! # Seed sample accounts and products (built-in set, or a YAML file)
//! minishop seed
//! minishop seed --file seed.yaml
//! ```
//!
//! # Environment Variables
//!
//! - `MINISHOP_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "minishop")]
#[command(author, version, about = "Minishop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations (shop schema and session table)
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Inspect customer accounts
    Customers {
        #[command(subcommand)]
        action: CustomersAction,
    },
    /// Seed sample accounts and products
    Seed {
        /// YAML file with `customers`, `admins` and `products` lists
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password (stored as an Argon2 hash)
        #[arg(short, long)]
        password: String,

        /// Optional email address
        #[arg(short, long)]
        email: Option<String>,
    },
}

#[derive(Subcommand)]
enum CustomersAction {
    /// List customer accounts
    List,
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

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                username,
                password,
                email,
            } => {
                commands::admin::create(&username, &password, email.as_deref()).await?;
            }
        },
        Commands::Customers { action } => match action {
            CustomersAction::List => commands::customers::list().await?,
        },
        Commands::Seed { file } => commands::seed::run(file.as_deref()).await?,
    }
    Ok(())
}
