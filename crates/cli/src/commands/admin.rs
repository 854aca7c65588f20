//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! minishop admin create -u admin -p 'correct horse battery' -e admin@example.com
//! ```
//!
//! Admin accounts are only checked by `POST /api/admin/login`. Admin-only
//! endpoints are guarded by `ADMIN_TOKEN`, not by these accounts.

use minishop_api::db::Repositories;
use minishop_api::services::AuthService;
use minishop_core::{AccountId, PrincipalKind};

use super::{CommandError, connect};

/// Create a new admin account.
///
/// # Errors
///
/// Returns an error if the username or email is taken, the email is
/// malformed, or the database is unreachable.
pub async fn create(
    username: &str,
    password: &str,
    email: Option<&str>,
) -> Result<AccountId, CommandError> {
    let pool = connect().await?;
    let auth = AuthService::new(Repositories::postgres(pool).credentials);

    tracing::info!("Creating admin account: {}", username);
    let account = auth
        .register(PrincipalKind::Admin, username, password, email)
        .await?;

    tracing::info!(
        "Admin account created successfully! ID: {}, Username: {}",
        account.id,
        account.username
    );
    Ok(account.id)
}
