//! Customer account commands.

use minishop_api::db::Repositories;
use minishop_api::services::AuthService;
use minishop_core::PrincipalKind;

use super::{CommandError, connect};

/// Print all customer accounts, oldest first.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn list() -> Result<(), CommandError> {
    let pool = connect().await?;
    let auth = AuthService::new(Repositories::postgres(pool).credentials);

    let customers = auth.list(PrincipalKind::Customer).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{:>6}  {:<24}  {:<32}  CREATED", "ID", "USERNAME", "EMAIL");
        for customer in &customers {
            println!(
                "{:>6}  {:<24}  {:<32}  {}",
                customer.id,
                customer.username,
                customer.email.as_ref().map_or("-", |e| e.as_str()),
                customer.created_at.format("%Y-%m-%d %H:%M"),
            );
        }
    }

    tracing::info!("{} customer(s)", customers.len());
    Ok(())
}
