//! Seed the database with sample accounts and products.
//!
//! Without `--file`, a built-in set is used: one customer (`testuser`), one
//! admin (`testadmin`) and three products. A YAML file replaces that set:
//!
//! ```yaml
//! customers:
//!   - { username: testuser, password: password123, email: testuser@example.com }
//! admins:
//!   - { username: testadmin, password: admin123 }
//! products:
//!   - { name: Laptop, price: 999.99, description: High-performance laptop, stock: 5 }
//! ```
//!
//! Accounts that already exist are skipped. Products are only created when
//! the catalog is empty, so running the command twice is harmless.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use minishop_api::db::{CatalogRepository, Repositories};
use minishop_api::models::NewProduct;
use minishop_api::services::{AuthError, AuthService};
use minishop_core::{Price, PrincipalKind};

use super::{CommandError, connect};

/// Contents of a seed file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub customers: Vec<SeedAccount>,
    pub admins: Vec<SeedAccount>,
    pub products: Vec<NewProduct>,
}

/// One account to create.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedAccount {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl SeedAccount {
    fn new(username: &str, password: &str, email: &str) -> Self {
        Self {
            username: username.to_owned(),
            password: password.to_owned(),
            email: Some(email.to_owned()),
        }
    }
}

impl SeedData {
    /// The built-in sample data.
    #[must_use]
    pub fn builtin() -> Self {
        let product = |name: &str, cents: u32, description: &str, stock: u32| NewProduct {
            name: name.to_owned(),
            price: Price::from_cents(cents),
            description: description.to_owned(),
            image_url: String::new(),
            stock,
        };

        Self {
            customers: vec![SeedAccount::new(
                "testuser",
                "password123",
                "testuser@example.com",
            )],
            admins: vec![SeedAccount::new("testadmin", "admin123", "admin@example.com")],
            products: vec![
                product("Laptop", 99_999, "High-performance laptop", 5),
                product("Mouse", 2_999, "Wireless mouse", 20),
                product("Keyboard", 7_999, "Mechanical keyboard", 15),
            ],
        }
    }

    /// Parse seed data from YAML.
    ///
    /// # Errors
    ///
    /// Returns `serde_yaml::Error` if the document does not match the format.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

/// Run the seed command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or a database
/// operation fails.
pub async fn run(file: Option<&Path>) -> Result<(), CommandError> {
    // Read and validate the file before connecting to the database
    let data = match file {
        Some(path) => {
            info!(path = %path.display(), "Loading seed data from file");
            SeedData::from_yaml(&tokio::fs::read_to_string(path).await?)?
        }
        None => SeedData::builtin(),
    };

    let pool = connect().await?;
    let repos = Repositories::postgres(pool);
    let auth = AuthService::new(repos.credentials.clone());

    for (kind, accounts) in [
        (PrincipalKind::Customer, &data.customers),
        (PrincipalKind::Admin, &data.admins),
    ] {
        for account in accounts {
            seed_account(&auth, kind, account).await?;
        }
    }

    let created = seed_products(repos.catalog.as_ref(), data.products).await?;

    info!("Seeding complete!");
    info!("  Products created: {created}");
    Ok(())
}

async fn seed_account(
    auth: &AuthService,
    kind: PrincipalKind,
    account: &SeedAccount,
) -> Result<(), CommandError> {
    match auth
        .register(
            kind,
            &account.username,
            &account.password,
            account.email.as_deref(),
        )
        .await
    {
        Ok(created) => {
            info!(%kind, username = %created.username, id = %created.id, "Account created");
            Ok(())
        }
        Err(AuthError::DuplicateUsername | AuthError::DuplicateEmail) => {
            warn!(%kind, username = %account.username, "Account already exists, skipping");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Create `products` if the catalog is empty; returns how many were created.
async fn seed_products(
    catalog: &dyn CatalogRepository,
    products: Vec<NewProduct>,
) -> Result<usize, CommandError> {
    if !catalog.list().await?.is_empty() {
        info!("Catalog is not empty, skipping products");
        return Ok(0);
    }

    let count = products.len();
    for product in products {
        let created = catalog.create(product).await?;
        info!(id = %created.id, name = %created.name, "Product created");
    }
    Ok(count)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use minishop_api::db::MemoryDatabase;

    use super::*;

    #[test]
    fn test_builtin_data() {
        let data = SeedData::builtin();
        assert_eq!(data.customers[0].username, "testuser");
        assert_eq!(data.admins[0].username, "testadmin");
        let names: Vec<_> = data.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Laptop", "Mouse", "Keyboard"]);
        assert_eq!(data.products[0].price.to_string(), "999.99");
    }

    #[test]
    fn test_yaml_fills_product_defaults() {
        let yaml = "admins:\n  - { username: root, password: hunter22 }\n\
                    products:\n  - { name: Mug, price: 12.5 }\n";
        let data = SeedData::from_yaml(yaml).unwrap();
        assert!(data.customers.is_empty());
        assert_eq!(data.admins[0].email, None);
        assert_eq!(data.products[0].name, "Mug");
        assert_eq!(data.products[0].stock, 0);
        assert_eq!(data.products[0].description, "");
    }

    #[test]
    fn test_yaml_rejects_unknown_shape() {
        assert!(SeedData::from_yaml("products: 3").is_err());
    }

    #[tokio::test]
    async fn test_products_only_seeded_into_empty_catalog() {
        let db = MemoryDatabase::default();
        let products = SeedData::builtin().products;

        assert_eq!(seed_products(&db, products.clone()).await.unwrap(), 3);
        assert_eq!(seed_products(&db, products).await.unwrap(), 0);
        assert_eq!(db.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_existing_accounts_are_skipped() {
        let auth = AuthService::new(Repositories::in_memory().credentials);
        let account = SeedAccount::new("testuser", "password123", "testuser@example.com");

        seed_account(&auth, PrincipalKind::Customer, &account).await.unwrap();
        seed_account(&auth, PrincipalKind::Customer, &account).await.unwrap();
        assert_eq!(auth.list(PrincipalKind::Customer).await.unwrap().len(), 1);
    }
}
