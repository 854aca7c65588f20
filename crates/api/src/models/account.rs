//! Account domain types (customers and admins).

use chrono::{DateTime, Utc};

use minishop_core::{AccountId, Email, PrincipalKind};

/// A customer or admin account (domain type).
///
/// The password hash is not part of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Which namespace the account lives in.
    pub kind: PrincipalKind,
    /// ID, unique within its kind.
    pub id: AccountId,
    pub username: String,
    pub email: Option<Email>,
    pub created_at: DateTime<Utc>,
}

/// An account with its stored password hash, as read for login checks.
#[derive(Debug, Clone)]
pub struct StoredCredential {
    pub account: Account,
    pub password_hash: String,
}

/// Fields for a new account; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: Option<Email>,
    pub password_hash: String,
}
