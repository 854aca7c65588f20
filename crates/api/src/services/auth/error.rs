//! Authentication error types.

use thiserror::Error;

use minishop_core::PrincipalKind;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password was empty.
    #[error("username and password are required")]
    MissingFields,

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] minishop_core::EmailError),

    /// Username already taken within the namespace.
    #[error("username already exists")]
    DuplicateUsername,

    /// Email already taken within the namespace.
    #[error("email already exists")]
    DuplicateEmail,

    /// No account with this username.
    #[error("{} not found", .0)]
    NotFound(PrincipalKind),

    /// Password did not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
