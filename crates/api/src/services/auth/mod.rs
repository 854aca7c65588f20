//! Authentication service.
//!
//! Username/password registration and verification for two independent
//! principal kinds. Customers and admins never see each other's accounts.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use minishop_core::{Email, PrincipalKind};

use crate::db::{CredentialRepository, RepositoryError};
use crate::models::{Account, NewAccount};

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<dyn CredentialRepository>,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(credentials: Arc<dyn CredentialRepository>) -> Self {
        Self { credentials }
    }

    /// Register a new account.
    ///
    /// Username and email are trimmed; an empty email is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if username or password is empty.
    /// Returns `AuthError::InvalidEmail` if a non-empty email is malformed.
    /// Returns `AuthError::DuplicateUsername` / `AuthError::DuplicateEmail`
    /// if the username or email is already registered for this kind.
    pub async fn register(
        &self,
        kind: PrincipalKind,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<Account, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(Email::parse)
            .transpose()?;

        if self
            .credentials
            .find_by_username(kind, username)
            .await?
            .is_some()
        {
            return Err(AuthError::DuplicateUsername);
        }
        if let Some(email) = &email
            && self.credentials.email_exists(kind, email).await?
        {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = hash_password(password)?;

        let account = self
            .credentials
            .insert(
                kind,
                NewAccount {
                    username: username.to_owned(),
                    email,
                    password_hash,
                },
            )
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(constraint) if constraint.contains("email") => {
                    AuthError::DuplicateEmail
                }
                RepositoryError::Conflict(_) => AuthError::DuplicateUsername,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(kind = %kind, account_id = %account.id, "account registered");
        Ok(account)
    }

    /// Verify a username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if username or password is empty.
    /// Returns `AuthError::NotFound` if no account has this username.
    /// Returns `AuthError::InvalidCredentials` if the password is wrong.
    pub async fn verify(
        &self,
        kind: PrincipalKind,
        username: &str,
        password: &str,
    ) -> Result<Account, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let stored = self
            .credentials
            .find_by_username(kind, username)
            .await?
            .ok_or(AuthError::NotFound(kind))?;

        verify_password(password, &stored.password_hash)?;

        Ok(stored.account)
    }

    /// List accounts of a kind.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the query fails.
    pub async fn list(&self, kind: PrincipalKind) -> Result<Vec<Account>, AuthError> {
        Ok(self.credentials.list(kind).await?)
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::Repositories;

    fn service() -> AuthService {
        AuthService::new(Repositories::in_memory().credentials)
    }

    #[test]
    fn test_hash_is_salted_and_verifiable() {
        let a = hash_password("password123").unwrap();
        let b = hash_password("password123").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
        assert!(verify_password("password123", &a).is_ok());
        assert!(verify_password("wrong", &a).is_err());
    }

    #[tokio::test]
    async fn test_register_then_verify() {
        let auth = service();
        let account = auth
            .register(PrincipalKind::Customer, "  testuser ", "password123", Some(""))
            .await
            .unwrap();
        assert_eq!(account.username, "testuser");
        assert_eq!(account.email, None);

        let verified = auth
            .verify(PrincipalKind::Customer, "testuser", "password123")
            .await
            .unwrap();
        assert_eq!(verified.id, account.id);
    }

    #[tokio::test]
    async fn test_verify_distinguishes_unknown_user_from_bad_password() {
        let auth = service();
        auth.register(PrincipalKind::Customer, "testuser", "password123", None)
            .await
            .unwrap();

        let err = auth
            .verify(PrincipalKind::Customer, "nobody", "password123")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotFound(PrincipalKind::Customer)));

        let err = auth
            .verify(PrincipalKind::Customer, "testuser", "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email() {
        let auth = service();
        auth.register(
            PrincipalKind::Customer,
            "sam",
            "pw",
            Some("sam@example.com"),
        )
        .await
        .unwrap();

        let err = auth
            .register(PrincipalKind::Customer, "sam", "pw", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername));

        let err = auth
            .register(
                PrincipalKind::Customer,
                "alex",
                "pw",
                Some("sam@example.com"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_same_username_across_kinds() {
        let auth = service();
        auth.register(PrincipalKind::Customer, "sam", "pw", None)
            .await
            .unwrap();
        auth.register(PrincipalKind::Admin, "sam", "other", None)
            .await
            .unwrap();

        assert!(auth.verify(PrincipalKind::Admin, "sam", "other").await.is_ok());
        assert!(matches!(
            auth.verify(PrincipalKind::Admin, "sam", "pw").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_missing_fields_and_bad_email() {
        let auth = service();
        assert!(matches!(
            auth.register(PrincipalKind::Customer, " ", "pw", None).await,
            Err(AuthError::MissingFields)
        ));
        assert!(matches!(
            auth.register(PrincipalKind::Customer, "sam", "", None).await,
            Err(AuthError::MissingFields)
        ));
        assert!(matches!(
            auth.register(PrincipalKind::Customer, "sam", "pw", Some("not-an-email"))
                .await,
            Err(AuthError::InvalidEmail(_))
        ));
    }
}
