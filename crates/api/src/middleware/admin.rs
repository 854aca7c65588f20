//! Shared-secret gate for admin-only endpoints.
//!
//! The gate holds one process-wide token fixed at start-up. It is unrelated
//! to admin accounts: logging in as an admin does not grant access here, and
//! the token grants no identity.

use axum::{extract::FromRequestParts, http::request::Parts};
use secrecy::{ExposeSecret, SecretString};

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the admin token.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Compares presented tokens against the configured admin token.
#[derive(Clone)]
pub struct AdminGate {
    token: SecretString,
}

impl AdminGate {
    /// Create a gate for `token`.
    #[must_use]
    pub const fn new(token: SecretString) -> Self {
        Self { token }
    }

    /// Whether `presented` exactly matches the configured token.
    #[must_use]
    pub fn authorize(&self, presented: Option<&str>) -> bool {
        let expected = self.token.expose_secret();
        presented.is_some_and(|p| {
            !expected.is_empty() && constant_time_eq(p.as_bytes(), expected.as_bytes())
        })
    }
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Extractor that requires a valid `X-Admin-Token` header.
///
/// # Example
///
/// ```rust,ignore
/// async fn delete_product(_admin: RequireAdminToken, Path(id): Path<ProductId>) -> Result<...> {
///     // only reached with the right token
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAdminToken;

impl FromRequestParts<AppState> for RequireAdminToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());

        if state.gate().authorize(presented) {
            Ok(Self)
        } else {
            tracing::warn!(path = %parts.uri.path(), "admin token rejected");
            Err(AppError::Unauthorized("Admin token required.".to_string()))
        }
    }
}
