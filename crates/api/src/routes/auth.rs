//! Customer signup/login and admin login.
//!
//! These endpoints only check credentials; no login state is kept in the
//! session and the admin token gate is unaffected by an admin login.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use minishop_core::{AccountId, PrincipalKind};

use super::extract::JsonBody;
use crate::error::Result;
use crate::state::AppState;

/// Body of the signup and login endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Customer signup/login response.
#[derive(Debug, Serialize)]
pub struct UserAuthResponse {
    pub success: bool,
    pub message: &'static str,
    pub user_id: AccountId,
}

/// Admin login response.
#[derive(Debug, Serialize)]
pub struct AdminAuthResponse {
    pub success: bool,
    pub message: &'static str,
    pub admin_id: AccountId,
}

/// `POST /api/user/signup`
#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CredentialsRequest>,
) -> Result<Json<UserAuthResponse>> {
    let account = state
        .auth()
        .register(
            PrincipalKind::Customer,
            &body.username,
            body.password.trim(),
            Some(&body.email),
        )
        .await?;

    Ok(Json(UserAuthResponse {
        success: true,
        message: "User registered successfully.",
        user_id: account.id,
    }))
}

/// `POST /api/user/login`
#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn user_login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CredentialsRequest>,
) -> Result<Json<UserAuthResponse>> {
    let account = state
        .auth()
        .verify(PrincipalKind::Customer, &body.username, body.password.trim())
        .await?;

    Ok(Json(UserAuthResponse {
        success: true,
        message: "Login successful.",
        user_id: account.id,
    }))
}

/// `POST /api/admin/login`
#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn admin_login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CredentialsRequest>,
) -> Result<Json<AdminAuthResponse>> {
    let account = state
        .auth()
        .verify(PrincipalKind::Admin, &body.username, body.password.trim())
        .await?;

    Ok(Json(AdminAuthResponse {
        success: true,
        message: "Admin login successful.",
        admin_id: account.id,
    }))
}
