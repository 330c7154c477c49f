// src/server/handlers/auth.rs
//! Token login and logout

use crate::db::models::{AuthToken, User};
use crate::error::Error;
use crate::server::extract::with_db;
use crate::server::{ApiError, Auth, ServerState};
use crate::validation::NON_FIELD_ERRORS;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

/// POST /api/auth/token/login/
pub async fn login(
    State(state): State<Arc<RwLock<ServerState>>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(request) = payload?;

    let token = with_db(&state, move |conn| {
        let user = User::find_by_email(conn, request.email.trim())?
            .filter(|user| crate::auth::verify_password(&request.password, &user.password_hash));
        let Some(user_id) = user.and_then(|user| user.id) else {
            return Err(Error::invalid(
                NON_FIELD_ERRORS,
                "Unable to log in with provided credentials.",
            ));
        };
        AuthToken::get_or_create(conn, user_id)
    })
    .await?;

    info!("Issued token for user {}", token.user_id);
    Ok(Json(TokenResponse {
        auth_token: token.key,
    }))
}

/// POST /api/auth/token/logout/
pub async fn logout(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
) -> Result<StatusCode, ApiError> {
    let user_id = actor.require_user()?;
    with_db(&state, move |conn| AuthToken::delete_for_user(conn, user_id)).await?;

    info!("Revoked token for user {}", user_id);
    Ok(StatusCode::NO_CONTENT)
}
