// src/server/handlers/users.rs
//! Account endpoints

use crate::auth;
use crate::db::models::{Registration, Subscription, User};
use crate::error::{Error, Result};
use crate::filters::parse_query;
use crate::pagination::Page;
use crate::server::extract::with_db;
use crate::server::handlers::page_request;
use crate::server::{ApiError, Auth, ServerState};
use crate::validation::FieldErrors;
use axum::{
    Json,
    extract::{Path, RawQuery, State, rejection::JsonRejection},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Public view of an account as seen by `viewer`
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

/// Returned from registration
#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SetPasswordRequest {
    pub new_password: String,
    pub current_password: String,
}

pub(crate) fn user_response(conn: &Connection, viewer: Option<i64>, user: User) -> Result<UserResponse> {
    let id = user
        .id
        .ok_or_else(|| Error::NotFound("user without id".to_string()))?;
    let is_subscribed = match viewer {
        Some(viewer) => Subscription::is_subscribed(conn, viewer, id)?,
        None => false,
    };

    Ok(UserResponse {
        email: user.email,
        id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        is_subscribed,
    })
}

pub(crate) fn load_user(conn: &Connection, id: i64) -> Result<User> {
    User::find_by_id(conn, id)?.ok_or_else(|| Error::NotFound(format!("user {id}")))
}

/// POST /api/users/
pub async fn register(
    State(state): State<Arc<RwLock<ServerState>>>,
    payload: std::result::Result<Json<Registration>, JsonRejection>,
) -> std::result::Result<(StatusCode, Json<RegisteredUser>), ApiError> {
    let Json(registration) = payload?;
    let iterations = { state.read().await.config.hash_iterations };

    let user = with_db(&state, move |conn| registration.register(conn, iterations)).await?;
    let id = user
        .id
        .ok_or_else(|| Error::InitError("registered user has no id".to_string()))?;

    info!("Registered user {} ({})", user.username, id);
    Ok((
        StatusCode::CREATED,
        Json(RegisteredUser {
            email: user.email,
            id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }),
    ))
}

/// GET /api/users/
pub async fn list_users(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    RawQuery(query): RawQuery,
) -> std::result::Result<Json<Page<UserResponse>>, ApiError> {
    let viewer = actor.require_user()?;
    let query = parse_query(query.as_deref());
    let request = page_request(&state, &query).await?;

    let (count, users) = with_db(&state, move |conn| {
        let count = User::count(conn)?;
        let users = User::list_page(conn, request.limit(), request.offset())?
            .into_iter()
            .map(|user| user_response(conn, Some(viewer), user))
            .collect::<Result<Vec<_>>>()?;
        Ok((count, users))
    })
    .await?;

    Ok(Json(Page::new(users, count, request, "/api/users/", &query)))
}

/// GET /api/users/me/
pub async fn me(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
) -> std::result::Result<Json<UserResponse>, ApiError> {
    let id = actor.require_user()?;
    let user = with_db(&state, move |conn| {
        let user = load_user(conn, id)?;
        user_response(conn, Some(id), user)
    })
    .await?;
    Ok(Json(user))
}

/// GET /api/users/:id/
pub async fn get_user(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    Path(id): Path<i64>,
) -> std::result::Result<Json<UserResponse>, ApiError> {
    let viewer = actor.user_id();
    let user = with_db(&state, move |conn| {
        let user = load_user(conn, id)?;
        user_response(conn, viewer, user)
    })
    .await?;
    Ok(Json(user))
}

/// POST /api/users/set_password/
pub async fn set_password(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    payload: std::result::Result<Json<SetPasswordRequest>, JsonRejection>,
) -> std::result::Result<StatusCode, ApiError> {
    let id = actor.require_user()?;
    let Json(request) = payload?;
    let iterations = { state.read().await.config.hash_iterations };

    with_db(&state, move |conn| {
        let user = load_user(conn, id)?;

        let mut errors = FieldErrors::new();
        if !auth::verify_password(&request.current_password, &user.password_hash) {
            errors.add("current_password", "Wrong password.");
        }
        auth::check_password(
            &mut errors,
            "new_password",
            &request.new_password,
            &[user.email.as_str(), user.username.as_str()],
        );
        errors.into_result()?;

        User::set_password_hash(conn, id, &auth::hash_password(&request.new_password, iterations))
    })
    .await?;

    info!("User {} changed their password", id);
    Ok(StatusCode::NO_CONTENT)
}
