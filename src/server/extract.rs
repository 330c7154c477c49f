// src/server/extract.rs
//! Request plumbing shared by the handlers

use crate::db::models::{AuthToken, User};
use crate::error::Error;
use crate::permissions::Actor;
use crate::server::{ApiError, ServerState};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use rusqlite::Connection;
use std::sync::Arc;
use tokio::sync::RwLock;

const TOKEN_PREFIX: &str = "Token ";

/// The caller, resolved from an `Authorization: Token <key>` header
///
/// A missing header yields [`Actor::Anonymous`]; a malformed header or an
/// unknown key is rejected with 401.
#[derive(Debug, Clone, Copy)]
pub struct Auth(pub Actor);

#[async_trait]
impl FromRequestParts<Arc<RwLock<ServerState>>> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<RwLock<ServerState>>,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Auth(Actor::Anonymous));
        };

        let key = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix(TOKEN_PREFIX))
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Unauthorized("Invalid token header.".to_string()))?
            .to_string();

        let user = with_db(state, move |conn| AuthToken::find_user(conn, &key)).await?;
        match user {
            Some(user) => Ok(Auth(actor_for(&user))),
            None => Err(Error::Unauthorized("Invalid token.".to_string()).into()),
        }
    }
}

pub(crate) fn actor_for(user: &User) -> Actor {
    match user.id {
        Some(id) => Actor::User {
            id,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
        },
        None => Actor::Anonymous,
    }
}

/// Run `f` against a fresh connection on the blocking pool
pub(crate) async fn with_db<T, F>(state: &Arc<RwLock<ServerState>>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut Connection) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db_path = { state.read().await.config.db_path.clone() };

    let result = tokio::task::spawn_blocking(move || {
        let mut conn = crate::db::open(&db_path)?;
        f(&mut conn)
    })
    .await?;

    Ok(result?)
}
