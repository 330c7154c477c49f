// src/server/handlers/subscriptions.rs
//! Following authors

use crate::db::models::{Recipe, Subscription, User};
use crate::error::Result;
use crate::filters::{parse_query, query_value};
use crate::pagination::Page;
use crate::permissions::Action;
use crate::server::extract::with_db;
use crate::server::handlers::page_request;
use crate::server::handlers::recipes::ShortRecipe;
use crate::server::handlers::users::{UserResponse, load_user, user_response};
use crate::server::{ApiError, Auth, ServerState};
use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// A followed author with a preview of their recipes
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub author: UserResponse,
    pub recipes: Vec<ShortRecipe>,
    pub recipes_count: u64,
}

fn subscription_response(
    conn: &Connection,
    viewer: i64,
    author: User,
    recipes_limit: Option<i64>,
) -> Result<SubscriptionResponse> {
    let author = user_response(conn, Some(viewer), author)?;
    let recipes = Recipe::list_by_author(conn, author.id, recipes_limit)?
        .into_iter()
        .map(ShortRecipe::from)
        .collect();

    Ok(SubscriptionResponse {
        recipes_count: Recipe::count_by_author(conn, author.id)?,
        author,
        recipes,
    })
}

fn recipes_limit(query: &[(String, String)]) -> Result<Option<i64>> {
    Ok(query_value::<u32>(query, "recipes_limit")?.map(i64::from))
}

/// GET /api/users/subscriptions/
pub async fn list_subscriptions(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    RawQuery(query): RawQuery,
) -> std::result::Result<Json<Page<SubscriptionResponse>>, ApiError> {
    let user_id = actor.require_user()?;
    let query = parse_query(query.as_deref());
    let request = page_request(&state, &query).await?;
    let limit = recipes_limit(&query)?;

    let (count, authors) = with_db(&state, move |conn| {
        let count = Subscription::count_for_user(conn, user_id)?;
        let authors = Subscription::list_for_user(conn, user_id, request.limit(), request.offset())?
            .into_iter()
            .map(|author| subscription_response(conn, user_id, author, limit))
            .collect::<Result<Vec<_>>>()?;
        Ok((count, authors))
    })
    .await?;

    Ok(Json(Page::new(
        authors,
        count,
        request,
        "/api/users/subscriptions/",
        &query,
    )))
}

/// POST /api/users/:id/subscribe/
pub async fn subscribe(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    Path(author_id): Path<i64>,
    RawQuery(query): RawQuery,
) -> std::result::Result<(StatusCode, Json<SubscriptionResponse>), ApiError> {
    actor.require(Action::Contribute)?;
    let user_id = actor.require_user()?;
    let limit = recipes_limit(&parse_query(query.as_deref()))?;

    let response = with_db(&state, move |conn| {
        Subscription::subscribe(conn, user_id, author_id)?;
        let author = load_user(conn, author_id)?;
        subscription_response(conn, user_id, author, limit)
    })
    .await?;

    info!("User {} subscribed to {}", user_id, author_id);
    Ok((StatusCode::CREATED, Json(response)))
}

/// DELETE /api/users/:id/subscribe/
pub async fn unsubscribe(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    Path(author_id): Path<i64>,
) -> std::result::Result<StatusCode, ApiError> {
    actor.require(Action::Contribute)?;
    let user_id = actor.require_user()?;

    with_db(&state, move |conn| {
        load_user(conn, author_id)?;
        Subscription::unsubscribe(conn, user_id, author_id)
    })
    .await?;

    info!("User {} unsubscribed from {}", user_id, author_id);
    Ok(StatusCode::NO_CONTENT)
}
