// src/server/handlers/tags.rs
//! Tag catalog endpoints

use crate::db::models::Tag;
use crate::error::Error;
use crate::permissions::Action;
use crate::server::extract::with_db;
use crate::server::{ApiError, Auth, ServerState};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TagRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub slug: Option<String>,
}

/// GET /api/tags/
pub async fn list_tags(
    State(state): State<Arc<RwLock<ServerState>>>,
) -> Result<Json<Vec<Tag>>, ApiError> {
    let tags = with_db(&state, |conn| Tag::list_all(conn)).await?;
    Ok(Json(tags))
}

/// GET /api/tags/:id/
pub async fn get_tag(
    State(state): State<Arc<RwLock<ServerState>>>,
    Path(id): Path<i64>,
) -> Result<Json<Tag>, ApiError> {
    let tag = with_db(&state, move |conn| {
        Tag::find_by_id(conn, id)?.ok_or_else(|| Error::NotFound(format!("tag {id}")))
    })
    .await?;
    Ok(Json(tag))
}

/// POST /api/tags/
pub async fn create_tag(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    payload: Result<Json<TagRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    actor.require(Action::EditCatalog)?;
    let Json(request) = payload?;

    let mut tag = Tag::new(
        request.name.unwrap_or_default().trim().to_string(),
        request.color.unwrap_or_default().trim().to_string(),
        request.slug.unwrap_or_default().trim().to_string(),
    );
    let tag = with_db(&state, move |conn| {
        tag.insert(conn)?;
        Ok(tag)
    })
    .await?;

    info!("Created tag {}", tag.slug);
    Ok((StatusCode::CREATED, Json(tag)))
}

/// PATCH /api/tags/:id/
pub async fn update_tag(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    Path(id): Path<i64>,
    payload: Result<Json<TagRequest>, JsonRejection>,
) -> Result<Json<Tag>, ApiError> {
    actor.require(Action::EditCatalog)?;
    let Json(request) = payload?;

    let tag = with_db(&state, move |conn| {
        let mut tag =
            Tag::find_by_id(conn, id)?.ok_or_else(|| Error::NotFound(format!("tag {id}")))?;
        if let Some(name) = request.name {
            tag.name = name.trim().to_string();
        }
        if let Some(color) = request.color {
            tag.color = color.trim().to_string();
        }
        if let Some(slug) = request.slug {
            tag.slug = slug.trim().to_string();
        }
        tag.update(conn)?;
        Ok(tag)
    })
    .await?;

    info!("Updated tag {}", id);
    Ok(Json(tag))
}

/// DELETE /api/tags/:id/
pub async fn delete_tag(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    actor.require(Action::EditCatalog)?;

    let deleted = with_db(&state, move |conn| Tag::delete(conn, id)).await?;
    if !deleted {
        return Err(Error::NotFound(format!("tag {id}")).into());
    }

    info!("Deleted tag {}", id);
    Ok(StatusCode::NO_CONTENT)
}
