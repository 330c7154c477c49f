// src/server/handlers/ingredients.rs
//! Ingredient catalog endpoints

use crate::db::models::Ingredient;
use crate::error::Error;
use crate::filters::parse_query;
use crate::permissions::Action;
use crate::server::extract::with_db;
use crate::server::{ApiError, Auth, ServerState};
use axum::{
    Json,
    extract::{Path, RawQuery, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IngredientRequest {
    pub name: Option<String>,
    pub measurement_unit: Option<String>,
}

/// GET /api/ingredients/?name=<prefix>
pub async fn list_ingredients(
    State(state): State<Arc<RwLock<ServerState>>>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<Ingredient>>, ApiError> {
    let prefix = parse_query(query.as_deref())
        .into_iter()
        .rev()
        .find(|(key, _)| key == "name")
        .map(|(_, value)| value);

    let ingredients = with_db(&state, move |conn| match prefix {
        Some(prefix) => Ingredient::search(conn, &prefix),
        None => Ingredient::list_all(conn),
    })
    .await?;
    Ok(Json(ingredients))
}

/// GET /api/ingredients/:id/
pub async fn get_ingredient(
    State(state): State<Arc<RwLock<ServerState>>>,
    Path(id): Path<i64>,
) -> Result<Json<Ingredient>, ApiError> {
    let ingredient = with_db(&state, move |conn| {
        Ingredient::find_by_id(conn, id)?
            .ok_or_else(|| Error::NotFound(format!("ingredient {id}")))
    })
    .await?;
    Ok(Json(ingredient))
}

/// POST /api/ingredients/
pub async fn create_ingredient(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    payload: Result<Json<IngredientRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Ingredient>), ApiError> {
    actor.require(Action::EditCatalog)?;
    let Json(request) = payload?;

    let mut ingredient = Ingredient::new(
        request.name.unwrap_or_default().trim().to_string(),
        request.measurement_unit.unwrap_or_default().trim().to_string(),
    );
    let ingredient = with_db(&state, move |conn| {
        ingredient.insert(conn)?;
        Ok(ingredient)
    })
    .await?;

    info!(
        "Created ingredient {} ({})",
        ingredient.name, ingredient.measurement_unit
    );
    Ok((StatusCode::CREATED, Json(ingredient)))
}

/// PATCH /api/ingredients/:id/
pub async fn update_ingredient(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    Path(id): Path<i64>,
    payload: Result<Json<IngredientRequest>, JsonRejection>,
) -> Result<Json<Ingredient>, ApiError> {
    actor.require(Action::EditCatalog)?;
    let Json(request) = payload?;

    let ingredient = with_db(&state, move |conn| {
        let mut ingredient = Ingredient::find_by_id(conn, id)?
            .ok_or_else(|| Error::NotFound(format!("ingredient {id}")))?;
        if let Some(name) = request.name {
            ingredient.name = name.trim().to_string();
        }
        if let Some(unit) = request.measurement_unit {
            ingredient.measurement_unit = unit.trim().to_string();
        }
        ingredient.update(conn)?;
        Ok(ingredient)
    })
    .await?;

    info!("Updated ingredient {}", id);
    Ok(Json(ingredient))
}

/// DELETE /api/ingredients/:id/
pub async fn delete_ingredient(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    actor.require(Action::EditCatalog)?;

    let deleted = with_db(&state, move |conn| Ingredient::delete(conn, id)).await?;
    if !deleted {
        return Err(Error::NotFound(format!("ingredient {id}")).into());
    }

    info!("Deleted ingredient {}", id);
    Ok(StatusCode::NO_CONTENT)
}
