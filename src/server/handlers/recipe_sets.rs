// src/server/handlers/recipe_sets.rs
//! Favorites and shopping cart membership

use crate::db::models::RecipeSet;
use crate::permissions::{Action, Actor};
use crate::server::extract::with_db;
use crate::server::handlers::recipes::{ShortRecipe, load_recipe};
use crate::server::{ApiError, Auth, ServerState};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

async fn add(
    state: Arc<RwLock<ServerState>>,
    actor: Actor,
    set: RecipeSet,
    recipe_id: i64,
) -> Result<(StatusCode, Json<ShortRecipe>), ApiError> {
    actor.require(Action::Contribute)?;
    let user_id = actor.require_user()?;

    let recipe = with_db(&state, move |conn| {
        let recipe = load_recipe(conn, recipe_id)?;
        set.add(conn, user_id, recipe_id)?;
        Ok(recipe)
    })
    .await?;

    info!("User {} added recipe {} to {}", user_id, recipe_id, set.as_str());
    Ok((StatusCode::CREATED, Json(ShortRecipe::from(recipe))))
}

async fn remove(
    state: Arc<RwLock<ServerState>>,
    actor: Actor,
    set: RecipeSet,
    recipe_id: i64,
) -> Result<StatusCode, ApiError> {
    actor.require(Action::Contribute)?;
    let user_id = actor.require_user()?;

    with_db(&state, move |conn| {
        load_recipe(conn, recipe_id)?;
        set.remove(conn, user_id, recipe_id)
    })
    .await?;

    info!("User {} removed recipe {} from {}", user_id, recipe_id, set.as_str());
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/recipes/:id/favorite/
pub async fn add_favorite(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<ShortRecipe>), ApiError> {
    add(state, actor, RecipeSet::Favorites, id).await
}

/// DELETE /api/recipes/:id/favorite/
pub async fn remove_favorite(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    remove(state, actor, RecipeSet::Favorites, id).await
}

/// POST /api/recipes/:id/shopping_cart/
pub async fn add_to_cart(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<ShortRecipe>), ApiError> {
    add(state, actor, RecipeSet::ShoppingCart, id).await
}

/// DELETE /api/recipes/:id/shopping_cart/
pub async fn remove_from_cart(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    remove(state, actor, RecipeSet::ShoppingCart, id).await
}
