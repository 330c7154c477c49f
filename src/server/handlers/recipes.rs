// src/server/handlers/recipes.rs
//! Recipe endpoints and the shopping list download

use crate::cart::SHOPPING_LIST_FILENAME;
use crate::compose::{RecipeDraft, RecipePatch};
use crate::db::models::{Recipe, RecipeIngredient, RecipeSet, Tag, shopping_list};
use crate::error::{Error, Result};
use crate::filters::{RecipeFilter, parse_query};
use crate::pagination::Page;
use crate::permissions::Action;
use crate::server::extract::with_db;
use crate::server::handlers::page_request;
use crate::server::handlers::users::{UserResponse, load_user, user_response};
use crate::server::{ApiError, Auth, ServerState};
use axum::{
    Json,
    extract::{Path, RawQuery, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Full recipe as returned by list, detail, create and update
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub tags: Vec<Tag>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredient>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i64,
    pub pub_date: String,
}

/// Compact recipe used in favorites, cart and subscription listings
#[derive(Debug, Serialize)]
pub struct ShortRecipe {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i64,
}

impl From<Recipe> for ShortRecipe {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
        }
    }
}

pub(crate) fn load_recipe(conn: &Connection, id: i64) -> Result<Recipe> {
    Recipe::find_by_id(conn, id)?.ok_or_else(|| Error::NotFound(format!("recipe {id}")))
}

fn recipe_response(conn: &Connection, viewer: Option<i64>, recipe: Recipe) -> Result<RecipeResponse> {
    let author = user_response(conn, viewer, load_user(conn, recipe.author_id)?)?;
    let (is_favorited, is_in_shopping_cart) = match viewer {
        Some(user_id) => (
            RecipeSet::Favorites.contains(conn, user_id, recipe.id)?,
            RecipeSet::ShoppingCart.contains(conn, user_id, recipe.id)?,
        ),
        None => (false, false),
    };

    Ok(RecipeResponse {
        id: recipe.id,
        tags: Tag::for_recipe(conn, recipe.id)?,
        author,
        ingredients: Recipe::ingredients(conn, recipe.id)?,
        is_favorited,
        is_in_shopping_cart,
        name: recipe.name,
        image: recipe.image,
        text: recipe.text,
        cooking_time: recipe.cooking_time,
        pub_date: recipe.pub_date,
    })
}

/// GET /api/recipes/
pub async fn list_recipes(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    RawQuery(query): RawQuery,
) -> std::result::Result<Json<Page<RecipeResponse>>, ApiError> {
    let viewer = actor.user_id();
    let query = parse_query(query.as_deref());
    let filter = RecipeFilter::from_query(&query)?;
    let request = page_request(&state, &query).await?;
    debug!("Listing recipes with {:?}", filter);

    let (count, recipes) = with_db(&state, move |conn| {
        let (count, recipes) =
            Recipe::query(conn, &filter, viewer, request.limit(), request.offset())?;
        let recipes = recipes
            .into_iter()
            .map(|recipe| recipe_response(conn, viewer, recipe))
            .collect::<Result<Vec<_>>>()?;
        Ok((count, recipes))
    })
    .await?;

    Ok(Json(Page::new(recipes, count, request, "/api/recipes/", &query)))
}

/// GET /api/recipes/:id/
pub async fn get_recipe(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    Path(id): Path<i64>,
) -> std::result::Result<Json<RecipeResponse>, ApiError> {
    let viewer = actor.user_id();
    let recipe = with_db(&state, move |conn| {
        let recipe = load_recipe(conn, id)?;
        recipe_response(conn, viewer, recipe)
    })
    .await?;
    Ok(Json(recipe))
}

/// POST /api/recipes/
///
/// The draft is composed against the catalog and stored in one
/// transaction; any composition problem rejects the whole payload.
pub async fn create_recipe(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    payload: std::result::Result<Json<RecipeDraft>, JsonRejection>,
) -> std::result::Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    actor.require(Action::Contribute)?;
    let author_id = actor.require_user()?;
    let Json(draft) = payload?;
    let metrics = { state.read().await.metrics.clone() };

    let recipe = with_db(&state, move |conn| {
        let recipe = crate::db::transaction(conn, |tx| {
            let catalog: &Connection = tx;
            let composed = match draft.compose(catalog) {
                Ok(composed) => composed,
                Err(err) => {
                    metrics.record_rejection();
                    return Err(err);
                }
            };
            Recipe::create(tx, author_id, &composed)
        })?;
        metrics.record_composed();
        recipe_response(conn, Some(author_id), recipe)
    })
    .await?;

    info!("User {} created recipe {} ({})", author_id, recipe.id, recipe.name);
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// PATCH /api/recipes/:id/
pub async fn update_recipe(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    Path(id): Path<i64>,
    payload: std::result::Result<Json<RecipePatch>, JsonRejection>,
) -> std::result::Result<Json<RecipeResponse>, ApiError> {
    actor.require(Action::Contribute)?;
    let Json(patch) = payload?;
    let metrics = { state.read().await.metrics.clone() };
    let viewer = actor.user_id();

    let recipe = with_db(&state, move |conn| {
        let recipe = crate::db::transaction(conn, |tx| {
            let current = load_recipe(tx, id)?;
            actor.require(Action::EditRecipe {
                author_id: current.author_id,
            })?;

            let catalog: &Connection = tx;
            let composed = match patch.compose(catalog) {
                Ok(composed) => composed,
                Err(err) => {
                    metrics.record_rejection();
                    return Err(err);
                }
            };
            if composed.is_empty() {
                return Ok(current);
            }
            Recipe::apply_patch(tx, id, &composed)
        })?;
        recipe_response(conn, viewer, recipe)
    })
    .await?;

    info!("Updated recipe {}", id);
    Ok(Json(recipe))
}

/// DELETE /api/recipes/:id/
pub async fn delete_recipe(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
    Path(id): Path<i64>,
) -> std::result::Result<StatusCode, ApiError> {
    actor.require(Action::Contribute)?;

    with_db(&state, move |conn| {
        let recipe = load_recipe(conn, id)?;
        actor.require(Action::EditRecipe {
            author_id: recipe.author_id,
        })?;
        Recipe::delete(conn, id)
    })
    .await?;

    info!("Deleted recipe {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/recipes/download_shopping_cart/
///
/// Every recipe in the caller's cart folded into one numbered plain-text
/// list, served as an attachment.
pub async fn download_shopping_cart(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
) -> std::result::Result<Response, ApiError> {
    let user_id = actor.require_user()?;
    let metrics = { state.read().await.metrics.clone() };

    let list = with_db(&state, move |conn| shopping_list(conn, user_id)).await?;
    metrics.record_shopping_list();
    info!(
        "Serving shopping list with {} lines to user {}",
        list.len(),
        user_id
    );

    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", SHOPPING_LIST_FILENAME),
        ),
    ];
    Ok((StatusCode::OK, headers, list.render_text()).into_response())
}
