// src/server/routes.rs
//! Axum router configuration for the cookbook API

use crate::server::ServerState;
use crate::server::handlers::{
    admin, auth, ingredients, recipe_sets, recipes, subscriptions, tags, users,
};
use axum::{
    Router,
    extract::{Request, State},
    http::HeaderValue,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Create the main application router
pub fn create_router(state: Arc<RwLock<ServerState>>) -> Router {
    let cors = cors_layer(&state);

    let api_routes = Router::new()
        // Accounts
        .route("/api/users/", get(users::list_users).post(users::register))
        .route("/api/users/me/", get(users::me))
        .route("/api/users/set_password/", post(users::set_password))
        .route(
            "/api/users/subscriptions/",
            get(subscriptions::list_subscriptions),
        )
        .route("/api/users/:id/", get(users::get_user))
        .route(
            "/api/users/:id/subscribe/",
            post(subscriptions::subscribe).delete(subscriptions::unsubscribe),
        )
        // Tokens
        .route("/api/auth/token/login/", post(auth::login))
        .route("/api/auth/token/logout/", post(auth::logout))
        // Catalog
        .route("/api/tags/", get(tags::list_tags).post(tags::create_tag))
        .route(
            "/api/tags/:id/",
            get(tags::get_tag)
                .patch(tags::update_tag)
                .delete(tags::delete_tag),
        )
        .route(
            "/api/ingredients/",
            get(ingredients::list_ingredients).post(ingredients::create_ingredient),
        )
        .route(
            "/api/ingredients/:id/",
            get(ingredients::get_ingredient)
                .patch(ingredients::update_ingredient)
                .delete(ingredients::delete_ingredient),
        )
        // Recipes
        .route(
            "/api/recipes/",
            get(recipes::list_recipes).post(recipes::create_recipe),
        )
        .route(
            "/api/recipes/download_shopping_cart/",
            get(recipes::download_shopping_cart),
        )
        .route(
            "/api/recipes/:id/",
            get(recipes::get_recipe)
                .patch(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .route(
            "/api/recipes/:id/favorite/",
            post(recipe_sets::add_favorite).delete(recipe_sets::remove_favorite),
        )
        .route(
            "/api/recipes/:id/shopping_cart/",
            post(recipe_sets::add_to_cart).delete(recipe_sets::remove_from_cart),
        )
        // Admin endpoints
        .route("/api/admin/stats", get(admin::stats));

    Router::new()
        .route("/health", get(health_check))
        .merge(api_routes)
        .layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(state: &Arc<RwLock<ServerState>>) -> CorsLayer {
    let origins = state
        .try_read()
        .map(|state| state.config.cors_allowed_origins.clone())
        .unwrap_or_default();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn count_requests(
    State(state): State<Arc<RwLock<ServerState>>>,
    request: Request,
    next: Next,
) -> Response {
    state.read().await.metrics.record_request();
    next.run(request).await
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
