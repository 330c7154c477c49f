// src/server/handlers/mod.rs
//! HTTP request handlers for the cookbook API

pub mod admin;
pub mod auth;
pub mod ingredients;
pub mod recipe_sets;
pub mod recipes;
pub mod subscriptions;
pub mod tags;
pub mod users;

use crate::filters::query_value;
use crate::pagination::PageRequest;
use crate::server::{ApiError, ServerState};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Read `page` and `limit` from the query, using the configured page sizes
pub(crate) async fn page_request(
    state: &Arc<RwLock<ServerState>>,
    query: &[(String, String)],
) -> Result<PageRequest, ApiError> {
    let (default_limit, max_limit) = {
        let state = state.read().await;
        (state.config.default_page_size, state.config.max_page_size)
    };

    Ok(PageRequest::new(
        query_value(query, "page")?,
        query_value(query, "limit")?,
        default_limit,
        max_limit,
    ))
}
