// src/server/handlers/admin.rs
//! Staff-only server statistics

use crate::permissions::Action;
use crate::server::{ApiError, Auth, MetricsSnapshot, ServerState};
use axum::{Json, extract::State};
use std::sync::Arc;
use tokio::sync::RwLock;

/// GET /api/admin/stats
pub async fn stats(
    State(state): State<Arc<RwLock<ServerState>>>,
    Auth(actor): Auth,
) -> Result<Json<MetricsSnapshot>, ApiError> {
    actor.require(Action::EditCatalog)?;
    let snapshot = state.read().await.metrics.snapshot();
    Ok(Json(snapshot))
}
