// src/server/mod.rs
//! Cookbook HTTP API
//!
//! JSON over HTTP for the recipe store:
//! - Accounts, token login and author subscriptions
//! - Tag and ingredient catalog (staff writes)
//! - Recipes with composition checks, favorites and the shopping cart
//! - Plain-text shopping list download
//! - Staff-only counters

mod config;
mod error;
mod extract;
mod handlers;
pub mod metrics;
mod routes;

pub use config::CookbookConfig;
pub use error::ApiError;
pub use extract::Auth;
pub use metrics::{MetricsSnapshot, ServerMetrics};
pub use routes::create_router;

use crate::auth::DEFAULT_HASH_ITERATIONS;
use crate::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use anyhow::{Context, Result};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,
    /// Path to the cookbook database
    pub db_path: PathBuf,
    /// CORS allowed origins (empty = any origin)
    pub cors_allowed_origins: Vec<String>,
    /// Page size when the request gives no `limit`
    pub default_page_size: u32,
    /// Upper bound for `limit`
    pub max_page_size: u32,
    /// Iterations for newly hashed passwords
    pub hash_iterations: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080)),
            db_path: PathBuf::from("/var/lib/cookbook/cookbook.db"),
            cors_allowed_origins: Vec::new(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            hash_iterations: DEFAULT_HASH_ITERATIONS,
        }
    }
}

/// Shared server state
pub struct ServerState {
    pub config: ServerConfig,
    /// Metrics collector
    pub metrics: Arc<ServerMetrics>,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(ServerMetrics::new()),
        }
    }
}

/// Start the cookbook server
pub async fn run_server(config: ServerConfig) -> Result<()> {
    tracing::info!("Starting cookbook server on {}", config.bind_addr);
    tracing::info!("Database: {:?}", config.db_path);
    tracing::info!(
        "Page size: {} (max {})",
        config.default_page_size,
        config.max_page_size
    );
    if !config.cors_allowed_origins.is_empty() {
        tracing::info!("CORS origins: {}", config.cors_allowed_origins.join(", "));
    }

    crate::db::init(&config.db_path)
        .with_context(|| format!("Failed to initialize database {}", config.db_path.display()))?;

    let state = Arc::new(RwLock::new(ServerState::new(config.clone())));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("Cookbook is ready to serve");

    axum::serve(listener, app).await?;
    Ok(())
}
