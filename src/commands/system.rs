// src/commands/system.rs
//! Database setup and the server entry point

use anyhow::{Context, Result};
use cookbook::server::{CookbookConfig, run_server};
use std::path::{Path, PathBuf};
use tracing::info;

/// Initialize the cookbook database
pub fn cmd_init(db_path: &str) -> Result<()> {
    info!("Initializing cookbook database at: {}", db_path);
    cookbook::db::init(db_path)?;
    println!("Database initialized successfully at: {}", db_path);
    Ok(())
}

/// Load configuration, apply command-line overrides and run the server
pub fn cmd_serve(config: Option<&str>, bind: Option<&str>, db_path: Option<&str>) -> Result<()> {
    let file_config = match config {
        Some(path) => CookbookConfig::load(Path::new(path))?,
        None => CookbookConfig::default(),
    };

    let mut server_config = file_config.to_server_config()?;
    if let Some(bind) = bind {
        server_config.bind_addr = bind
            .parse()
            .with_context(|| format!("Invalid bind address: {}", bind))?;
    }
    if let Some(db_path) = db_path {
        server_config.db_path = PathBuf::from(db_path);
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    rt.block_on(run_server(server_config))
}
