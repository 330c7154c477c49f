// src/server/config.rs
//! Configuration file parsing for the cookbook server
//!
//! Supports TOML configuration files with the following sections:
//! - [server] - Bind address, CORS origins
//! - [database] - SQLite database path
//! - [pagination] - Default and maximum page size
//! - [auth] - Password hashing cost

use crate::server::ServerConfig;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize)]
pub struct CookbookConfig {
    /// Server settings
    #[serde(default)]
    pub server: ServerSection,

    /// Database settings
    #[serde(default)]
    pub database: DatabaseSection,

    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationSection,

    /// Authentication settings
    #[serde(default)]
    pub auth: AuthSection,
}

/// Server configuration section
#[derive(Debug, Deserialize)]
pub struct ServerSection {
    /// Public API bind address
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Allowed CORS origins (empty = any)
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

/// Database configuration section
#[derive(Debug, Deserialize)]
pub struct DatabaseSection {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("/var/lib/cookbook/cookbook.db")
}

/// Pagination configuration section
#[derive(Debug, Deserialize)]
pub struct PaginationSection {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for PaginationSection {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_page_size() -> u32 {
    crate::pagination::DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> u32 {
    crate::pagination::MAX_PAGE_SIZE
}

/// Authentication configuration section
#[derive(Debug, Deserialize)]
pub struct AuthSection {
    /// SHA-256 rounds for new password hashes
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            hash_iterations: default_hash_iterations(),
        }
    }
}

fn default_hash_iterations() -> u32 {
    crate::auth::DEFAULT_HASH_ITERATIONS
}

impl CookbookConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: CookbookConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.server
            .bind
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid server.bind address: {}", self.server.bind))?;

        if self.pagination.default_page_size == 0 {
            bail!("pagination.default_page_size must be at least 1");
        }
        if self.pagination.max_page_size < self.pagination.default_page_size {
            bail!(
                "pagination.max_page_size ({}) is below default_page_size ({})",
                self.pagination.max_page_size,
                self.pagination.default_page_size
            );
        }
        if self.auth.hash_iterations == 0 {
            bail!("auth.hash_iterations must be at least 1");
        }

        Ok(())
    }

    /// Convert to the runtime server configuration
    pub fn to_server_config(&self) -> Result<ServerConfig> {
        let bind_addr = self
            .server
            .bind
            .parse()
            .with_context(|| format!("Invalid server.bind address: {}", self.server.bind))?;

        Ok(ServerConfig {
            bind_addr,
            db_path: self.database.path.clone(),
            cors_allowed_origins: self.server.cors_allowed_origins.clone(),
            default_page_size: self.pagination.default_page_size,
            max_page_size: self.pagination.max_page_size,
            hash_iterations: self.auth.hash_iterations,
        })
    }
}
