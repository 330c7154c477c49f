// src/cli.rs
//! CLI definitions for the cookbook server
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};

pub const DEFAULT_DB_PATH: &str = "/var/lib/cookbook/cookbook.db";

#[derive(Parser)]
#[command(name = "cookbook")]
#[command(version)]
#[command(about = "Recipe sharing backend with shopping list aggregation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new cookbook database
    Init {
        /// Path to the database file
        #[arg(short, long, default_value = DEFAULT_DB_PATH)]
        db_path: String,
    },

    /// Run the HTTP API server
    Serve {
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<String>,

        /// Address to bind (overrides the config file)
        #[arg(short, long)]
        bind: Option<String>,

        /// Path to the database file (overrides the config file)
        #[arg(short, long)]
        db_path: Option<String>,
    },

    /// Create an account from the command line
    CreateUser {
        /// Email address (used to log in)
        #[arg(long)]
        email: String,

        /// Unique username
        #[arg(long)]
        username: String,

        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,

        /// Initial password
        #[arg(long)]
        password: String,

        /// Grant staff rights (catalog editing, stats)
        #[arg(long)]
        staff: bool,

        /// Path to the database file
        #[arg(short, long, default_value = DEFAULT_DB_PATH)]
        db_path: String,
    },

    /// Print a user's aggregated shopping list
    ShoppingList {
        /// Email of the cart owner
        #[arg(long)]
        email: String,

        /// Path to the database file
        #[arg(short, long, default_value = DEFAULT_DB_PATH)]
        db_path: String,
    },
}
