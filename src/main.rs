// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { db_path }) => commands::cmd_init(&db_path),
        Some(Commands::Serve {
            config,
            bind,
            db_path,
        }) => commands::cmd_serve(config.as_deref(), bind.as_deref(), db_path.as_deref()),
        Some(Commands::CreateUser {
            email,
            username,
            first_name,
            last_name,
            password,
            staff,
            db_path,
        }) => commands::cmd_create_user(
            &db_path,
            &email,
            &username,
            &first_name,
            &last_name,
            &password,
            staff,
        ),
        Some(Commands::ShoppingList { email, db_path }) => {
            commands::cmd_shopping_list(&db_path, &email)
        }
        None => {
            // No command provided, show help
            println!("Cookbook v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'cookbook --help' for usage information");
            Ok(())
        }
    }
}
