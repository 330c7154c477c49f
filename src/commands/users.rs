// src/commands/users.rs
//! Account and shopping list commands

use anyhow::{Context, Result};
use cookbook::auth::DEFAULT_HASH_ITERATIONS;
use cookbook::db::models::{Registration, User, shopping_list};
use tracing::info;

/// Create an account, optionally with staff rights
#[allow(clippy::too_many_arguments)]
pub fn cmd_create_user(
    db_path: &str,
    email: &str,
    username: &str,
    first_name: &str,
    last_name: &str,
    password: &str,
    staff: bool,
) -> Result<()> {
    let conn = cookbook::db::open(db_path)?;

    let registration = Registration {
        email: email.to_string(),
        username: username.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        password: password.to_string(),
    };
    let user = registration
        .register(&conn, DEFAULT_HASH_ITERATIONS)
        .with_context(|| format!("Failed to create user {}", username))?;
    let id = user.id.context("Stored user has no id")?;

    if staff {
        User::set_staff(&conn, id, true)?;
    }

    info!("Created user {} ({}), staff: {}", user.username, id, staff);
    println!("Created user {} <{}> with id {}", user.username, user.email, id);
    Ok(())
}

/// Print the aggregated shopping list of the user with `email`
pub fn cmd_shopping_list(db_path: &str, email: &str) -> Result<()> {
    let conn = cookbook::db::open(db_path)?;

    let user = User::find_by_email(&conn, email)?
        .with_context(|| format!("No user with email {}", email))?;
    let id = user.id.context("Stored user has no id")?;

    let list = shopping_list(&conn, id)?;
    info!("Shopping list for {} has {} lines", email, list.len());
    println!("{}", list.render_text());
    Ok(())
}
