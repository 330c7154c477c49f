// src/db/models/mod.rs

//! Data models for cookbook database entities
//!
//! Each struct maps to a table and carries the queries that read and write
//! it. Methods take a plain `&Connection`, so they work the same inside and
//! outside [`crate::db::transaction`].

mod ingredient;
mod recipe;
mod recipe_set;
mod shopping_cart;
mod subscription;
mod tag;
mod token;
mod user;

pub use ingredient::Ingredient;
pub use recipe::{Recipe, RecipeIngredient};
pub use recipe_set::RecipeSet;
pub use shopping_cart::{cart_entries, shopping_list};
pub use subscription::Subscription;
pub use tag::Tag;
pub use token::AuthToken;
pub use user::{Registration, User};

use rusqlite::ffi;

/// True when `err` is a UNIQUE (or primary key) violation
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}
