// src/lib.rs

//! Cookbook - recipe sharing backend
//!
//! Users publish recipes built from a shared catalog of ingredients and
//! tags, follow other authors, keep favorites and fill a shopping cart that
//! folds into a single purchase list.
//!
//! # Architecture
//!
//! - Database-first: all state lives in SQLite
//! - Composition: recipe payloads are checked against the catalog before
//!   anything is stored ([`compose`])
//! - Aggregation: cart contents collapse into one line per ingredient and
//!   unit ([`cart`])
//! - HTTP: an axum JSON API over the same models ([`server`])

pub mod auth;
pub mod cart;
pub mod compose;
pub mod db;
mod error;
pub mod filters;
pub mod pagination;
pub mod permissions;
pub mod server;
pub mod validation;

pub use cart::{CartEntry, PurchaseLine, ShoppingList};
pub use compose::{Catalog, ComposedPatch, ComposedRecipe, IngredientLine, RecipeDraft, RecipePatch};
pub use error::{Error, Result};
pub use permissions::{Action, Actor};
pub use validation::FieldErrors;
