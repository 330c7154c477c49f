// src/db/models/recipe_set.rs

//! Per-user recipe sets: favorites and the shopping cart

use super::is_unique_violation;
use crate::error::{Error, Result};
use rusqlite::{Connection, OptionalExtension, params};

/// Which per-user set of recipes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeSet {
    Favorites,
    ShoppingCart,
}

impl RecipeSet {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeSet::Favorites => "favorites",
            RecipeSet::ShoppingCart => "shopping_cart",
        }
    }

    fn table(&self) -> &'static str {
        self.as_str()
    }

    fn describe(&self) -> &'static str {
        match self {
            RecipeSet::Favorites => "favorites",
            RecipeSet::ShoppingCart => "shopping cart",
        }
    }

    /// Add a recipe; adding it twice is an error
    pub fn add(&self, conn: &Connection, user_id: i64, recipe_id: i64) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO {} (user_id, recipe_id) VALUES (?1, ?2)",
                self.table()
            ),
            params![user_id, recipe_id],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::AlreadyExists(format!(
                    "Recipe {recipe_id} is already in your {}.",
                    self.describe()
                ))
            } else {
                e.into()
            }
        })?;
        Ok(())
    }

    /// Remove a recipe; removing one that is not there is an error
    pub fn remove(&self, conn: &Connection, user_id: i64, recipe_id: i64) -> Result<()> {
        let deleted = conn.execute(
            &format!(
                "DELETE FROM {} WHERE user_id = ?1 AND recipe_id = ?2",
                self.table()
            ),
            params![user_id, recipe_id],
        )?;
        if deleted == 0 {
            return Err(Error::invalid(
                "errors",
                format!("Recipe {recipe_id} is not in your {}.", self.describe()),
            ));
        }
        Ok(())
    }

    pub fn contains(&self, conn: &Connection, user_id: i64, recipe_id: i64) -> Result<bool> {
        let found = conn
            .query_row(
                &format!(
                    "SELECT 1 FROM {} WHERE user_id = ?1 AND recipe_id = ?2",
                    self.table()
                ),
                params![user_id, recipe_id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}
