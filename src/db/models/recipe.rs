// src/db/models/recipe.rs

//! Recipes and their ingredient lines
//!
//! Writes accept only [`ComposedRecipe`] / [`ComposedPatch`] values, so the
//! lines and tags stored here have already passed composition checks. Run
//! the writes inside [`crate::db::transaction`]: a recipe and its lines are
//! stored together or not at all.

use crate::compose::{ComposedPatch, ComposedRecipe, IngredientLine};
use crate::error::{Error, Result};
use crate::filters::RecipeFilter;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use serde::Serialize;
use tracing::debug;

const COLUMNS: &str = "r.id, r.author_id, r.name, r.image, r.text, r.cooking_time, r.pub_date";

/// A stored recipe (body only; lines and tags are loaded separately)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i64,
    pub pub_date: String,
}

/// An ingredient line of a recipe, joined with the catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeIngredient {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

impl Recipe {
    /// Store a composed recipe for `author_id`
    pub fn create(conn: &Connection, author_id: i64, recipe: &ComposedRecipe) -> Result<Self> {
        conn.execute(
            "INSERT INTO recipes (author_id, name, image, text, cooking_time)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                author_id,
                recipe.name(),
                recipe.image(),
                recipe.text(),
                recipe.cooking_time(),
            ],
        )?;
        let id = conn.last_insert_rowid();

        insert_lines(conn, id, recipe.ingredients())?;
        insert_tags(conn, id, recipe.tags())?;
        debug!(
            "Stored recipe {} with {} ingredient lines and {} tags",
            id,
            recipe.ingredients().len(),
            recipe.tags().len()
        );

        Self::find_by_id(conn, id)?
            .ok_or_else(|| Error::NotFound(format!("recipe {id}")))
    }

    /// Apply a composed partial update
    ///
    /// Present ingredient lines or tags replace the stored ones wholesale.
    pub fn apply_patch(conn: &Connection, id: i64, patch: &ComposedPatch) -> Result<Self> {
        let current =
            Self::find_by_id(conn, id)?.ok_or_else(|| Error::NotFound(format!("recipe {id}")))?;
        let image = match patch.image() {
            Some(image) => image,
            None => current.image.as_deref(),
        };

        conn.execute(
            "UPDATE recipes SET name = ?1, image = ?2, text = ?3, cooking_time = ?4 WHERE id = ?5",
            params![
                patch.name().unwrap_or(current.name.as_str()),
                image,
                patch.text().unwrap_or(current.text.as_str()),
                patch.cooking_time().unwrap_or(current.cooking_time),
                id,
            ],
        )?;

        if let Some(lines) = patch.ingredients() {
            conn.execute("DELETE FROM recipe_ingredients WHERE recipe_id = ?1", [id])?;
            insert_lines(conn, id, lines)?;
        }
        if let Some(tags) = patch.tags() {
            conn.execute("DELETE FROM recipe_tags WHERE recipe_id = ?1", [id])?;
            insert_tags(conn, id, tags)?;
        }

        Self::find_by_id(conn, id)?.ok_or_else(|| Error::NotFound(format!("recipe {id}")))
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM recipes r WHERE r.id = ?1"))?;
        let recipe = stmt.query_row([id], Self::from_row).optional()?;
        Ok(recipe)
    }

    /// Filtered page of recipes, newest first, plus the total match count
    pub fn query(
        conn: &Connection,
        filter: &RecipeFilter,
        viewer: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<(u64, Vec<Self>)> {
        let (condition, mut values) = filter.to_sql(viewer);

        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM recipes r WHERE {condition}"),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;

        values.push(limit.into());
        values.push(offset.into());
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM recipes r WHERE {condition}
             ORDER BY r.pub_date DESC, r.id DESC LIMIT ? OFFSET ?"
        ))?;
        let recipes = stmt
            .query_map(params_from_iter(values.iter()), Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok((count as u64, recipes))
    }

    /// An author's recipes, newest first, optionally capped
    pub fn list_by_author(conn: &Connection, author_id: i64, limit: Option<i64>) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM recipes r WHERE r.author_id = ?1
             ORDER BY r.pub_date DESC, r.id DESC LIMIT ?2"
        ))?;
        let recipes = stmt
            .query_map(params![author_id, limit.unwrap_or(-1)], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(recipes)
    }

    pub fn count_by_author(conn: &Connection, author_id: i64) -> Result<u64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM recipes WHERE author_id = ?1",
            [author_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Ingredient lines in insertion order
    pub fn ingredients(conn: &Connection, recipe_id: i64) -> Result<Vec<RecipeIngredient>> {
        let mut stmt = conn.prepare(
            "SELECT i.id, i.name, i.measurement_unit, ri.amount
             FROM recipe_ingredients ri JOIN ingredients i ON i.id = ri.ingredient_id
             WHERE ri.recipe_id = ?1
             ORDER BY ri.id",
        )?;
        let lines = stmt
            .query_map([recipe_id], |row| {
                Ok(RecipeIngredient {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    measurement_unit: row.get(2)?,
                    amount: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(lines)
    }

    /// Delete a recipe; lines, tags, favorites and cart entries cascade
    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let deleted = conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            author_id: row.get(1)?,
            name: row.get(2)?,
            image: row.get(3)?,
            text: row.get(4)?,
            cooking_time: row.get(5)?,
            pub_date: row.get(6)?,
        })
    }
}

fn insert_lines(conn: &Connection, recipe_id: i64, lines: &[IngredientLine]) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) VALUES (?1, ?2, ?3)",
    )?;
    for line in lines {
        stmt.execute(params![recipe_id, line.id, line.amount])?;
    }
    Ok(())
}

fn insert_tags(conn: &Connection, recipe_id: i64, tags: &[i64]) -> Result<()> {
    let mut stmt = conn.prepare("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES (?1, ?2)")?;
    for tag in tags {
        stmt.execute(params![recipe_id, tag])?;
    }
    Ok(())
}
