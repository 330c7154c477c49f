// src/compose.rs

//! Recipe composition
//!
//! A recipe is stored only after its ingredient lines and tag set have been
//! checked against the catalog. [`RecipeDraft::compose`] (create) and
//! [`RecipePatch::compose`] (partial update) run every check in one pass and
//! report all problems at once, keyed by field:
//!
//! - at least one ingredient, each with `1 <= amount <= 32767`
//! - no ingredient listed twice, every ingredient known to the catalog
//! - at least one tag, no tag listed twice, every tag known to the catalog
//! - `1 <= cooking_time <= 32767`, non-blank name (max 200 chars) and text
//!
//! The only way to obtain a [`ComposedRecipe`] or [`ComposedPatch`] is to
//! pass these checks, so the store never sees an unchecked recipe body.

use crate::error::Result;
use crate::validation::{FieldErrors, MAX_SMALL_POSITIVE};
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Maximum recipe name length (characters)
pub const MAX_RECIPE_NAME: usize = 200;

/// Existence lookups the composition checks need
pub trait Catalog {
    fn has_ingredient(&self, id: i64) -> Result<bool>;
    fn has_tag(&self, id: i64) -> Result<bool>;
}

impl Catalog for Connection {
    fn has_ingredient(&self, id: i64) -> Result<bool> {
        let found = self
            .query_row("SELECT 1 FROM ingredients WHERE id = ?1", [id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn has_tag(&self, id: i64) -> Result<bool> {
        let found = self
            .query_row("SELECT 1 FROM tags WHERE id = ?1", [id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }
}

/// One requested ingredient and its quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub id: i64,
    pub amount: i64,
}

/// Full recipe payload for creation
///
/// Missing JSON fields fall back to empty values so they surface as
/// validation messages instead of decode failures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecipeDraft {
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: i64,
    pub ingredients: Vec<IngredientLine>,
    pub tags: Vec<i64>,
}

/// Partial recipe update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<i64>,
    pub ingredients: Option<Vec<IngredientLine>>,
    pub tags: Option<Vec<i64>>,
}

/// A recipe body that passed every composition check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedRecipe {
    name: String,
    text: String,
    image: Option<String>,
    cooking_time: i64,
    ingredients: Vec<IngredientLine>,
    tags: Vec<i64>,
}

impl ComposedRecipe {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn cooking_time(&self) -> i64 {
        self.cooking_time
    }

    /// Ingredient lines in request order, ids unique
    pub fn ingredients(&self) -> &[IngredientLine] {
        &self.ingredients
    }

    /// Tag ids in request order, unique
    pub fn tags(&self) -> &[i64] {
        &self.tags
    }
}

/// A partial update that passed the checks for every present field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposedPatch {
    name: Option<String>,
    text: Option<String>,
    image: Option<Option<String>>,
    cooking_time: Option<i64>,
    ingredients: Option<Vec<IngredientLine>>,
    tags: Option<Vec<i64>>,
}

impl ComposedPatch {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// `Some(None)` clears the stored image
    pub fn image(&self) -> Option<Option<&str>> {
        self.image.as_ref().map(Option::as_deref)
    }

    pub fn cooking_time(&self) -> Option<i64> {
        self.cooking_time
    }

    /// Replacement ingredient lines, if the patch carries them
    pub fn ingredients(&self) -> Option<&[IngredientLine]> {
        self.ingredients.as_deref()
    }

    /// Replacement tag set, if the patch carries one
    pub fn tags(&self) -> Option<&[i64]> {
        self.tags.as_deref()
    }

    /// True when nothing would change
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.text.is_none()
            && self.image.is_none()
            && self.cooking_time.is_none()
            && self.ingredients.is_none()
            && self.tags.is_none()
    }
}

impl RecipeDraft {
    /// Check the draft against `catalog`
    pub fn compose(self, catalog: &impl Catalog) -> Result<ComposedRecipe> {
        let mut errors = FieldErrors::new();

        errors.check_text("name", &self.name, MAX_RECIPE_NAME);
        check_body(&mut errors, &self.text);
        check_cooking_time(&mut errors, self.cooking_time);
        check_ingredients(&mut errors, &self.ingredients, catalog)?;
        check_tags(&mut errors, &self.tags, catalog)?;
        errors.into_result()?;

        Ok(ComposedRecipe {
            name: self.name.trim().to_string(),
            text: self.text,
            image: self.image.filter(|image| !image.is_empty()),
            cooking_time: self.cooking_time,
            ingredients: self.ingredients,
            tags: self.tags,
        })
    }
}

impl RecipePatch {
    /// Check every field present in the patch against `catalog`
    pub fn compose(self, catalog: &impl Catalog) -> Result<ComposedPatch> {
        let mut errors = FieldErrors::new();

        if let Some(name) = &self.name {
            errors.check_text("name", name, MAX_RECIPE_NAME);
        }
        if let Some(text) = &self.text {
            check_body(&mut errors, text);
        }
        if let Some(cooking_time) = self.cooking_time {
            check_cooking_time(&mut errors, cooking_time);
        }
        if let Some(ingredients) = &self.ingredients {
            check_ingredients(&mut errors, ingredients, catalog)?;
        }
        if let Some(tags) = &self.tags {
            check_tags(&mut errors, tags, catalog)?;
        }
        errors.into_result()?;

        Ok(ComposedPatch {
            name: self.name.map(|name| name.trim().to_string()),
            text: self.text,
            image: self
                .image
                .map(|image| Some(image).filter(|image| !image.is_empty())),
            cooking_time: self.cooking_time,
            ingredients: self.ingredients,
            tags: self.tags,
        })
    }
}

fn check_body(errors: &mut FieldErrors, text: &str) {
    if text.trim().is_empty() {
        errors.add("text", "This field may not be blank.");
    }
}

fn check_cooking_time(errors: &mut FieldErrors, cooking_time: i64) {
    errors.check_small_positive(
        "cooking_time",
        cooking_time,
        "Cooking time must be between 1 and 32767 minutes.",
    );
}

fn check_ingredients(
    errors: &mut FieldErrors,
    lines: &[IngredientLine],
    catalog: &impl Catalog,
) -> Result<()> {
    if lines.is_empty() {
        errors.add("ingredients", "Add at least one ingredient.");
        return Ok(());
    }

    let mut seen = HashSet::with_capacity(lines.len());
    for line in lines {
        if !(1..=MAX_SMALL_POSITIVE).contains(&line.amount) {
            errors.add(
                "ingredients",
                format!(
                    "Amount of ingredient {} must be between 1 and {MAX_SMALL_POSITIVE}.",
                    line.id
                ),
            );
        }

        if !seen.insert(line.id) {
            errors.add(
                "ingredients",
                format!("Ingredient {} is listed more than once.", line.id),
            );
            continue;
        }

        if !catalog.has_ingredient(line.id)? {
            errors.add(
                "ingredients",
                format!("Ingredient {} does not exist.", line.id),
            );
        }
    }

    Ok(())
}

fn check_tags(errors: &mut FieldErrors, tags: &[i64], catalog: &impl Catalog) -> Result<()> {
    if tags.is_empty() {
        errors.add("tags", "Add at least one tag.");
        return Ok(());
    }

    let mut seen = HashSet::with_capacity(tags.len());
    for &tag in tags {
        if !seen.insert(tag) {
            errors.add("tags", format!("Tag {tag} is listed more than once."));
            continue;
        }

        if !catalog.has_tag(tag)? {
            errors.add("tags", format!("Tag {tag} does not exist."));
        }
    }

    Ok(())
}
