// src/db/models/tag.rs

//! Recipe tags (breakfast, dinner, ...)

use super::is_unique_violation;
use crate::error::{Error, Result};
use crate::validation::FieldErrors;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;

const MAX_NAME: usize = 200;
const MAX_SLUG: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: Option<i64>,
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl Tag {
    pub fn new(name: String, color: String, slug: String) -> Self {
        Self {
            id: None,
            name,
            color,
            slug,
        }
    }

    /// Check field formats; uniqueness is left to the database
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check_text("name", &self.name, MAX_NAME);
        errors.check_hex_color("color", &self.color);
        errors.check_text("slug", &self.slug, MAX_SLUG);
        if !self.slug.is_empty() {
            errors.check_slug("slug", &self.slug);
        }
        errors.into_result()
    }

    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        self.validate()?;
        conn.execute(
            "INSERT INTO tags (name, color, slug) VALUES (?1, ?2, ?3)",
            params![&self.name, &self.color, &self.slug],
        )
        .map_err(duplicate_tag)?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Persist changed fields of an existing tag
    pub fn update(&self, conn: &Connection) -> Result<()> {
        let id = self
            .id
            .ok_or_else(|| Error::InitError("Cannot update tag without ID".to_string()))?;
        self.validate()?;

        conn.execute(
            "UPDATE tags SET name = ?1, color = ?2, slug = ?3 WHERE id = ?4",
            params![&self.name, &self.color, &self.slug, id],
        )
        .map_err(duplicate_tag)?;
        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt = conn.prepare("SELECT id, name, color, slug FROM tags WHERE id = ?1")?;
        let tag = stmt.query_row([id], Self::from_row).optional()?;
        Ok(tag)
    }

    /// All tags, newest first
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT id, name, color, slug FROM tags ORDER BY id DESC")?;
        let tags = stmt
            .query_map([], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    /// Tags attached to a recipe, newest first
    pub fn for_recipe(conn: &Connection, recipe_id: i64) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT t.id, t.name, t.color, t.slug
             FROM tags t JOIN recipe_tags rt ON rt.tag_id = t.id
             WHERE rt.recipe_id = ?1
             ORDER BY t.id DESC",
        )?;
        let tags = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let deleted = conn.execute("DELETE FROM tags WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            color: row.get(2)?,
            slug: row.get(3)?,
        })
    }
}

fn duplicate_tag(err: rusqlite::Error) -> Error {
    if is_unique_violation(&err) {
        Error::invalid(
            "non_field_errors",
            "A tag with this name, color or slug already exists.",
        )
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::test_support::create_test_db;

    #[test]
    fn test_tag_crud() {
        let (_temp, conn) = create_test_db();

        let mut breakfast = Tag::new(
            "Breakfast".to_string(),
            "#E26C2D".to_string(),
            "breakfast".to_string(),
        );
        let id = breakfast.insert(&conn).unwrap();
        let mut dinner = Tag::new("Dinner".to_string(), "#49B64E".to_string(), "dinner".to_string());
        dinner.insert(&conn).unwrap();

        let all = Tag::list_all(&conn).unwrap();
        assert_eq!(all[0].slug, "dinner");
        assert_eq!(all[1].slug, "breakfast");

        breakfast.name = "Early breakfast".to_string();
        breakfast.update(&conn).unwrap();
        assert_eq!(
            Tag::find_by_id(&conn, id).unwrap().unwrap().name,
            "Early breakfast"
        );

        assert!(Tag::delete(&conn, id).unwrap());
        assert!(Tag::find_by_id(&conn, id).unwrap().is_none());
    }

    #[test]
    fn test_tag_uniqueness_and_format() {
        let (_temp, conn) = create_test_db();
        let mut tag = Tag::new("Lunch".to_string(), "#fff".to_string(), "lunch".to_string());
        tag.insert(&conn).unwrap();

        let mut same_color = Tag::new("Other".to_string(), "#FFF".to_string(), "other".to_string());
        assert!(matches!(same_color.insert(&conn), Err(Error::Validation(_))));

        let mut bad = Tag::new("Bad".to_string(), "red".to_string(), "no spaces".to_string());
        match bad.insert(&conn) {
            Err(Error::Validation(errors)) => {
                assert!(errors.contains("color"));
                assert!(errors.contains("slug"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
