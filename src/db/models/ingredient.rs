// src/db/models/ingredient.rs

//! Ingredient catalog

use crate::error::{Error, Result};
use crate::validation::FieldErrors;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;

const MAX_NAME: usize = 200;
const MAX_UNIT: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub id: Option<i64>,
    pub name: String,
    pub measurement_unit: String,
}

impl Ingredient {
    pub fn new(name: String, measurement_unit: String) -> Self {
        Self {
            id: None,
            name,
            measurement_unit,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check_text("name", &self.name, MAX_NAME);
        errors.check_text("measurement_unit", &self.measurement_unit, MAX_UNIT);
        errors.into_result()
    }

    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        self.validate()?;
        conn.execute(
            "INSERT INTO ingredients (name, measurement_unit) VALUES (?1, ?2)",
            params![&self.name, &self.measurement_unit],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    pub fn update(&self, conn: &Connection) -> Result<()> {
        let id = self
            .id
            .ok_or_else(|| Error::InitError("Cannot update ingredient without ID".to_string()))?;
        self.validate()?;

        conn.execute(
            "UPDATE ingredients SET name = ?1, measurement_unit = ?2 WHERE id = ?3",
            params![&self.name, &self.measurement_unit, id],
        )?;
        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt =
            conn.prepare("SELECT id, name, measurement_unit FROM ingredients WHERE id = ?1")?;
        let ingredient = stmt.query_row([id], Self::from_row).optional()?;
        Ok(ingredient)
    }

    /// All ingredients ordered by name
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, measurement_unit FROM ingredients ORDER BY name COLLATE NOCASE, id",
        )?;
        let ingredients = stmt
            .query_map([], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ingredients)
    }

    /// Ingredients whose name starts with `prefix`, ignoring case
    ///
    /// Matching happens in Rust: SQLite's LIKE only folds ASCII.
    pub fn search(conn: &Connection, prefix: &str) -> Result<Vec<Self>> {
        let prefix = prefix.trim().to_lowercase();
        let mut ingredients = Self::list_all(conn)?;
        if !prefix.is_empty() {
            ingredients.retain(|i| i.name.to_lowercase().starts_with(&prefix));
        }
        Ok(ingredients)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let deleted = conn.execute("DELETE FROM ingredients WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            measurement_unit: row.get(2)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::test_support::{create_test_db, ingredient};

    #[test]
    fn test_search_is_case_insensitive_prefix() {
        let (_temp, conn) = create_test_db();
        ingredient(&conn, "Сахар", "г");
        ingredient(&conn, "сахарная пудра", "г");
        ingredient(&conn, "Salt", "g");
        ingredient(&conn, "sugar", "g");

        let found = Ingredient::search(&conn, "САХ").unwrap();
        assert_eq!(found.len(), 2);

        let found = Ingredient::search(&conn, "s").unwrap();
        let names: Vec<_> = found.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Salt", "sugar"]);

        assert_eq!(Ingredient::search(&conn, "").unwrap().len(), 4);
    }

    #[test]
    fn test_update_and_delete() {
        let (_temp, conn) = create_test_db();
        let id = ingredient(&conn, "milk", "ml");

        let mut milk = Ingredient::find_by_id(&conn, id).unwrap().unwrap();
        milk.measurement_unit = "l".to_string();
        milk.update(&conn).unwrap();
        assert_eq!(
            Ingredient::find_by_id(&conn, id).unwrap().unwrap().measurement_unit,
            "l"
        );

        let mut blank = Ingredient::new(String::new(), "g".to_string());
        assert!(matches!(blank.insert(&conn), Err(Error::Validation(_))));

        assert!(Ingredient::delete(&conn, id).unwrap());
        assert!(!Ingredient::delete(&conn, id).unwrap());
    }
}
