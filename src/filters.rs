// src/filters.rs

//! Recipe listing filters
//!
//! Parsed from the raw query string so repeated keys (`tags=a&tags=b`) are
//! kept. Converted to a SQL `WHERE` fragment over the `recipes r` alias.

use crate::error::{Error, Result};
use rusqlite::types::Value;

/// Filters accepted by the recipe listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<i64>,
    /// Tag slugs; a recipe matches when it carries any of them
    pub tags: Vec<String>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
}

impl RecipeFilter {
    /// Parse from decoded query pairs, ignoring keys that are not filters
    pub fn from_query(pairs: &[(String, String)]) -> Result<Self> {
        let mut filter = Self::default();

        for (key, value) in pairs {
            match key.as_str() {
                "author" => {
                    let author = value
                        .parse()
                        .map_err(|_| Error::invalid("author", "Select a valid author id."))?;
                    filter.author = Some(author);
                }
                "tags" if !value.is_empty() => {
                    if !filter.tags.contains(value) {
                        filter.tags.push(value.clone());
                    }
                }
                "is_favorited" => filter.is_favorited = Some(parse_flag(key, value)?),
                "is_in_shopping_cart" => {
                    filter.is_in_shopping_cart = Some(parse_flag(key, value)?)
                }
                _ => {}
            }
        }

        Ok(filter)
    }

    /// SQL condition and its parameters for a caller identified by `viewer`
    ///
    /// Anonymous callers have no favorites or cart: asking for members
    /// matches nothing, asking for non-members matches everything.
    pub fn to_sql(&self, viewer: Option<i64>) -> (String, Vec<Value>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(author) = self.author {
            conditions.push("r.author_id = ?".to_string());
            params.push(Value::Integer(author));
        }

        if !self.tags.is_empty() {
            let placeholders = vec!["?"; self.tags.len()].join(", ");
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id
                         WHERE rt.recipe_id = r.id AND t.slug IN ({placeholders}))"
            ));
            params.extend(self.tags.iter().cloned().map(Value::Text));
        }

        for (flag, table) in [
            (self.is_favorited, "favorites"),
            (self.is_in_shopping_cart, "shopping_cart"),
        ] {
            match (flag, viewer) {
                (Some(wanted), Some(user_id)) => {
                    let negate = if wanted { "" } else { "NOT " };
                    conditions.push(format!(
                        "{negate}EXISTS (SELECT 1 FROM {table} m WHERE m.recipe_id = r.id AND m.user_id = ?)"
                    ));
                    params.push(Value::Integer(user_id));
                }
                (Some(true), None) => conditions.push("0".to_string()),
                _ => {}
            }
        }

        if conditions.is_empty() {
            ("1".to_string(), params)
        } else {
            (conditions.join(" AND "), params)
        }
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(Error::invalid(key, "Expected 1, 0, true or false.")),
    }
}

/// Decode a raw query string into key/value pairs
pub fn parse_query(raw: Option<&str>) -> Vec<(String, String)> {
    raw.map(|query| {
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    })
    .unwrap_or_default()
}

/// Last value for `key`, parsed
pub fn query_value<T: std::str::FromStr>(pairs: &[(String, String)], key: &str) -> Result<Option<T>> {
    match pairs.iter().rev().find(|(k, _)| k == key) {
        None => Ok(None),
        Some((_, value)) if value.is_empty() => Ok(None),
        Some((_, value)) => value
            .parse()
            .map(Some)
            .map_err(|_| Error::invalid(key, format!("Invalid value: {value}"))),
    }
}
