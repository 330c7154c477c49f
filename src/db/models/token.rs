// src/db/models/token.rs

//! API tokens (one per user)

use super::User;
use crate::auth;
use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row};

/// An issued API token
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub key: String,
    pub user_id: i64,
    pub created_at: Option<String>,
}

impl AuthToken {
    /// Return the user's token, issuing one if none exists
    pub fn get_or_create(conn: &Connection, user_id: i64) -> Result<Self> {
        if let Some(existing) = Self::find_by_user(conn, user_id)? {
            return Ok(existing);
        }

        let key = auth::generate_token_key();
        conn.execute(
            "INSERT INTO auth_tokens (key, user_id) VALUES (?1, ?2)",
            rusqlite::params![&key, user_id],
        )?;

        Ok(Self {
            key,
            user_id,
            created_at: None,
        })
    }

    pub fn find_by_user(conn: &Connection, user_id: i64) -> Result<Option<Self>> {
        let mut stmt =
            conn.prepare("SELECT key, user_id, created_at FROM auth_tokens WHERE user_id = ?1")?;
        let token = stmt.query_row([user_id], Self::from_row).optional()?;
        Ok(token)
    }

    /// The account a token key belongs to
    pub fn find_user(conn: &Connection, key: &str) -> Result<Option<User>> {
        let user_id: Option<i64> = conn
            .query_row(
                "SELECT user_id FROM auth_tokens WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        match user_id {
            Some(id) => User::find_by_id(conn, id),
            None => Ok(None),
        }
    }

    /// Revoke the user's token; false when there was none
    pub fn delete_for_user(conn: &Connection, user_id: i64) -> Result<bool> {
        let deleted = conn.execute("DELETE FROM auth_tokens WHERE user_id = ?1", [user_id])?;
        Ok(deleted > 0)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            key: row.get(0)?,
            user_id: row.get(1)?,
            created_at: row.get(2)?,
        })
    }
}
