// src/db/models/subscription.rs

//! Follower -> author subscriptions

use super::{User, is_unique_violation};
use crate::error::{Error, Result};
use rusqlite::{Connection, OptionalExtension, Row, params};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub author_id: i64,
    pub created_at: String,
}

impl Subscription {
    /// Subscribe `user_id` to `author_id`
    ///
    /// Following yourself or following the same author twice is rejected.
    pub fn subscribe(conn: &Connection, user_id: i64, author_id: i64) -> Result<Self> {
        if user_id == author_id {
            return Err(Error::invalid("errors", "You cannot subscribe to yourself."));
        }
        if User::find_by_id(conn, author_id)?.is_none() {
            return Err(Error::NotFound(format!("user {author_id}")));
        }

        conn.execute(
            "INSERT INTO subscriptions (user_id, author_id) VALUES (?1, ?2)",
            params![user_id, author_id],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::AlreadyExists(format!("You are already subscribed to user {author_id}."))
            } else {
                e.into()
            }
        })?;

        let id = conn.last_insert_rowid();
        Self::find_by_id(conn, id)?.ok_or_else(|| Error::NotFound(format!("subscription {id}")))
    }

    pub fn unsubscribe(conn: &Connection, user_id: i64, author_id: i64) -> Result<()> {
        let deleted = conn.execute(
            "DELETE FROM subscriptions WHERE user_id = ?1 AND author_id = ?2",
            params![user_id, author_id],
        )?;
        if deleted == 0 {
            return Err(Error::invalid(
                "errors",
                format!("You are not subscribed to user {author_id}."),
            ));
        }
        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, user_id, author_id, created_at FROM subscriptions WHERE id = ?1",
        )?;
        let subscription = stmt.query_row([id], Self::from_row).optional()?;
        Ok(subscription)
    }

    pub fn is_subscribed(conn: &Connection, user_id: i64, author_id: i64) -> Result<bool> {
        let found = conn
            .query_row(
                "SELECT 1 FROM subscriptions WHERE user_id = ?1 AND author_id = ?2",
                params![user_id, author_id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Authors `user_id` follows, most recent subscription first
    pub fn list_for_user(
        conn: &Connection,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>> {
        let mut stmt = conn.prepare(
            "SELECT author_id FROM subscriptions WHERE user_id = ?1
             ORDER BY id DESC LIMIT ?2 OFFSET ?3",
        )?;
        let author_ids = stmt
            .query_map(params![user_id, limit, offset], |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;

        let mut authors = Vec::with_capacity(author_ids.len());
        for author_id in author_ids {
            if let Some(author) = User::find_by_id(conn, author_id)? {
                authors.push(author);
            }
        }
        Ok(authors)
    }

    pub fn count_for_user(conn: &Connection, user_id: i64) -> Result<u64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM subscriptions WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            author_id: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}
