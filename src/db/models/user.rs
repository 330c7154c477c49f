// src/db/models/user.rs

//! User accounts

use super::is_unique_violation;
use crate::auth;
use crate::error::{Error, Result};
use crate::validation::FieldErrors;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Deserialize;

const MAX_EMAIL: usize = 200;
const MAX_NAME: usize = 150;

const COLUMNS: &str =
    "id, email, username, first_name, last_name, password_hash, is_staff, is_superuser, date_joined";

/// A registered account
#[derive(Debug, Clone)]
pub struct User {
    pub id: Option<i64>,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: Option<String>,
}

impl User {
    pub fn new(
        email: String,
        username: String,
        first_name: String,
        last_name: String,
        password_hash: String,
    ) -> Self {
        Self {
            id: None,
            email,
            username,
            first_name,
            last_name,
            password_hash,
            is_staff: false,
            is_superuser: false,
            date_joined: None,
        }
    }

    /// Insert this user; duplicate email or username yields `AlreadyExists`
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO users (email, username, first_name, last_name, password_hash, is_staff, is_superuser)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &self.email,
                &self.username,
                &self.first_name,
                &self.last_name,
                &self.password_hash,
                self.is_staff,
                self.is_superuser,
            ],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::AlreadyExists(format!("user {}", self.email))
            } else {
                e.into()
            }
        })?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM users WHERE id = ?1"))?;
        let user = stmt.query_row([id], Self::from_row).optional()?;
        Ok(user)
    }

    /// Case-insensitive email lookup
    pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM users WHERE email = ?1"))?;
        let user = stmt.query_row([email], Self::from_row).optional()?;
        Ok(user)
    }

    pub fn find_by_username(conn: &Connection, username: &str) -> Result<Option<Self>> {
        let mut stmt =
            conn.prepare(&format!("SELECT {COLUMNS} FROM users WHERE username = ?1"))?;
        let user = stmt.query_row([username], Self::from_row).optional()?;
        Ok(user)
    }

    /// Users ordered by id
    pub fn list_page(conn: &Connection, limit: i64, offset: i64) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM users ORDER BY id LIMIT ?1 OFFSET ?2"
        ))?;

        let users = stmt
            .query_map([limit, offset], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(users)
    }

    pub fn count(conn: &Connection) -> Result<u64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn set_password_hash(conn: &Connection, id: i64, password_hash: &str) -> Result<()> {
        let changed = conn.execute(
            "UPDATE users SET password_hash = ?1 WHERE id = ?2",
            params![password_hash, id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("user {id}")));
        }
        Ok(())
    }

    pub fn set_staff(conn: &Connection, id: i64, is_staff: bool) -> Result<()> {
        conn.execute(
            "UPDATE users SET is_staff = ?1 WHERE id = ?2",
            params![is_staff, id],
        )?;
        Ok(())
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let deleted = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            email: row.get(1)?,
            username: row.get(2)?,
            first_name: row.get(3)?,
            last_name: row.get(4)?,
            password_hash: row.get(5)?,
            is_staff: row.get(6)?,
            is_superuser: row.get(7)?,
            date_joined: row.get(8)?,
        })
    }
}

/// Sign-up payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl Registration {
    /// Validate every field, hash the password and store the account
    pub fn register(self, conn: &Connection, hash_iterations: u32) -> Result<User> {
        let mut errors = FieldErrors::new();
        let email = self.email.trim().to_string();
        let username = self.username.trim().to_string();

        errors.check_text("email", &email, MAX_EMAIL);
        if !email.is_empty() {
            errors.check_email("email", &email);
        }
        errors.check_text("username", &username, MAX_NAME);
        if !username.is_empty() {
            errors.check_username("username", &username);
        }
        errors.check_text("first_name", &self.first_name, MAX_NAME);
        errors.check_text("last_name", &self.last_name, MAX_NAME);
        auth::check_password(
            &mut errors,
            "password",
            &self.password,
            &[email.as_str(), username.as_str()],
        );

        if !email.is_empty() && User::find_by_email(conn, &email)?.is_some() {
            errors.add("email", "A user with that email already exists.");
        }
        if !username.is_empty() && User::find_by_username(conn, &username)?.is_some() {
            errors.add("username", "A user with that username already exists.");
        }
        errors.into_result()?;

        let mut user = User::new(
            email,
            username,
            self.first_name.trim().to_string(),
            self.last_name.trim().to_string(),
            auth::hash_password(&self.password, hash_iterations),
        );
        user.insert(conn)?;
        Ok(user)
    }
}
