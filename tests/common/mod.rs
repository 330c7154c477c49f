// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use cookbook::auth;
use cookbook::db;
use cookbook::db::models::{AuthToken, Ingredient, Tag, User};
use cookbook::server::{ServerConfig, ServerState, create_router};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::RwLock;
use tower::ServiceExt;

pub const PASSWORD: &str = "kasha-and-borscht";

/// A seeded database: three accounts and a small catalog
pub struct Fixture {
    /// Keep alive to prevent cleanup
    pub dir: TempDir,
    pub db_path: String,
    pub anna: i64,
    pub boris: i64,
    pub admin: i64,
    pub flour: i64,
    pub egg: i64,
    pub milk: i64,
    pub sugar_g: i64,
    pub sugar_tbsp: i64,
    pub breakfast: i64,
    pub dinner: i64,
}

fn add_user(conn: &rusqlite::Connection, name: &str, staff: bool) -> i64 {
    let mut user = User::new(
        format!("{name}@example.org"),
        name.to_string(),
        name.to_uppercase(),
        "Tester".to_string(),
        auth::hash_password(PASSWORD, 1),
    );
    user.is_staff = staff;
    user.insert(conn).unwrap()
}

fn add_ingredient(conn: &rusqlite::Connection, name: &str, unit: &str) -> i64 {
    Ingredient::new(name.to_string(), unit.to_string())
        .insert(conn)
        .unwrap()
}

fn add_tag(conn: &rusqlite::Connection, name: &str, color: &str, slug: &str) -> i64 {
    Tag::new(name.to_string(), color.to_string(), slug.to_string())
        .insert(conn)
        .unwrap()
}

/// Create a test database with users, ingredients and tags.
pub fn setup_test_db() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir
        .path()
        .join("cookbook.db")
        .to_str()
        .unwrap()
        .to_string();

    db::init(&db_path).unwrap();
    let conn = db::open(&db_path).unwrap();

    Fixture {
        anna: add_user(&conn, "anna", false),
        boris: add_user(&conn, "boris", false),
        admin: add_user(&conn, "admin", true),
        flour: add_ingredient(&conn, "flour", "g"),
        egg: add_ingredient(&conn, "egg", "pcs"),
        milk: add_ingredient(&conn, "milk", "ml"),
        sugar_g: add_ingredient(&conn, "sugar", "g"),
        sugar_tbsp: add_ingredient(&conn, "sugar", "tbsp"),
        breakfast: add_tag(&conn, "Breakfast", "#E26C2D", "breakfast"),
        dinner: add_tag(&conn, "Dinner", "#49B64E", "dinner"),
        dir,
        db_path,
    }
}

impl Fixture {
    /// Router over this database with cheap password hashing
    pub fn app(&self) -> Router {
        let config = ServerConfig {
            db_path: self.db_path.clone().into(),
            hash_iterations: 1,
            ..ServerConfig::default()
        };
        create_router(Arc::new(RwLock::new(ServerState::new(config))))
    }

    pub fn token(&self, user_id: i64) -> String {
        let conn = db::open(&self.db_path).unwrap();
        AuthToken::get_or_create(&conn, user_id).unwrap().key
    }
}

/// Response status, headers and raw body
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

/// Send one request through the router
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Create a recipe over HTTP and return its id
pub async fn create_recipe(
    app: &Router,
    token: &str,
    name: &str,
    lines: &[(i64, i64)],
    tags: &[i64],
) -> i64 {
    let ingredients: Vec<Value> = lines
        .iter()
        .map(|(id, amount)| serde_json::json!({ "id": id, "amount": amount }))
        .collect();
    let body = serde_json::json!({
        "name": name,
        "text": format!("Cook the {name}."),
        "cooking_time": 20,
        "ingredients": ingredients,
        "tags": tags,
    });

    let response = send(app, "POST", "/api/recipes/", Some(token), Some(body)).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
    response.json()["id"].as_i64().unwrap()
}
