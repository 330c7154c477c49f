// tests/api.rs

//! HTTP API tests driven through the router

mod common;

use axum::http::{StatusCode, header};
use common::{PASSWORD, create_recipe, send, setup_test_db};
use serde_json::json;

#[tokio::test]
async fn test_register_login_and_me() {
    let fx = setup_test_db();
    let app = fx.app();

    let response = send(
        &app,
        "POST",
        "/api/users/",
        None,
        Some(json!({
            "email": "vera@example.org",
            "username": "vera",
            "first_name": "Vera",
            "last_name": "Ivanova",
            "password": "blini-with-honey",
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["username"], "vera");
    assert!(response.json().get("password").is_none());

    let response = send(
        &app,
        "POST",
        "/api/auth/token/login/",
        None,
        Some(json!({ "email": "vera@example.org", "password": "blini-with-honey" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    let token = response.json()["auth_token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 40);

    let response = send(&app, "GET", "/api/users/me/", Some(&token), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["email"], "vera@example.org");

    let response = send(&app, "GET", "/api/users/me/", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = send(&app, "POST", "/api/auth/token/logout/", Some(&token), None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let response = send(&app, "GET", "/api/users/me/", Some(&token), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_reports_every_field() {
    let fx = setup_test_db();
    let app = fx.app();

    let response = send(
        &app,
        "POST",
        "/api/users/",
        None,
        Some(json!({ "email": "anna@example.org", "username": "anna", "password": "12345678" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let errors = response.json();
    for field in ["email", "username", "first_name", "last_name", "password"] {
        assert!(errors.get(field).is_some(), "no error for {field}: {errors}");
    }
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let fx = setup_test_db();
    let response = send(
        &fx.app(),
        "POST",
        "/api/auth/token/login/",
        None,
        Some(json!({ "email": "anna@example.org", "password": "not-the-password" })),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json().get("non_field_errors").is_some());
}

#[tokio::test]
async fn test_set_password() {
    let fx = setup_test_db();
    let app = fx.app();
    let token = fx.token(fx.anna);

    let response = send(
        &app,
        "POST",
        "/api/users/set_password/",
        Some(&token),
        Some(json!({ "current_password": "wrong", "new_password": "123" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let errors = response.json();
    assert!(errors.get("current_password").is_some());
    assert!(errors.get("new_password").is_some());

    let response = send(
        &app,
        "POST",
        "/api/users/set_password/",
        Some(&token),
        Some(json!({ "current_password": PASSWORD, "new_password": "pirozhki-2024" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = send(
        &app,
        "POST",
        "/api/auth/token/login/",
        None,
        Some(json!({ "email": "anna@example.org", "password": "pirozhki-2024" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_recipe_and_read_back() {
    let fx = setup_test_db();
    let app = fx.app();
    let token = fx.token(fx.anna);

    let id = create_recipe(
        &app,
        &token,
        "Pancakes",
        &[(fx.flour, 200), (fx.egg, 2)],
        &[fx.breakfast],
    )
    .await;

    let response = send(&app, "GET", &format!("/api/recipes/{id}/"), None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    let recipe = response.json();
    assert_eq!(recipe["name"], "Pancakes");
    assert_eq!(recipe["author"]["username"], "anna");
    assert_eq!(recipe["author"]["is_subscribed"], false);
    assert_eq!(recipe["ingredients"].as_array().unwrap().len(), 2);
    assert_eq!(recipe["ingredients"][0]["name"], "flour");
    assert_eq!(recipe["ingredients"][0]["measurement_unit"], "g");
    assert_eq!(recipe["ingredients"][0]["amount"], 200);
    assert_eq!(recipe["tags"][0]["slug"], "breakfast");
    assert_eq!(recipe["is_favorited"], false);
    assert_eq!(recipe["is_in_shopping_cart"], false);

    let response = send(&app, "GET", "/api/recipes/999/", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_recipe_is_rejected_whole() {
    let fx = setup_test_db();
    let app = fx.app();
    let token = fx.token(fx.anna);

    let body = json!({
        "name": "Broken",
        "text": "Nothing good",
        "cooking_time": 0,
        "ingredients": [
            { "id": fx.flour, "amount": 0 },
            { "id": fx.flour, "amount": 10 },
            { "id": 999, "amount": 1 },
        ],
        "tags": [999],
    });
    let response = send(&app, "POST", "/api/recipes/", Some(&token), Some(body)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let errors = response.json();
    assert!(errors.get("cooking_time").is_some());
    assert_eq!(errors["ingredients"].as_array().unwrap().len(), 3);
    assert!(errors.get("tags").is_some());
    assert!(errors.get("name").is_none());

    let response = send(
        &app,
        "POST",
        "/api/recipes/",
        Some(&token),
        Some(json!({ "name": "Empty", "text": "x", "cooking_time": 5, "ingredients": [], "tags": [] })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json().get("ingredients").is_some());

    let response = send(&app, "GET", "/api/recipes/", None, None).await;
    assert_eq!(response.json()["count"], 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let fx = setup_test_db();
    let app = fx.app();
    let token = fx.token(fx.anna);

    let response = send(
        &app,
        "POST",
        "/api/recipes/",
        Some(&token),
        Some(json!({ "name": "Typed wrong", "cooking_time": "soon" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json().get("detail").is_some());
}

#[tokio::test]
async fn test_recipe_permissions() {
    let fx = setup_test_db();
    let app = fx.app();
    let anna = fx.token(fx.anna);
    let boris = fx.token(fx.boris);
    let admin = fx.token(fx.admin);

    let id = create_recipe(&app, &anna, "Soup", &[(fx.milk, 500)], &[fx.dinner]).await;
    let uri = format!("/api/recipes/{id}/");

    let response = send(
        &app,
        "POST",
        "/api/recipes/",
        None,
        Some(json!({ "name": "Anon", "text": "x", "cooking_time": 1 })),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = send(&app, "PATCH", &uri, Some(&boris), Some(json!({ "cooking_time": 5 }))).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = send(&app, "PATCH", &uri, Some(&anna), Some(json!({ "cooking_time": 45 }))).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["cooking_time"], 45);
    assert_eq!(response.json()["ingredients"][0]["amount"], 500);

    let response = send(&app, "DELETE", &uri, Some(&boris), None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = send(&app, "DELETE", &uri, Some(&admin), None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let response = send(&app, "GET", &uri, None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_replaces_ingredients() {
    let fx = setup_test_db();
    let app = fx.app();
    let anna = fx.token(fx.anna);

    let id = create_recipe(&app, &anna, "Porridge", &[(fx.milk, 300)], &[fx.breakfast]).await;
    let uri = format!("/api/recipes/{id}/");

    let response = send(
        &app,
        "PATCH",
        &uri,
        Some(&anna),
        Some(json!({ "ingredients": [{ "id": fx.milk, "amount": 300 }, { "id": fx.milk, "amount": 1 }] })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        "PATCH",
        &uri,
        Some(&anna),
        Some(json!({ "ingredients": [{ "id": fx.sugar_g, "amount": 15 }] })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    let ingredients = response.json()["ingredients"].as_array().unwrap().clone();
    assert_eq!(ingredients.len(), 1);
    assert_eq!(ingredients[0]["name"], "sugar");
}

#[tokio::test]
async fn test_catalog_is_staff_only() {
    let fx = setup_test_db();
    let app = fx.app();
    let anna = fx.token(fx.anna);
    let admin = fx.token(fx.admin);
    let tag = json!({ "name": "Lunch", "color": "#8775D2", "slug": "lunch" });

    let response = send(&app, "POST", "/api/tags/", Some(&anna), Some(tag.clone())).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = send(&app, "POST", "/api/tags/", Some(&admin), Some(tag.clone())).await;
    assert_eq!(response.status, StatusCode::CREATED);
    let tag_id = response.json()["id"].as_i64().unwrap();

    let response = send(&app, "POST", "/api/tags/", Some(&admin), Some(tag)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send(&app, "GET", "/api/tags/", None, None).await;
    assert_eq!(response.json().as_array().unwrap().len(), 3);

    let response = send(
        &app,
        "PATCH",
        &format!("/api/tags/{tag_id}/"),
        Some(&admin),
        Some(json!({ "name": "Late lunch" })),
    )
    .await;
    assert_eq!(response.json()["name"], "Late lunch");
    assert_eq!(response.json()["slug"], "lunch");

    let response = send(
        &app,
        "POST",
        "/api/ingredients/",
        Some(&admin),
        Some(json!({ "name": "Flaxseed", "measurement_unit": "g" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = send(&app, "GET", "/api/ingredients/?name=FL", None, None).await;
    let names: Vec<_> = response
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Flaxseed", "flour"]);

    let response = send(&app, "DELETE", &format!("/api/tags/{tag_id}/"), Some(&anna), None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    let response = send(&app, "DELETE", &format!("/api/tags/{tag_id}/"), Some(&admin), None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_favorites_and_cart_membership() {
    let fx = setup_test_db();
    let app = fx.app();
    let anna = fx.token(fx.anna);
    let boris = fx.token(fx.boris);

    let id = create_recipe(&app, &anna, "Omelette", &[(fx.egg, 3)], &[fx.breakfast]).await;
    let favorite = format!("/api/recipes/{id}/favorite/");

    let response = send(&app, "POST", &favorite, None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = send(&app, "POST", &favorite, Some(&boris), None).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["name"], "Omelette");
    assert_eq!(response.json()["cooking_time"], 20);

    let response = send(&app, "POST", &favorite, Some(&boris), None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send(&app, "GET", "/api/recipes/?is_favorited=1", Some(&boris), None).await;
    assert_eq!(response.json()["count"], 1);
    assert_eq!(response.json()["results"][0]["is_favorited"], true);

    let response = send(&app, "DELETE", &favorite, Some(&boris), None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let response = send(&app, "DELETE", &favorite, Some(&boris), None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send(&app, "POST", "/api/recipes/999/shopping_cart/", Some(&boris), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_download_shopping_cart_aggregates() {
    let fx = setup_test_db();
    let app = fx.app();
    let anna = fx.token(fx.anna);
    let boris = fx.token(fx.boris);

    let pancakes = create_recipe(
        &app,
        &anna,
        "Pancakes",
        &[(fx.flour, 200), (fx.egg, 2), (fx.sugar_g, 30)],
        &[fx.breakfast],
    )
    .await;
    let pie = create_recipe(
        &app,
        &anna,
        "Pie",
        &[(fx.flour, 500), (fx.sugar_tbsp, 2)],
        &[fx.dinner],
    )
    .await;

    let response = send(&app, "GET", "/api/recipes/download_shopping_cart/", Some(&boris), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "Your shopping list is empty.");

    for id in [pancakes, pie] {
        let uri = format!("/api/recipes/{id}/shopping_cart/");
        let response = send(&app, "POST", &uri, Some(&boris), None).await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let response = send(&app, "GET", "/api/recipes/download_shopping_cart/", Some(&boris), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(
        response.headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain")
    );
    assert!(
        response.headers[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("shopping_list.txt")
    );
    assert_eq!(
        response.text(),
        "Shopping list:\n\
         1. egg - 2 pcs.\n\
         2. flour - 700 g.\n\
         3. sugar - 30 g.\n\
         4. sugar - 2 tbsp."
    );

    let response = send(&app, "GET", "/api/recipes/download_shopping_cart/", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_recipe_list_pagination_and_filters() {
    let fx = setup_test_db();
    let app = fx.app();
    let anna = fx.token(fx.anna);
    let boris = fx.token(fx.boris);

    for n in 0..5 {
        create_recipe(&app, &anna, &format!("Breakfast {n}"), &[(fx.egg, 1)], &[fx.breakfast]).await;
    }
    for n in 0..3 {
        create_recipe(&app, &boris, &format!("Dinner {n}"), &[(fx.milk, 1)], &[fx.dinner]).await;
    }

    let response = send(&app, "GET", "/api/recipes/", None, None).await;
    let page = response.json();
    assert_eq!(page["count"], 8);
    assert_eq!(page["results"].as_array().unwrap().len(), 6);
    assert_eq!(page["results"][0]["name"], "Dinner 2");
    assert!(page["next"].as_str().unwrap().contains("page=2"));
    assert!(page["previous"].is_null());

    let response = send(&app, "GET", "/api/recipes/?limit=3&page=3", None, None).await;
    let page = response.json();
    assert_eq!(page["results"].as_array().unwrap().len(), 2);
    assert!(page["next"].is_null());
    assert!(page["previous"].as_str().unwrap().contains("page=2"));

    let response = send(&app, "GET", "/api/recipes/?tags=dinner", None, None).await;
    assert_eq!(response.json()["count"], 3);

    let response = send(&app, "GET", "/api/recipes/?tags=dinner&tags=breakfast", None, None).await;
    assert_eq!(response.json()["count"], 8);

    let uri = format!("/api/recipes/?author={}", fx.anna);
    let response = send(&app, "GET", &uri, None, None).await;
    assert_eq!(response.json()["count"], 5);

    let response = send(&app, "GET", "/api/recipes/?is_in_shopping_cart=1", None, None).await;
    assert_eq!(response.json()["count"], 0);

    let response = send(&app, "GET", "/api/recipes/?is_favorited=maybe", None, None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_subscriptions() {
    let fx = setup_test_db();
    let app = fx.app();
    let anna = fx.token(fx.anna);
    let boris = fx.token(fx.boris);

    create_recipe(&app, &anna, "Kasha", &[(fx.milk, 200)], &[fx.breakfast]).await;
    create_recipe(&app, &anna, "Syrniki", &[(fx.egg, 1)], &[fx.breakfast]).await;

    let subscribe = format!("/api/users/{}/subscribe/?recipes_limit=1", fx.anna);
    let response = send(&app, "POST", &subscribe, Some(&boris), None).await;
    assert_eq!(response.status, StatusCode::CREATED);
    let author = response.json();
    assert_eq!(author["username"], "anna");
    assert_eq!(author["is_subscribed"], true);
    assert_eq!(author["recipes_count"], 2);
    assert_eq!(author["recipes"].as_array().unwrap().len(), 1);
    assert_eq!(author["recipes"][0]["name"], "Syrniki");

    let response = send(&app, "POST", &subscribe, Some(&boris), None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let own = format!("/api/users/{}/subscribe/", fx.boris);
    let response = send(&app, "POST", &own, Some(&boris), None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send(&app, "POST", "/api/users/999/subscribe/", Some(&boris), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = send(&app, "GET", "/api/users/subscriptions/", Some(&boris), None).await;
    let page = response.json();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["recipes"].as_array().unwrap().len(), 2);

    let uri = format!("/api/users/{}/", fx.anna);
    let response = send(&app, "GET", &uri, Some(&boris), None).await;
    assert_eq!(response.json()["is_subscribed"], true);

    let unsubscribe = format!("/api/users/{}/subscribe/", fx.anna);
    let response = send(&app, "DELETE", &unsubscribe, Some(&boris), None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let response = send(&app, "DELETE", &unsubscribe, Some(&boris), None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_list_requires_auth() {
    let fx = setup_test_db();
    let app = fx.app();

    let response = send(&app, "GET", "/api/users/", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let token = fx.token(fx.anna);
    let response = send(&app, "GET", "/api/users/?limit=2", Some(&token), None).await;
    let page = response.json();
    assert_eq!(page["count"], 3);
    assert_eq!(page["results"].as_array().unwrap().len(), 2);

    let response = send(&app, "GET", "/api/users/me/", Some("not-a-real-token"), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_stats() {
    let fx = setup_test_db();
    let app = fx.app();
    let anna = fx.token(fx.anna);
    let admin = fx.token(fx.admin);

    create_recipe(&app, &anna, "Tea", &[(fx.sugar_tbsp, 1)], &[fx.breakfast]).await;
    let response = send(
        &app,
        "POST",
        "/api/recipes/",
        Some(&anna),
        Some(json!({ "name": "Nothing", "text": "x", "cooking_time": 1, "ingredients": [], "tags": [fx.dinner] })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send(&app, "GET", "/api/admin/stats", Some(&anna), None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = send(&app, "GET", "/api/admin/stats", Some(&admin), None).await;
    assert_eq!(response.status, StatusCode::OK);
    let stats = response.json();
    assert_eq!(stats["recipes_composed"], 1);
    assert_eq!(stats["composition_rejections"], 1);
    assert!(stats["requests_total"].as_u64().unwrap() >= 4);
}
