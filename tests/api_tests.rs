use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use foodgram::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const PASSWORD: &str = "correct-horse-battery";

async fn spawn_app() -> (Arc<foodgram::api::AppState>, Router) {
    let db_path = std::env::temp_dir().join(format!("foodgram-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = foodgram::api::create_app_state_from_config(config, None)
        .await
        .expect("failed to create app state");

    let store = state.store();
    store.upsert_ingredient(1, "sugar", "g").await.unwrap();
    store.upsert_ingredient(2, "flour", "g").await.unwrap();
    store.upsert_ingredient(3, "milk", "ml").await.unwrap();
    store.upsert_tag("Breakfast", "#E26C2D", "breakfast").await.unwrap();
    store.upsert_tag("Dinner", "#49B64E", "dinner").await.unwrap();

    let router = foodgram::api::router(state.clone()).await;
    (state, router)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

/// Sign up and log in, returning the user id and token.
async fn register(app: &Router, email: &str, username: &str) -> (i64, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/users",
        None,
        Some(json!({
            "email": email,
            "username": username,
            "first_name": "Test",
            "last_name": "Cook",
            "password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/token/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");

    (id, body["auth_token"].as_str().unwrap().to_string())
}

fn recipe_body(name: &str, ingredients: Value, tags: Value) -> Value {
    json!({
        "ingredients": ingredients,
        "tags": tags,
        "image": "data:image/png;base64,iVBORw0KGgo=",
        "name": name,
        "text": "Mix and bake.",
        "cooking_time": 30,
    })
}

async fn create_recipe(app: &Router, token: &str, name: &str, ingredients: Value, tags: Value) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/recipes",
        Some(token),
        Some(recipe_body(name, ingredients, tags)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_signup_login_and_profile() {
    let (_state, app) = spawn_app().await;
    let (id, token) = register(&app, "julia@example.com", "julia").await;

    let (status, body) = send(&app, Method::GET, "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_i64(), Some(id));
    assert_eq!(body["email"], "julia@example.com");
    assert_eq!(body["is_subscribed"], false);
    assert!(body.get("password").is_none());

    let (status, body) = send(&app, Method::GET, "/api/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["detail"].is_string());

    // Logging in again hands back the same token
    let (_, again) = send(
        &app,
        Method::POST,
        "/api/auth/token/login",
        None,
        Some(json!({ "email": "julia@example.com", "password": PASSWORD })),
    )
    .await;
    assert_eq!(again["auth_token"], token.as_str());
}

#[tokio::test]
async fn test_signup_rejects_duplicate_email_and_bad_fields() {
    let (_state, app) = spawn_app().await;
    register(&app, "dup@example.com", "first").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users",
        None,
        Some(json!({
            "email": "dup@example.com",
            "username": "second",
            "first_name": "A",
            "last_name": "B",
            "password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["email"].is_array());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users",
        None,
        Some(json!({ "email": "not-an-email", "username": "bad name!", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["email"].is_array());
    assert!(body["username"].is_array());
    assert!(body["first_name"].is_array());
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let (_state, app) = spawn_app().await;
    register(&app, "cook@example.com", "cook").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/token/login",
        None,
        Some(json!({ "email": "cook@example.com", "password": "wrong-password" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["non_field_errors"][0],
        "Unable to log in with provided credentials."
    );
}

#[tokio::test]
async fn test_set_password_and_logout() {
    let (_state, app) = spawn_app().await;
    let (_, token) = register(&app, "pw@example.com", "pw").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/users/set_password",
        Some(&token),
        Some(json!({ "current_password": "nope-nope", "new_password": "another-long-one" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/users/set_password",
        Some(&token),
        Some(json!({ "current_password": PASSWORD, "new_password": "another-long-one" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::POST, "/api/auth/token/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The deleted token no longer authenticates anything
    let (status, body) = send(&app, Method::GET, "/api/recipes", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid token.");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/token/login",
        None,
        Some(json!({ "email": "pw@example.com", "password": "another-long-one" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(body["auth_token"], token.as_str());
}

#[tokio::test]
async fn test_recipe_lifecycle() {
    let (_state, app) = spawn_app().await;
    let (author_id, token) = register(&app, "author@example.com", "author").await;

    let id = create_recipe(
        &app,
        &token,
        "Pancakes",
        json!([{ "id": 2, "amount": 200 }, { "id": 3, "amount": 300 }]),
        json!([1]),
    )
    .await;

    // Anonymous readers see the recipe with both flags off
    let (status, body) = send(&app, Method::GET, &format!("/api/recipes/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Pancakes");
    assert_eq!(body["author"]["id"].as_i64(), Some(author_id));
    assert_eq!(body["tags"][0]["slug"], "breakfast");
    assert_eq!(body["ingredients"].as_array().unwrap().len(), 2);
    assert_eq!(body["ingredients"][0]["measurement_unit"], "g");
    assert_eq!(body["is_favorited"], false);
    assert_eq!(body["is_in_shopping_cart"], false);

    // PATCH replaces the composition wholesale
    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/recipes/{id}"),
        Some(&token),
        Some(json!({ "ingredients": [{ "id": 1, "amount": 5 }], "tags": [2] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["ingredients"].as_array().unwrap().len(), 1);
    assert_eq!(body["ingredients"][0]["name"], "sugar");
    assert_eq!(body["tags"][0]["slug"], "dinner");
    assert_eq!(body["name"], "Pancakes");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/recipes/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &format!("/api/recipes/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recipe_validation() {
    let (_state, app) = spawn_app().await;
    let (_, token) = register(&app, "v@example.com", "validator").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/recipes",
        Some(&token),
        Some(recipe_body(
            "Twice sugar",
            json!([{ "id": 1, "amount": 1 }, { "id": 1, "amount": 2 }]),
            json!([1]),
        )),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["ingredients"].is_array());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/recipes",
        Some(&token),
        Some(recipe_body("No tags", json!([{ "id": 1, "amount": 1 }]), json!([]))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["tags"].is_array());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/recipes",
        Some(&token),
        Some(recipe_body("Ghost", json!([{ "id": 999, "amount": 1 }]), json!([1]))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["ingredients"].is_array());

    let mut zero_time = recipe_body("Instant", json!([{ "id": 1, "amount": 1 }]), json!([1]));
    zero_time["cooking_time"] = json!(0);
    let (status, body) = send(&app, Method::POST, "/api/recipes", Some(&token), Some(zero_time)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["cooking_time"].is_array());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/recipes",
        None,
        Some(recipe_body("Anon", json!([{ "id": 1, "amount": 1 }]), json!([1]))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_only_author_can_modify_recipe() {
    let (_state, app) = spawn_app().await;
    let (_, owner) = register(&app, "owner@example.com", "owner").await;
    let (_, other) = register(&app, "other@example.com", "other").await;

    let id = create_recipe(&app, &owner, "Soup", json!([{ "id": 3, "amount": 1 }]), json!([2])).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/recipes/{id}"),
        Some(&other),
        Some(json!({ "name": "Stolen soup" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["detail"].is_string());

    let (status, _) = send(&app, Method::DELETE, &format!("/api/recipes/{id}"), Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Ownership is checked before the payload
    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/api/recipes/{id}"),
        Some(&other),
        Some(json!({ "cooking_time": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/recipes/9999",
        Some(&other),
        Some(json!({ "cooking_time": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorites_and_membership_errors() {
    let (_state, app) = spawn_app().await;
    let (_, author) = register(&app, "a@example.com", "a").await;
    let (_, fan) = register(&app, "fan@example.com", "fan").await;

    let id = create_recipe(&app, &author, "Toast", json!([{ "id": 2, "amount": 50 }]), json!([1])).await;
    let uri = format!("/api/recipes/{id}/favorite");

    let (status, body) = send(&app, Method::POST, &uri, Some(&fan), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"].as_i64(), Some(id));
    assert_eq!(body["name"], "Toast");
    assert_eq!(body["cooking_time"], 30);

    let (status, body) = send(&app, Method::POST, &uri, Some(&fan), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"].is_string());

    let (status, body) = send(&app, Method::GET, &format!("/api/recipes/{id}"), Some(&fan), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_favorited"], true);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&fan), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&fan), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"].is_string());

    let (status, _) = send(&app, Method::POST, "/api/recipes/4242/favorite", Some(&fan), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::POST, &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_shopping_cart_download_aggregates_amounts() {
    let (_state, app) = spawn_app().await;
    let (_, token) = register(&app, "shop@example.com", "shopper").await;

    let first = create_recipe(
        &app,
        &token,
        "Cake",
        json!([{ "id": 1, "amount": 100 }, { "id": 2, "amount": 300 }]),
        json!([1]),
    )
    .await;
    let second = create_recipe(&app, &token, "Jam", json!([{ "id": 1, "amount": 150 }]), json!([2])).await;

    for id in [first, second] {
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/recipes/{id}/shopping_cart"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/recipes/download_shopping_cart")
                .header(header::AUTHORIZATION, format!("Token {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        mime::TEXT_PLAIN_UTF_8.as_ref()
    );
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("shopping_cart.txt"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "--- Shopping list ---");
    assert!(lines.contains(&"sugar 250 g"), "{text}");
    assert!(lines.contains(&"flour 300 g"), "{text}");
    assert_eq!(lines.len(), 3);
}

#[tokio::test]
async fn test_shopping_cart_download_requires_auth() {
    let (_state, app) = spawn_app().await;

    let (status, body) = send(&app, Method::GET, "/api/recipes/download_shopping_cart", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_deleting_recipe_clears_favorites_and_cart() {
    let (_state, app) = spawn_app().await;
    let (_, author) = register(&app, "baker@example.com", "baker").await;
    let (_, reader) = register(&app, "fan@example.com", "fan").await;

    let id = create_recipe(&app, &author, "Bread", json!([{ "id": 2, "amount": 500 }]), json!([1])).await;

    for token in [&author, &reader] {
        for set in ["favorite", "shopping_cart"] {
            let (status, _) = send(
                &app,
                Method::POST,
                &format!("/api/recipes/{id}/{set}"),
                Some(token),
                None,
            )
            .await;
            assert_eq!(status, StatusCode::CREATED, "{set}");
        }
    }

    let (status, _) = send(&app, Method::DELETE, &format!("/api/recipes/{id}"), Some(&author), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for token in [&author, &reader] {
        let (_, body) = send(&app, Method::GET, "/api/recipes?is_favorited=1", Some(token), None).await;
        assert_eq!(body["count"], 0);

        let (_, body) = send(&app, Method::GET, "/api/recipes?is_in_shopping_cart=1", Some(token), None).await;
        assert_eq!(body["count"], 0);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/recipes/download_shopping_cart")
                    .header(header::AUTHORIZATION, format!("Token {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(text.lines().collect::<Vec<_>>(), vec!["--- Shopping list ---"]);
    }

    // Membership of a deleted recipe reads as missing, not as a stale entry
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/recipes/{id}/favorite"),
        Some(&reader),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_subscriptions() {
    let (_state, app) = spawn_app().await;
    let (author_id, author) = register(&app, "chef@example.com", "chef").await;
    let (_, follower) = register(&app, "follower@example.com", "follower").await;

    for name in ["One", "Two", "Three"] {
        create_recipe(&app, &author, name, json!([{ "id": 1, "amount": 1 }]), json!([1])).await;
    }

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/users/{author_id}/subscribe"),
        Some(&author),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"].is_string());

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/users/{author_id}/subscribe?recipes_limit=2"),
        Some(&follower),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["id"].as_i64(), Some(author_id));
    assert_eq!(body["is_subscribed"], true);
    assert_eq!(body["recipes_count"], 3);
    assert_eq!(body["recipes"].as_array().unwrap().len(), 2);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/users/{author_id}/subscribe"),
        Some(&follower),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/api/users/subscriptions", Some(&follower), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["username"], "chef");
    assert_eq!(body["results"][0]["recipes"].as_array().unwrap().len(), 3);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/users/{author_id}"),
        Some(&follower),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_subscribed"], true);

    let uri = format!("/api/users/{author_id}/subscribe");
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&follower), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&follower), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"].is_string());

    let (status, _) = send(&app, Method::POST, "/api/users/9999/subscribe", Some(&follower), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recipe_list_filters() {
    let (_state, app) = spawn_app().await;
    let (author_id, author) = register(&app, "list@example.com", "lister").await;
    let (_, reader) = register(&app, "reader@example.com", "reader").await;

    let breakfast = create_recipe(&app, &author, "Porridge", json!([{ "id": 3, "amount": 200 }]), json!([1])).await;
    let dinner = create_recipe(&app, &author, "Stew", json!([{ "id": 2, "amount": 10 }]), json!([2])).await;

    let (status, body) = send(&app, Method::GET, "/api/recipes?tags=breakfast", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["id"].as_i64(), Some(breakfast));

    let (_, body) = send(&app, Method::GET, "/api/recipes?tags=breakfast&tags=dinner", None, None).await;
    assert_eq!(body["count"], 2);
    // Newest first
    assert_eq!(body["results"][0]["id"].as_i64(), Some(dinner));

    let (_, body) = send(&app, Method::GET, &format!("/api/recipes?author={author_id}"), None, None).await;
    assert_eq!(body["count"], 2);

    send(&app, Method::POST, &format!("/api/recipes/{dinner}/favorite"), Some(&reader), None).await;

    let (_, body) = send(&app, Method::GET, "/api/recipes?is_favorited=1", Some(&reader), None).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["id"].as_i64(), Some(dinner));
    assert_eq!(body["results"][0]["is_favorited"], true);

    let (status, body) = send(&app, Method::GET, "/api/recipes?is_favorited=1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["results"].as_array().unwrap().len(), 0);

    let (_, body) = send(&app, Method::GET, "/api/recipes?is_in_shopping_cart=1", Some(&reader), None).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_recipe_pagination() {
    let (_state, app) = spawn_app().await;
    let (_, token) = register(&app, "pages@example.com", "pager").await;

    for i in 0..5 {
        create_recipe(&app, &token, &format!("Dish {i}"), json!([{ "id": 1, "amount": 1 }]), json!([1])).await;
    }

    let (status, body) = send(&app, Method::GET, "/api/recipes?limit=2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 5);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(body["next"], "/api/recipes?limit=2&page=2");
    assert!(body["previous"].is_null());

    let (_, body) = send(&app, Method::GET, "/api/recipes?limit=2&page=3", None, None).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert!(body["next"].is_null());
    assert_eq!(body["previous"], "/api/recipes?limit=2&page=2");

    let (status, body) = send(&app, Method::GET, "/api/recipes?limit=2&page=4", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Invalid page.");

    let (status, _) = send(&app, Method::GET, "/api/recipes?page=zero", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let (_state, app) = spawn_app().await;

    let (status, body) = send(&app, Method::GET, "/api/tags", Some("deadbeef"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid token.");

    // Unknown schemes are treated as anonymous
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/tags")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
