use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`
use user_service::infrastructure::AppState;
use user_service::models::{follower_relation, settings};
use user_service::{db, server};

const TEST_SECRET: &str = "integration-test-secret";

// Helper to build the full app on an in-memory database
async fn setup_app() -> (Router, AppState) {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let state = AppState::new(db, TEST_SECRET);
    let app = server::build_router(state.clone(), &[]);
    (app, state)
}

fn token_for(state: &AppState, user_id: i32) -> String {
    state
        .jwt
        .create_jwt(user_id, chrono::Duration::hours(1))
        .expect("Failed to create JWT")
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
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
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
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn create_user(app: &Router, username: &str) -> i32 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/user/",
        None,
        Some(json!({ "username": username, "bio": format!("{} bio", username) })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create {} failed: {}", username, body);
    body["id"].as_i64().unwrap() as i32
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup_app().await;

    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "user-service");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn test_user_create_get_update_flow() {
    let (app, state) = setup_app().await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/v1/user/",
        None,
        Some(json!({ "username": "alice", "bio": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["username"], "alice");
    assert_eq!(created["bio"], "hello");
    assert_eq!(created["avatar_url"], "");
    assert_eq!(created["followers_count"], 0);
    assert_eq!(created["following_count"], 0);

    let id = created["id"].as_i64().unwrap() as i32;
    let uri = format!("/api/v1/user/{}", id);

    let (status, fetched) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let token = token_for(&state, id);
    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "username": "alice2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["username"], "alice2");
    assert_eq!(updated["bio"], "hello");

    // Empty values leave fields untouched
    let (status, unchanged) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "username": "", "bio": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged, updated);

    let (_, fetched) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(fetched["username"], "alice2");
}

#[tokio::test]
async fn test_create_user_without_trailing_slash() {
    let (app, _) = setup_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/user",
        None,
        Some(json!({ "username": "bob" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["bio"], "");
}

#[tokio::test]
async fn test_list_users_pagination() {
    let (app, _) = setup_app().await;
    for name in ["user1", "user2", "user3", "user4", "user5"] {
        create_user(&app, name).await;
    }

    let (status, page1) = send(
        &app,
        Method::GET,
        "/api/v1/user/?page=1&page_size=2",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page1["total"], 5);
    assert_eq!(page1["page"], 1);
    assert_eq!(page1["size"], 2);
    let names: Vec<&str> = page1["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["user1", "user2"]);

    let (_, page3) = send(
        &app,
        Method::GET,
        "/api/v1/user/?page=3&page_size=2",
        None,
        None,
    )
    .await;
    assert_eq!(page3["users"].as_array().unwrap().len(), 1);
    assert_eq!(page3["users"][0]["username"], "user5");

    let (_, beyond) = send(
        &app,
        Method::GET,
        "/api/v1/user/?page=9&page_size=2",
        None,
        None,
    )
    .await;
    assert!(beyond["users"].as_array().unwrap().is_empty());
    assert_eq!(beyond["total"], 5);

    // Defaults: page 1, size 10
    let (_, defaults) = send(&app, Method::GET, "/api/v1/user/", None, None).await;
    assert_eq!(defaults["size"], 10);
    assert_eq!(defaults["users"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_follow_flow_with_private_account() {
    let (app, state) = setup_app().await;
    let alice = create_user(&app, "alice").await;
    let bob = create_user(&app, "bob").await;
    let carol = create_user(&app, "carol").await;

    let alice_token = token_for(&state, alice);
    let bob_token = token_for(&state, bob);
    let carol_token = token_for(&state, carol);

    // Public account: approved immediately
    let (status, relation) = send(
        &app,
        Method::POST,
        &format!("/api/v1/user/{}/followers", alice),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(relation["status"], "approved");
    assert_eq!(relation["user_id"], alice);
    assert_eq!(relation["follower_id"], bob);

    let (_, alice_profile) = send(
        &app,
        Method::GET,
        &format!("/api/v1/user/{}", alice),
        None,
        None,
    )
    .await;
    assert_eq!(alice_profile["followers_count"], 1);

    // Switch alice to private
    let (status, alice_settings) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/user/{}/settings", alice),
        Some(&alice_token),
        Some(json!({ "is_private": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(alice_settings["is_private"], true);
    assert_eq!(alice_settings["language"], "en");

    let (status, pending) = send(
        &app,
        Method::POST,
        &format!("/api/v1/user/{}/followers", alice),
        Some(&carol_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(pending["status"], "pending");
    let relation_id = pending["id"].as_i64().unwrap();

    let (_, pending_list) = send(
        &app,
        Method::GET,
        &format!("/api/v1/user/{}/followers?status=pending", alice),
        None,
        None,
    )
    .await;
    assert_eq!(pending_list["total"], 1);
    assert_eq!(pending_list["relations"][0]["follower_id"], carol);

    // Only the followed user may approve
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/relations/{}", relation_id),
        Some(&carol_token),
        Some(json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, approved) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/relations/{}", relation_id),
        Some(&alice_token),
        Some(json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "approved");

    let (_, alice_profile) = send(
        &app,
        Method::GET,
        &format!("/api/v1/user/{}", alice),
        None,
        None,
    )
    .await;
    assert_eq!(alice_profile["followers_count"], 2);

    let (_, carol_following) = send(
        &app,
        Method::GET,
        &format!("/api/v1/user/{}/following", carol),
        None,
        None,
    )
    .await;
    assert_eq!(carol_following["total"], 1);
    assert_eq!(carol_following["relations"][0]["user_id"], alice);

    let (_, carol_profile) = send(
        &app,
        Method::GET,
        &format!("/api/v1/user/{}", carol),
        None,
        None,
    )
    .await;
    assert_eq!(carol_profile["following_count"], 1);

    // The follower unfollows
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/relations/{}", relation_id),
        Some(&carol_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/relations/{}", relation_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, alice_profile) = send(
        &app,
        Method::GET,
        &format!("/api/v1/user/{}", alice),
        None,
        None,
    )
    .await;
    assert_eq!(alice_profile["followers_count"], 1);
}

#[tokio::test]
async fn test_blocked_follower_cannot_remove_relation() {
    let (app, state) = setup_app().await;
    let alice = create_user(&app, "alice").await;
    let bob = create_user(&app, "bob").await;

    let (_, relation) = send(
        &app,
        Method::POST,
        &format!("/api/v1/user/{}/followers", alice),
        Some(&token_for(&state, bob)),
        None,
    )
    .await;
    let uri = format!("/api/v1/relations/{}", relation["id"]);

    let (status, blocked) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token_for(&state, alice)),
        Some(json!({ "status": "blocked" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(blocked["status"], "blocked");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token_for(&state, bob)), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, alice_profile) = send(
        &app,
        Method::GET,
        &format!("/api/v1/user/{}", alice),
        None,
        None,
    )
    .await;
    assert_eq!(alice_profile["followers_count"], 0);
}

#[tokio::test]
async fn test_settings_are_private_to_owner() {
    let (app, state) = setup_app().await;
    let alice = create_user(&app, "alice").await;
    let bob = create_user(&app, "bob").await;
    let uri = format!("/api/v1/user/{}/settings", alice);

    let (status, defaults) = send(&app, Method::GET, &uri, Some(&token_for(&state, alice)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(defaults["is_private"], false);
    assert_eq!(defaults["dark_mode"], false);
    assert_eq!(defaults["language"], "en");

    let (status, _) = send(&app, Method::GET, &uri, Some(&token_for(&state, bob)), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token_for(&state, alice)),
        Some(json!({ "dark_mode": true, "language": "pt-BR" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["dark_mode"], true);
    assert_eq!(updated["language"], "pt-BR");
    assert_eq!(updated["is_private"], false);
}

#[tokio::test]
async fn test_delete_user_removes_owned_rows() {
    let (app, state) = setup_app().await;
    let alice = create_user(&app, "alice").await;
    let bob = create_user(&app, "bob").await;

    send(
        &app,
        Method::POST,
        &format!("/api/v1/user/{}/followers", alice),
        Some(&token_for(&state, bob)),
        None,
    )
    .await;
    send(
        &app,
        Method::POST,
        &format!("/api/v1/user/{}/followers", bob),
        Some(&token_for(&state, alice)),
        None,
    )
    .await;

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/user/{}", alice),
        Some(&token_for(&state, alice)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/user/{}", alice),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, bob_profile) = send(
        &app,
        Method::GET,
        &format!("/api/v1/user/{}", bob),
        None,
        None,
    )
    .await;
    assert_eq!(bob_profile["followers_count"], 0);
    assert_eq!(bob_profile["following_count"], 0);

    let (_, listing) = send(&app, Method::GET, "/api/v1/user/", None, None).await;
    assert_eq!(listing["total"], 1);

    let orphan_settings = settings::Entity::find()
        .filter(settings::Column::UserId.eq(alice))
        .count(state.db())
        .await
        .unwrap();
    assert_eq!(orphan_settings, 0);

    let orphan_relations = follower_relation::Entity::find()
        .filter(
            follower_relation::Column::UserId
                .eq(alice)
                .or(follower_relation::Column::FollowerId.eq(alice)),
        )
        .count(state.db())
        .await
        .unwrap();
    assert_eq!(orphan_relations, 0);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (app, _) = setup_app().await;

    let (status, doc) = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/v1/user/{id}"].is_object());
    assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
}
