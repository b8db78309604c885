use super::*;
use crate::chat::test_support::setup_chat_db;
use crate::server::AppState;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Create test config
fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret-key-must-be-at-least-32-characters-long!".to_string(),
        jwt_expiration_hours: 24,
    }
}

/// Create test app with auth routes
fn test_app(pool: DbPool, config: Config) -> Router {
    let state = AppState { db: pool, config };

    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .with_state(state)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

// ========== Signup Tests ==========

#[tokio::test]
async fn test_signup_patient_success() {
    let pool = setup_chat_db().await;
    let app = test_app(pool, test_config());

    let response = app
        .oneshot(post_json(
            "/signup",
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "TestPassword123!"
            }),
        ))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["role"], "USER");
    assert_eq!(body["user"]["account_status"], "APPROVED");
    assert_eq!(body["message"], "Signup successful");
    assert!(!body["token"].as_str().unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_signup_dermatologist_is_pending() {
    let pool = setup_chat_db().await;
    let app = test_app(pool, test_config());

    let response = app
        .oneshot(post_json(
            "/signup",
            json!({
                "username": "drsmith",
                "email": "drsmith@example.com",
                "password": "TestPassword123!",
                "role": "DERMATOLOGIST"
            }),
        ))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["user"]["account_status"], "PENDING");
    assert_eq!(
        body["message"],
        "Signup successful, your account is pending approval"
    );
    // No token until an admin approves the account, so the moderation gate
    // cannot be bypassed with signup credentials.
    assert!(body["token"].is_null());
}

#[tokio::test]
async fn test_signup_admin_role_rejected() {
    let pool = setup_chat_db().await;
    let app = test_app(pool, test_config());

    let response = app
        .oneshot(post_json(
            "/signup",
            json!({
                "username": "wannabe",
                "email": "wannabe@example.com",
                "password": "TestPassword123!",
                "role": "ADMIN"
            }),
        ))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid role");
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let pool = setup_chat_db().await;
    let app = test_app(pool.clone(), test_config());

    let first = app
        .clone()
        .oneshot(post_json(
            "/signup",
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "TestPassword123!"
            }),
        ))
        .await
        .expect("request should succeed");
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(post_json(
            "/signup",
            json!({
                "username": "alice2",
                "email": "alice@example.com",
                "password": "TestPassword123!"
            }),
        ))
        .await
        .expect("request should succeed");

    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = body_json(second).await;
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test]
async fn test_signup_username_too_short() {
    let pool = setup_chat_db().await;
    let app = test_app(pool, test_config());

    let response = app
        .oneshot(post_json(
            "/signup",
            json!({
                "username": "ab",
                "email": "ab@example.com",
                "password": "TestPassword123!"
            }),
        ))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Username must be at least 3 characters");
}

// ========== Login Tests ==========

#[tokio::test]
async fn test_signup_then_login_with_username() {
    let pool = setup_chat_db().await;
    let app = test_app(pool, test_config());

    let signup = app
        .clone()
        .oneshot(post_json(
            "/signup",
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "TestPassword123!"
            }),
        ))
        .await
        .expect("request should succeed");
    assert_eq!(signup.status(), StatusCode::CREATED);

    let login = app
        .oneshot(post_json(
            "/login",
            json!({
                "username": "alice",
                "password": "TestPassword123!"
            }),
        ))
        .await
        .expect("request should succeed");

    assert_eq!(login.status(), StatusCode::OK);
    let body = body_json(login).await;
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["username"], "alice");

    // Token must decode and carry the role.
    let token = body["token"].as_str().expect("token should be a string");
    let claims =
        lib_auth::decode_jwt(token, &test_config().jwt_secret).expect("token should decode");
    assert_eq!(claims.role, "USER");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let pool = setup_chat_db().await;
    let app = test_app(pool, test_config());

    app.clone()
        .oneshot(post_json(
            "/signup",
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "TestPassword123!"
            }),
        ))
        .await
        .expect("request should succeed");

    let login = app
        .oneshot(post_json(
            "/login",
            json!({
                "username": "alice",
                "password": "WrongPassword123!"
            }),
        ))
        .await
        .expect("request should succeed");

    assert_eq!(login.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(login).await;
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_pending_dermatologist_forbidden() {
    let pool = setup_chat_db().await;
    let app = test_app(pool, test_config());

    app.clone()
        .oneshot(post_json(
            "/signup",
            json!({
                "username": "drsmith",
                "email": "drsmith@example.com",
                "password": "TestPassword123!",
                "role": "DERMATOLOGIST"
            }),
        ))
        .await
        .expect("request should succeed");

    let login = app
        .oneshot(post_json(
            "/login",
            json!({
                "username": "drsmith",
                "password": "TestPassword123!"
            }),
        ))
        .await
        .expect("request should succeed");

    assert_eq!(login.status(), StatusCode::FORBIDDEN);
    let body = body_json(login).await;
    assert_eq!(body["error"], "Account is pending approval");
}
