// End-to-end auth flows driven through the real router.
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;

use notekeep::{config::Settings, routes::create_router, store::MemStore, AppState};

fn test_app() -> Router {
    let settings = Settings {
        jwt_secret: "integration-test-secret".to_string(),
        ..Settings::default()
    };
    let store = Arc::new(MemStore::new());
    create_router(Arc::new(AppState::new(store, settings)))
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn alice() -> serde_json::Value {
    serde_json::json!({
        "username": "alice",
        "email": "a@x.com",
        "password": "Abc123!@"
    })
}

async fn register(app: &Router, body: serde_json::Value) -> axum::response::Response {
    app.clone()
        .oneshot(json_request("POST", "/api/users", body))
        .await
        .unwrap()
}

/// Returns (access token, refresh cookie) from a successful login.
async fn login(app: &Router, email: &str, password: &str) -> (String, String) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            serde_json::json!({ "email": email, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let body = body_json(response).await;
    (body["accessToken"].as_str().unwrap().to_string(), cookie)
}

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_registration_projection_excludes_secrets() {
    let app = test_app();
    let response = register(&app, alice()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    let obj = body.as_object().unwrap();
    assert_eq!(obj["username"], "alice");
    assert_eq!(obj["email"], "a@x.com");
    assert!(obj.contains_key("id"));
    assert!(obj.contains_key("createdAt"));
    assert!(obj.contains_key("updatedAt"));
    assert!(!obj.contains_key("password"));
    assert!(!obj.contains_key("passwordHash"));
    assert!(!obj.contains_key("refreshToken"));
}

#[tokio::test]
async fn test_registration_validation() {
    let app = test_app();

    let mut bad_username = alice();
    bad_username["username"] = "a".into();
    assert_eq!(
        register(&app, bad_username).await.status(),
        StatusCode::BAD_REQUEST
    );

    let mut bad_email = alice();
    bad_email["email"] = "not-an-email".into();
    assert_eq!(
        register(&app, bad_email).await.status(),
        StatusCode::BAD_REQUEST
    );

    // Password missing a special character
    let mut bad_password = alice();
    bad_password["password"] = "Abc12345".into();
    assert_eq!(
        register(&app, bad_password).await.status(),
        StatusCode::BAD_REQUEST
    );

    // A missing field is a schema violation and takes the same 400 exit.
    let mut missing_password = alice();
    missing_password.as_object_mut().unwrap().remove("password");
    assert_eq!(
        register(&app, missing_password).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = test_app();
    assert_eq!(register(&app, alice()).await.status(), StatusCode::CREATED);

    let mut second = alice();
    second["username"] = "alice2".into();
    let response = register(&app, second).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_sets_refresh_cookie() {
    let app = test_app();
    register(&app, alice()).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            serde_json::json!({ "email": "a@x.com", "password": "Abc123!@" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("refreshToken="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Secure"));
    assert!(set_cookie.contains("SameSite=None"));
    assert!(set_cookie.contains("Max-Age=86400"));

    // Body carries the access token and nothing else.
    let body = body_json(response).await;
    let obj = body.as_object().unwrap();
    assert_eq!(obj.len(), 1);
    assert!(obj.contains_key("accessToken"));
}

#[tokio::test]
async fn test_invalid_credentials_are_indistinguishable() {
    let app = test_app();
    register(&app, alice()).await;

    let unknown_email = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            serde_json::json!({ "email": "nobody@x.com", "password": "Abc123!@" }),
        ))
        .await
        .unwrap();
    let wrong_password = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            serde_json::json!({ "email": "a@x.com", "password": "Wrong12!" }),
        ))
        .await
        .unwrap();

    assert_eq!(unknown_email.status(), StatusCode::FORBIDDEN);
    assert_eq!(wrong_password.status(), StatusCode::FORBIDDEN);

    // Identical bodies: no account enumeration.
    let a = body_json(unknown_email).await;
    let b = body_json(wrong_password).await;
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_refresh_returns_new_access_token() {
    let app = test_app();
    register(&app, alice()).await;
    let (_, cookie) = login(&app, "a@x.com", "Abc123!@").await;

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/users/refresh")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["accessToken"].as_str().is_some());
}

#[tokio::test]
async fn test_refresh_without_cookie_is_forbidden() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::get("/api/users/refresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_second_login_invalidates_first_refresh_token() {
    let app = test_app();
    register(&app, alice()).await;

    let (_, first_cookie) = login(&app, "a@x.com", "Abc123!@").await;
    let (_, _second_cookie) = login(&app, "a@x.com", "Abc123!@").await;

    // The rotated-out token no longer refreshes.
    let response = app
        .clone()
        .oneshot(
            Request::get("/api/users/refresh")
                .header(header::COOKIE, &first_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_logout_clears_cookie_and_invalidates_token() {
    let app = test_app();
    register(&app, alice()).await;
    let (_, cookie) = login(&app, "a@x.com", "Abc123!@").await;

    let response = app
        .clone()
        .oneshot(
            Request::post("/api/users/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("Max-Age=0"));

    // The server-side token is gone; refresh now fails.
    let response = app
        .clone()
        .oneshot(
            Request::get("/api/users/refresh")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_logout_without_cookie_is_a_noop() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::post("/api/users/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    // The cookie is still cleared so stale client state cannot linger.
    assert!(response.headers().get(header::SET_COOKIE).is_some());
}
