use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use portrait::Config;
use std::sync::Arc;
use tower::ServiceExt;

/// Default credentials seeded by the initial migration
const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin123";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.auth.secret_key = "integration-test-secret-32-chars".to_string();

    let state = portrait::SharedState::new(config)
        .await
        .expect("Failed to create app state");
    portrait::api::router(Arc::new(state))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn authed_request(method: &str, uri: &str, token: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"));

    match body {
        Some(json) => builder
            .header("Content-Type", mime::APPLICATION_JSON.as_ref())
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/auth/login",
            serde_json::json!({"username": username, "password": password}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    body["data"]["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_login_success_shape() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/auth/login",
            serde_json::json!({"username": ADMIN_USERNAME, "password": ADMIN_PASSWORD}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["code"], 200);
    assert_eq!(body["msg"], "登录成功");
    assert_eq!(body["data"]["username"], ADMIN_USERNAME);
    assert!(!body["data"]["access_token"].as_str().unwrap().is_empty());
    assert_eq!(body["data"]["refresh_token"], "");
}

#[tokio::test]
async fn test_login_empty_credentials_code_601() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/auth/login",
            serde_json::json!({"username": "", "password": ""}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], 601);
}

#[tokio::test]
async fn test_login_wrong_password_code_602() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/auth/login",
            serde_json::json!({"username": ADMIN_USERNAME, "password": "wrong"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["code"], 602);
    assert_eq!(body["message"], "没有找到用户信息");
}

#[tokio::test]
async fn test_protected_routes_require_bearer_token() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/user/all")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], 603);

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/v1/user/all", "garbage-token", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let response = app
        .clone()
        .oneshot(authed_request("GET", "/v1/user/all", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_token_is_reusable_across_requests() {
    let app = spawn_app().await;
    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(authed_request("GET", "/v1/user/all", &token, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_user_crud_flow() {
    let app = spawn_app().await;
    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    // create alice
    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/v1/user/add",
            &token,
            Some(serde_json::json!({
                "name": "Alice",
                "username": "alice",
                "password": "Secr3t!",
                "department": "研发部",
                "rank": 5
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["status"], 1);
    assert_eq!(body["data"]["create_by"], ADMIN_USERNAME);
    assert!(body["data"].get("password").is_none());
    let alice_id = body["data"]["id"].as_i64().unwrap();

    // alice can log in with her own credentials
    let alice_token = login(&app, "alice", "Secr3t!").await;
    assert!(!alice_token.is_empty());

    // fetch by id
    let response = app
        .clone()
        .oneshot(authed_request(
            "GET",
            &format!("/v1/user/info/{alice_id}"),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["department"], "研发部");

    // patch department only
    let response = app
        .clone()
        .oneshot(authed_request(
            "PUT",
            &format!("/v1/user/update/{alice_id}"),
            &token,
            Some(serde_json::json!({"department": "市场部"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["department"], "市场部");
    assert_eq!(body["data"]["username"], "alice");

    // delete, then the record is gone
    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/v1/user/del/{alice_id}"),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed_request(
            "GET",
            &format!("/v1/user/info/{alice_id}"),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_username_code_610() {
    let app = spawn_app().await;
    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let payload = serde_json::json!({
        "name": "Alice",
        "username": "alice",
        "password": "Secr3t!"
    });

    let response = app
        .clone()
        .oneshot(authed_request("POST", "/v1/user/add", &token, Some(payload.clone())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed_request("POST", "/v1/user/add", &token, Some(payload)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], 610);
}

#[tokio::test]
async fn test_field_length_codes() {
    let app = spawn_app().await;
    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let cases = [
        (
            serde_json::json!({"name": "A", "username": "bob", "password": "x", "rank": 1000000}),
            611,
        ),
        (
            serde_json::json!({"name": "N".repeat(21), "username": "bob", "password": "x"}),
            612,
        ),
        (
            serde_json::json!({"name": "A", "username": "u".repeat(21), "password": "x"}),
            613,
        ),
    ];

    for (payload, expected_code) in cases {
        let response = app
            .clone()
            .oneshot(authed_request("POST", "/v1/user/add", &token, Some(payload)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], expected_code);
    }
}

#[tokio::test]
async fn test_role_endpoints() {
    let app = spawn_app().await;
    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/v1/role/add",
            &token,
            Some(serde_json::json!({"role_id": "r-ops", "name": "运维"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // role_id is unique
    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/v1/role/add",
            &token,
            Some(serde_json::json!({"role_id": "r-ops", "name": "运维"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], 620);

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/v1/role/all", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["role_id"], "r-ops");
}

#[tokio::test]
async fn test_demo_endpoints_unavailable_when_vector_disabled() {
    let app = spawn_app().await;
    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/v1/demo/add",
            &token,
            Some(serde_json::json!({"url": "http://example.com"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["code"], 501);
}

#[tokio::test]
async fn test_disabled_account_cannot_login_or_use_token() {
    let app = spawn_app().await;
    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    // create and disable bob
    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/v1/user/add",
            &token,
            Some(serde_json::json!({"name": "Bob", "username": "bob", "password": "hunter2"})),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let bob_id = body["data"]["id"].as_i64().unwrap();

    let bob_token = login(&app, "bob", "hunter2").await;

    let response = app
        .clone()
        .oneshot(authed_request(
            "PUT",
            &format!("/v1/user/update/{bob_id}"),
            &token,
            Some(serde_json::json!({"status": 0})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // a disabled account is filtered out of the login lookup entirely
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/auth/login",
            serde_json::json!({"username": "bob", "password": "hunter2"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], 602);

    // and the previously issued token resolves to an inactive user
    let response = app
        .clone()
        .oneshot(authed_request("GET", "/v1/user/all", &bob_token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], 604);
}
