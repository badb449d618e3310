use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use lspd_portal::{
    AppConfig, AppState, create_router,
    repository::{InMemoryRepository, RepositoryState},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let repo = Arc::new(InMemoryRepository::new()) as RepositoryState;
    create_router(AppState {
        repo,
        config: AppConfig::default(),
    })
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/register")
                .header(header::ORIGIN, "https://lspd.example.org")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-123");
}

#[tokio::test]
async fn test_unsupported_method_on_content() {
    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::PATCH)
                .uri("/content?type=news")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_settings_put_then_get() {
    let app = app();
    let settings = json!({
        "hero_title": "LSPD",
        "hero_subtitle": "",
        "about_mission": "Serve",
        "about_history": ""
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::PUT)
                .uri("/content?type=settings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(settings.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/content?type=settings")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(json_body(response).await, settings);
}

#[tokio::test]
async fn test_put_on_collection_is_rejected() {
    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::PUT)
                .uri("/content?type=gallery")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({ "error": "Invalid content type" }));
}

#[tokio::test]
async fn test_malformed_body_gets_error_envelope() {
    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"first_name\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn test_missing_content_type_gets_error_envelope() {
    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/content?type=news")
                .body(Body::from("{\"title\": \"x\"}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn test_mistyped_field_gets_error_envelope() {
    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::PUT)
                .uri("/register?id=1")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"is_admin\": \"yes\"}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"].is_string());
}
