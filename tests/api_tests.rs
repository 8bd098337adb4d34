use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use trendarr::config::Config;

fn spawn_app() -> Router {
    let mut config = Config::default();
    config.cache.enabled = false;

    let state = trendarr::api::create_app_state(config).expect("Failed to create app state");
    trendarr::api::router(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_options_returns_no_content() {
    let app = spawn_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/search")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_other_methods_are_rejected() {
    let app = spawn_app();

    for method in [Method::POST, Method::PUT, Method::DELETE] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/search")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Method not allowed");
    }
}

#[tokio::test]
async fn test_missing_keywords_is_rejected() {
    let app = spawn_app();

    let response = app
        .oneshot(Request::builder().uri("/search").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "keywords required");
}

#[tokio::test]
async fn test_invalid_hours_is_rejected() {
    let app = spawn_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/search?keywords=ai&hours=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "hours must be one of 1,3,6,12,24");
}

#[tokio::test]
async fn test_missing_credential_is_unauthorized() {
    let app = spawn_app();

    // No Authorization header at all.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/search?keywords=ai&hours=6")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Wrong scheme.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/search?keywords=ai&hours=6")
                .header(header::AUTHORIZATION, "Token abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing Authorization header: Bearer <token>");
}

#[tokio::test]
async fn test_separator_only_keywords_are_rejected() {
    let app = spawn_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/search?keywords=%20,%20,&hours=6")
                .header(header::AUTHORIZATION, "Bearer abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "No valid keywords");
}

#[tokio::test]
async fn test_cors_headers_on_every_response() {
    let app = spawn_app();

    let response = app
        .oneshot(Request::builder().uri("/search").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_system_status() {
    let app = spawn_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/system/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
