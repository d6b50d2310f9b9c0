use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uniauth::config::Config;
use uniauth::state::SharedState;

async fn spawn_app() -> (Router, Arc<SharedState>) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // In-memory sqlite gives each connection its own database
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;

    let shared = Arc::new(
        SharedState::new(config)
            .await
            .expect("Failed to create shared state"),
    );
    let state = uniauth::api::create_app_state(shared.clone(), None);
    (uniauth::api::router(state).await, shared)
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_enrollment_proxy() {
    let (app, _) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/enrollment/students")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"].as_array().unwrap().len(), 4);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/enrollment/students/2024-00001")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Juan Dela Cruz");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/enrollment/students/2024-99999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Student not found in Enrollment system");
}

#[tokio::test]
async fn test_generate_password_lifecycle() {
    let (app, _) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/password/generate",
            &serde_json::json!({ "student_id": "2024-00001" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Password generated successfully");
    assert_eq!(json["data"]["student_name"], "Juan Dela Cruz");

    let password = json["data"]["generated_password"].as_str().unwrap();
    assert_eq!(password.len(), 12);
    assert!(password.starts_with("0001"));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth/password/status/2024-00001")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["password_generated"], true);
    assert!(json["data"]["generated_at"].is_string());

    // Regeneration is refused once a credential exists
    let response = app
        .oneshot(post_json(
            "/auth/password/generate",
            &serde_json::json!({ "student_id": "2024-00001" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Password already generated for this student");
}

#[tokio::test]
async fn test_generate_password_rejections() {
    let (app, _) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(post_json("/auth/password/generate", &serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Student ID is required");

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/password/generate",
            &serde_json::json!({ "student_id": "2024-99999" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Student not found in Enrollment system");

    let response = app
        .oneshot(post_json(
            "/auth/password/generate",
            &serde_json::json!({ "student_id": "2024-00003" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Student account is inactive");
}

#[tokio::test]
async fn test_password_status_without_credential() {
    let (app, _) = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/password/status/2024-00002")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["password_generated"], false);
    assert!(json["data"]["generated_at"].is_null());
}

#[tokio::test]
async fn test_login_rejections() {
    let (app, _) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            &serde_json::json!({ "student_id": "2024-00001" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Student ID and password are required");

    // Unknown student gets the vague message
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            &serde_json::json!({ "student_id": "2024-99999", "password": "whatever" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid credentials");

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            &serde_json::json!({ "student_id": "2024-00003", "password": "whatever" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "Account is inactive. Please contact administrator."
    );

    // The refusal still lands in the activity log
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth/login-activity/2024-00003")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"]["activity"][0]["status"], "failed");
    assert_eq!(json["data"]["activity"][0]["reason"], "Account inactive");

    // Active student who never had a password generated
    let response = app
        .oneshot(post_json(
            "/auth/login",
            &serde_json::json!({ "student_id": "2024-00002", "password": "whatever" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "No password generated for this student. Please contact administrator."
    );
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let (app, _) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth/login/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Access denied. No token provided.");

    // A token with no session row fails the registry check
    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/login/status")
                .header("Authorization", "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired session.");
}

#[tokio::test]
async fn test_manual_activity_log() {
    let (app, _) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login-activity/log",
            &serde_json::json!({ "student_id": "2024-00001" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Student ID and status are required");

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login-activity/log",
            &serde_json::json!({
                "student_id": "2024-00001",
                "status": "success",
                "ip_address": "10.0.0.5",
                "device_type": "integration-test"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Login activity logged successfully");
    assert_eq!(json["data"]["reason"], "Login successful");
    assert_eq!(json["data"]["ip_address"], "10.0.0.5");
    assert_eq!(json["data"]["device_type"], "integration-test");
    assert!(json["data"]["id"].is_string());
    assert!(json["data"]["timestamp"].is_string());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth/login-activity/2024-00001")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_records"], 1);
    assert_eq!(json["data"]["activity"][0]["status"], "success");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/login-activity")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "All login activity records");
    assert_eq!(json["data"]["total_records"], 1);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["database"], true);
    assert!(json["data"]["uptime_seconds"].is_number());
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _) = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // No recorder installed in tests; the endpoint still responds
    assert_eq!(response.status(), StatusCode::OK);
}
