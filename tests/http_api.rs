//! End-to-end tests through the axum router and the gateway adapter

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use roll_call::domain::{AttendanceRecord, MonthFilter, Student, StudentId, StudentRemoval};
use roll_call::infrastructure::{
    AttendanceRepository, HealthCheck, InMemoryStore, StudentRepository,
};
use roll_call::server::{create_router, AppState};
use roll_call::service::{invoke, GatewayEvent};
use roll_call::{Error, Result};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const BODY_LIMIT: usize = 64 * 1024;

/// Backend whose every call fails the way an unreachable database does
struct UnavailableStore;

#[async_trait]
impl AttendanceRepository for UnavailableStore {
    async fn fetch_attendance(&self, _month: Option<&MonthFilter>) -> Result<Vec<AttendanceRecord>> {
        Err(Error::Database(sqlx::Error::PoolTimedOut))
    }

    async fn upsert_attendance(&self, _record: &AttendanceRecord) -> Result<()> {
        Err(Error::Database(sqlx::Error::PoolTimedOut))
    }
}

#[async_trait]
impl StudentRepository for UnavailableStore {
    async fn list_students(&self) -> Result<Vec<Student>> {
        Err(Error::Database(sqlx::Error::PoolTimedOut))
    }

    async fn insert_student(&self, _student: &Student) -> Result<bool> {
        Err(Error::Database(sqlx::Error::PoolTimedOut))
    }

    async fn remove_student(&self, _id: &StudentId) -> Result<StudentRemoval> {
        Err(Error::Database(sqlx::Error::PoolTimedOut))
    }
}

#[async_trait]
impl HealthCheck for UnavailableStore {
    async fn health_check(&self) -> Result<()> {
        Err(Error::Database(sqlx::Error::PoolTimedOut))
    }
}

fn app() -> Router {
    create_router(AppState::from_store(Arc::new(InMemoryStore::new())), BODY_LIMIT)
}

fn unavailable_app() -> Router {
    create_router(AppState::from_store(Arc::new(UnavailableStore)), BODY_LIMIT)
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let body = body.map_or_else(Body::empty, |json| Body::from(json.to_string()));
    Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn attendance_round_trip_over_http() {
    let app = app();

    let response = send(
        &app,
        request(
            "POST",
            "/attendance",
            Some(json!({"studentId": "s1", "date": "2024-05-10", "pairIndex": 2, "isPresent": false})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
    assert_eq!(json_body(response).await, json!({"success": true}));

    let response = send(&app, request("GET", "/attendance", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    assert_eq!(
        json_body(response).await,
        json!([{"studentId": "s1", "date": "2024-05-10", "pairs": [true, true, false]}])
    );
}

#[tokio::test]
async fn attendance_month_query_filters_dates() {
    let app = app();
    for date in ["2024-05-10", "2024-06-01"] {
        send(
            &app,
            request(
                "POST",
                "/attendance",
                Some(json!({"studentId": "s1", "date": date, "pairIndex": 0})),
            ),
        )
        .await;
    }

    let body = json_body(send(&app, request("GET", "/attendance?month=2024-06", None)).await).await;
    assert_eq!(
        body,
        json!([{"studentId": "s1", "date": "2024-06-01", "pairs": [true]}])
    );

    let body = json_body(send(&app, request("GET", "/attendance?month=", None)).await).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn roster_create_list_delete() {
    let app = app();

    let response = send(
        &app,
        request("POST", "/students", Some(json!({"id": "s1", "name": "Ann"}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await, json!({"success": true, "id": "s1"}));

    send(
        &app,
        request(
            "POST",
            "/attendance",
            Some(json!({"studentId": "s1", "date": "2024-05-10", "pairIndex": 0, "isPresent": false})),
        ),
    )
    .await;

    let response = send(&app, request("GET", "/students", None)).await;
    assert_eq!(json_body(response).await, json!([{"id": "s1", "name": "Ann"}]));

    let response = send(&app, request("DELETE", "/students?id=s1", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"success": true}));

    let students = json_body(send(&app, request("GET", "/students", None)).await).await;
    assert_eq!(students, json!([]));
    let attendance = json_body(send(&app, request("GET", "/attendance", None)).await).await;
    assert_eq!(attendance, json!([]));
}

#[tokio::test]
async fn delete_without_id_is_a_no_op() {
    let app = app();
    send(
        &app,
        request("POST", "/students", Some(json!({"id": "s1", "name": "Ann"}))),
    )
    .await;

    let response = send(&app, request("DELETE", "/students", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"success": true}));

    let students = json_body(send(&app, request("GET", "/students", None)).await).await;
    assert_eq!(students.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unsupported_methods_are_rejected() {
    let app = app();

    let response = send(&app, request("DELETE", "/attendance", None)).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json_body(response).await, json!({"error": "Method not allowed"}));

    let response = send(&app, request("PUT", "/students", None)).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn negative_pair_index_is_bad_request() {
    let response = send(
        &app(),
        request(
            "POST",
            "/attendance",
            Some(json!({"studentId": "s1", "date": "2024-05-10", "pairIndex": -1})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn storage_failures_are_internal_errors() {
    let app = unavailable_app();

    for (method, uri) in [("GET", "/attendance"), ("GET", "/students"), ("DELETE", "/students?id=s1")] {
        let response = send(&app, request(method, uri, None)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
        assert!(response.headers().get("x-request-id").is_some());
        let body = json_body(response).await;
        assert_eq!(body["code"], "STORAGE_ERROR");
    }
}

#[tokio::test]
async fn preflight_never_touches_storage() {
    let response = send(&unavailable_app(), request("OPTIONS", "/attendance", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-methods")
            .unwrap(),
        "GET, POST, OPTIONS"
    );
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-headers")
            .unwrap(),
        "Content-Type"
    );
    assert_eq!(
        response.headers().get("access-control-max-age").unwrap(),
        "86400"
    );
}

#[tokio::test]
async fn health_reports_unavailable_storage() {
    let response = send(&unavailable_app(), request("GET", "/health", None)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn gateway_events_reach_the_same_handlers() {
    let state = AppState::from_store(Arc::new(InMemoryStore::new()));

    let post: GatewayEvent = serde_json::from_value(json!({
        "httpMethod": "POST",
        "body": json!({"id": "s7", "name": "Lee"}).to_string()
    }))
    .unwrap();
    let response = invoke(state.students(), post).await.unwrap();
    assert_eq!(response.status_code, 201);
    assert_eq!(
        response.headers.get("access-control-allow-origin").map(String::as_str),
        Some("*")
    );

    let list: GatewayEvent = serde_json::from_value(json!({"httpMethod": "GET"})).unwrap();
    let response = invoke(state.students(), list).await.unwrap();
    assert_eq!(response.status_code, 200);
    assert!(!response.is_base64_encoded);
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body, json!([{"id": "s7", "name": "Lee"}]));
}

#[tokio::test]
async fn gateway_surfaces_storage_failures_as_errors() {
    let state = AppState::from_store(Arc::new(UnavailableStore));
    let event: GatewayEvent = serde_json::from_value(json!({"httpMethod": "GET"})).unwrap();

    let err = invoke(state.attendance(), event).await.unwrap_err();
    assert!(matches!(err, Error::Database(_)));
}
