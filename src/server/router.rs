//! Axum routes mounting the handlers
//!
//! Each handler owns its method dispatch (including OPTIONS and 405), so the
//! routes accept any method and forward the request unchanged.

use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, warn};

use super::error_response::{extract_request_id, ErrorResponseExt};
use super::middleware::MiddlewareStack;
use crate::infrastructure::{log_messages, HealthCheck, Store};
use crate::service::headers::paths;
use crate::service::{
    AttendanceService, RequestHandler, ServiceRequest, ServiceResponse, StudentService,
};
use crate::{Error, Result};

/// Handlers and storage health shared by all routes
#[derive(Clone)]
pub struct AppState {
    attendance: Arc<AttendanceService>,
    students: Arc<StudentService>,
    health: Arc<dyn HealthCheck>,
}

impl AppState {
    /// Wire both handlers to one backend
    pub fn from_store<S: Store + 'static>(store: Arc<S>) -> Self {
        Self {
            attendance: Arc::new(AttendanceService::new(store.clone())),
            students: Arc::new(StudentService::new(store.clone())),
            health: store,
        }
    }

    pub fn attendance(&self) -> &AttendanceService {
        &self.attendance
    }

    pub fn students(&self) -> &StudentService {
        &self.students
    }
}

/// Create the router with all routes and the middleware stack
pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    let router = Router::new()
        .route(paths::ATTENDANCE, any(attendance_handler))
        .route(paths::STUDENTS, any(students_handler))
        .route(paths::HEALTH, get(health_handler))
        .with_state(state);

    MiddlewareStack::new(max_body_bytes).apply_to_router(router)
}

impl IntoResponse for ServiceResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

async fn attendance_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    dispatch(state.attendance.as_ref(), method, &headers, query, body).await
}

async fn students_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    dispatch(state.students.as_ref(), method, &headers, query, body).await
}

async fn dispatch(
    handler: &dyn RequestHandler,
    method: Method,
    headers: &HeaderMap,
    query: HashMap<String, String>,
    body: Bytes,
) -> Response {
    match run_handler(handler, method, query, body).await {
        Ok(response) => response.into_response(),
        Err(err) => {
            let request_id = extract_request_id(headers);
            error!(
                request_id = request_id.as_deref().unwrap_or("unknown"),
                error = %err,
                "{}",
                log_messages::request_processing::REQUEST_FAILED
            );

            let mut error_response = err.to_error_response();
            if let Some(id) = request_id {
                error_response = error_response.with_request_id(id);
            }
            error_response.into_response_with_status(err.status_code())
        }
    }
}

async fn run_handler(
    handler: &dyn RequestHandler,
    method: Method,
    query: HashMap<String, String>,
    body: Bytes,
) -> Result<ServiceResponse> {
    let body = if body.is_empty() {
        None
    } else {
        Some(String::from_utf8(body.to_vec()).map_err(|_| Error::invalid_input("body"))?)
    };

    handler
        .handle(ServiceRequest {
            method,
            query,
            body,
        })
        .await
}

/// Health check handler
async fn health_handler(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.health.health_check().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(err) => {
            warn!(error = %err, "{}", log_messages::database::HEALTH_CHECK_FAILED);
            (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE")
        }
    }
}
