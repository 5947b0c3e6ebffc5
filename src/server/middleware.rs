//! Middleware stack for the HTTP host
//!
//! Layers, outer to inner:
//! 1. Request ID assignment (UUID v7 unless the caller sent one)
//! 2. Request ID propagation onto the response
//! 3. Request logging, with the request ID
//! 4. Request body size limit

use crate::infrastructure::log_messages::request_processing;
use crate::service::headers::X_REQUEST_ID;
use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::{from_fn, Next},
    response::Response,
    Router,
};
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
};
use tracing::info;
use uuid::Uuid;

/// Generates time-ordered request IDs
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::now_v7().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Logs each request and its outcome
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();

    // Extract request details before passing ownership
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    info!(
        request_id = request_id,
        method = %method,
        path = %uri.path(),
        "{}",
        request_processing::INCOMING_REQUEST
    );

    let response = next.run(request).await;
    let duration = start.elapsed();

    info!(
        request_id = request_id,
        method = %method,
        path = %uri.path(),
        status = response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "{}",
        request_processing::REQUEST_COMPLETED
    );

    response
}

/// Builder for composing the middleware stack
#[derive(Debug, Clone, Copy)]
pub struct MiddlewareStack {
    max_body_bytes: usize,
}

impl MiddlewareStack {
    pub fn new(max_body_bytes: usize) -> Self {
        Self { max_body_bytes }
    }

    /// Apply the complete middleware stack to a router
    pub fn apply_to_router<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(from_fn(logging_middleware))
                .layer(RequestBodyLimitLayer::new(self.max_body_bytes)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, routing::any};
    use tower::ServiceExt;

    async fn echo(body: String) -> String {
        body
    }

    fn router(max_body_bytes: usize) -> Router {
        MiddlewareStack::new(max_body_bytes)
            .apply_to_router(Router::new().route("/echo", any(echo)))
    }

    #[tokio::test]
    async fn test_request_id_generation() {
        let response = router(1024)
            .oneshot(Request::builder().uri("/echo").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let request_id = response
            .headers()
            .get(X_REQUEST_ID)
            .unwrap()
            .to_str()
            .unwrap();
        let uuid = Uuid::parse_str(request_id).unwrap();
        assert_eq!(uuid.get_version_num(), 7);
    }

    #[tokio::test]
    async fn test_request_id_passthrough() {
        let existing_id = Uuid::now_v7().to_string();
        let response = router(1024)
            .oneshot(
                Request::builder()
                    .uri("/echo")
                    .header(X_REQUEST_ID, &existing_id)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(X_REQUEST_ID).unwrap(),
            existing_id.as_str()
        );
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let response = router(8)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .body(Body::from("this body is far too long"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
