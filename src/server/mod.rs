//! HTTP host for the handlers
//!
//! Mounts the attendance and roster handlers on an axum router, wraps them
//! in the middleware stack, and renders handler failures as JSON errors.

pub mod error_response;
pub mod middleware;
pub mod router;

pub use error_response::{ErrorResponse, ErrorResponseExt};
pub use middleware::MiddlewareStack;
pub use router::{create_router, AppState};
