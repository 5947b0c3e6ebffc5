//! HTTP header constants and well-known paths
//!
//! Header values shared by both handlers live here so the CORS contract is
//! defined once.

/// Header name for request ID used for tracing and correlation
pub const X_REQUEST_ID: &str = "x-request-id";

/// Standard header re-exports for convenience
pub use ::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, CONTENT_TYPE,
};

/// CORS values sent by both services
pub mod cors {
    /// Any origin may read responses
    pub const ALLOW_ANY_ORIGIN: &str = "*";

    /// Request headers a browser may send on the actual request
    pub const ALLOWED_HEADERS: &str = "Content-Type";

    /// Preflight cache lifetime in seconds (one day)
    pub const PREFLIGHT_MAX_AGE: &str = "86400";
}

/// Well-known paths
pub mod paths {
    /// Attendance handler mount point
    pub const ATTENDANCE: &str = "/attendance";

    /// Roster handler mount point
    pub const STUDENTS: &str = "/students";

    /// Health check endpoint path
    pub const HEALTH: &str = "/health";
}

/// Common content types
pub mod content_types {
    pub const JSON: &str = "application/json";
}
