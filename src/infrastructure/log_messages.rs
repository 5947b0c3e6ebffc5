//! Log message constants for infrastructure components
//!
//! This module centralizes the fixed log messages used across the service so
//! that wording stays consistent between the HTTP host and the handlers.

/// Application startup and lifecycle messages
pub mod application {
    pub const STARTING: &str = "Starting roll call application";
    pub const CONNECTING_TO_DATABASE: &str = "Connecting to database";
    pub const USING_IN_MEMORY_STORE: &str = "Using in-memory store; data will not persist";
    pub const LISTENING: &str = "Listening for requests";
    pub const SHUTTING_DOWN: &str = "Shutdown signal received";
    pub const STOPPED: &str = "Server stopped";
}

/// Database-related log messages
pub mod database {
    pub const HEALTH_CHECK_FAILED: &str = "Database health check failed";
    pub const CONNECTION_ESTABLISHED: &str = "Database connection established";
    pub const MIGRATION_STARTED: &str = "Running database migrations";
    pub const MIGRATION_COMPLETED: &str = "Database migrations completed successfully";
}

/// Attendance handler messages
pub mod attendance {
    pub const LISTED: &str = "Attendance listed";
    pub const RECORDED: &str = "Attendance mark recorded";
}

/// Roster handler messages
pub mod students {
    pub const LISTED: &str = "Students listed";
    pub const CREATED: &str = "Student created";
    pub const ALREADY_EXISTS: &str = "Student id already exists; keeping existing row";
    pub const REMOVED: &str = "Student removed";
    pub const REMOVE_WITHOUT_ID: &str = "Delete requested without an id; nothing to remove";
}

/// Request/response processing messages
pub mod request_processing {
    pub const INCOMING_REQUEST: &str = "Incoming request";
    pub const REQUEST_COMPLETED: &str = "Request completed";
    pub const REQUEST_FAILED: &str = "Request failed";
    pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
}
