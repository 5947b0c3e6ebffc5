use thiserror::Error;

/// Roll call application error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {field}")]
    InvalidInput { field: String },

    #[error("Invalid gateway event: {0}")]
    InvalidGatewayEvent(String),

    #[error("Application error: {message}")]
    Application { message: String },
}

impl Error {
    pub fn application(message: impl Into<String>) -> Self {
        Self::Application {
            message: message.into(),
        }
    }

    pub fn invalid_input(field: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
        }
    }

    /// Whether the failure was caused by the caller's payload rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Serialization(_) | Self::InvalidInput { .. } | Self::InvalidGatewayEvent(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
