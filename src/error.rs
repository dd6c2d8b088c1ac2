use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Substrings that mark a message as unsafe to log verbatim
const REDACT_MARKERS: &[&str] = &["password", "secret", "token", "key"];

impl Error {
    /// A version of the error message that is safe to write to logs.
    ///
    /// Store and client errors can carry connection strings, internal URLs
    /// or schema fragments, so those collapse to a fixed phrase. Messages
    /// this crate builds itself pass through unless they look credential-y.
    pub fn log_safe(&self) -> String {
        match self {
            Error::Database(_) => "Database operation failed".to_string(),
            Error::Migration(_) => "Database migration failed".to_string(),
            Error::Http(_) => "Outbound HTTP request failed".to_string(),
            Error::Io(_) => "File system operation failed".to_string(),

            Error::Internal(msg) => {
                let lower = msg.to_lowercase();
                if REDACT_MARKERS.iter().any(|m| lower.contains(m)) {
                    "Internal error (details redacted)".to_string()
                } else {
                    format!("Internal error: {msg}")
                }
            }

            Error::Validation(msg) => format!("Validation error: {msg}"),
            Error::NotFound(msg) => format!("Not found: {msg}"),
            Error::Config(msg) => format!("Configuration error: {msg}"),
        }
    }

    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Error::Database(_) | Error::Migration(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to search recipes".to_string(),
            ),
            Error::Http(_) => (
                StatusCode::BAD_GATEWAY,
                "External service error".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("Request error: {}", self.log_safe());

        let (status, message) = self.status_and_message();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}
