//! Error types and HTTP response mapping.
//!
//! `ExtractionError` and `RenderError` are the core's per-call failures.
//! `AppError` wraps them for the transport and implements Axum's
//! `IntoResponse`, converting each to a status code with a JSON error body.
//!
//! Error mappings:
//! - `Validation`, `Render(EmptyInput | UnsupportedFormat)` → 400
//! - `Extraction`, `Render(..)` otherwise, `Internal` → 500

use std::time::Duration;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failure of a single `git` invocation.
#[derive(Error, Debug)]
pub enum GitCommandError {
    #[error("failed to spawn git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("git exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("git did not finish within {0:?}")]
    TimedOut(Duration),
}

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Not a git repository: {path}")]
    NotARepository { path: String },

    #[error("Git invocation failed for {path}: {cause}")]
    ToolInvocationFailed { path: String, cause: String },
}

impl ExtractionError {
    pub fn path(&self) -> &str {
        match self {
            ExtractionError::NotARepository { path } => path,
            ExtractionError::ToolInvocationFailed { path, .. } => path,
        }
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No commits found to export.")]
    EmptyInput,

    #[error("Invalid format '{0}'. Use 'pdf' or 'csv'.")]
    UnsupportedFormat(String),

    #[error("Font file not found: {path}")]
    FontResourceMissing { path: String },

    #[error("Font file {path} could not be parsed: {reason}")]
    InvalidFont { path: String, reason: String },

    #[error("Failed to generate document: {0}")]
    Document(String),

    #[error("Document stream ended before completion")]
    Incomplete,
}

impl RenderError {
    /// Whether the fault lies in the request rather than the deployment.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RenderError::EmptyInput | RenderError::UnsupportedFormat(_))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Extraction(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read repo: {}: {}", e.path(), e),
            ),
            AppError::Render(e) if e.is_client_error() => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Render(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        if status.is_server_error() {
            tracing::error!("{}", error_message);
        }

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
