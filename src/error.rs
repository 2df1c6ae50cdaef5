use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
///
/// Every operation returns one of these through [`AppResult`]; the variant's
/// [`AppError::kind`] is the stable tag callers switch on.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Login required")]
    NotLoggedIn,

    #[error("Movie {0} is already in the saved list")]
    AlreadySaved(i64),

    #[error("Document already exists: {0}")]
    DocumentConflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing configuration: {0}")]
    Config(&'static str),

    #[error("Remote store returned status {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Session storage error: {0}")]
    Session(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable tag for the error
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::DuplicateEmail(_) => "duplicate_email",
            AppError::UserNotFound(_) => "user_not_found",
            AppError::NotLoggedIn => "not_logged_in",
            AppError::AlreadySaved(_) => "already_saved",
            AppError::DocumentConflict(_) => "document_conflict",
            AppError::NotFound(_) => "not_found",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Config(_) => "config",
            AppError::Remote { .. } | AppError::HttpClient(_) | AppError::ExternalApi(_) => {
                "remote_call_failure"
            }
            AppError::Serialization(_) => "serialization",
            AppError::Session(_) => "session_storage",
            AppError::Internal(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::DuplicateEmail(_)
            | AppError::AlreadySaved(_)
            | AppError::DocumentConflict(_) => StatusCode::CONFLICT,
            AppError::UserNotFound(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NotLoggedIn => StatusCode::UNAUTHORIZED,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Remote { .. } | AppError::HttpClient(_) | AppError::ExternalApi(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Config(_)
            | AppError::Serialization(_)
            | AppError::Session(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, kind = self.kind(), "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;
