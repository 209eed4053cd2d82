use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::Error as SqlxError;

/// Message returned whenever a caller is not a member of the requested organization.
pub const ACCESS_DENIED_TO_ORGANIZATION: &str = "Access denied to organization";

/// Application error type for unified error handling across the app.
#[derive(Debug)]
pub enum AppError {
    /// No valid session (401 Unauthorized)
    Unauthorized,

    /// Authenticated but lacking rights on the target (403 Forbidden)
    AccessDenied(String),

    /// Target id does not resolve, or resolves inside another tenant (404 Not Found)
    NotFound(String),

    /// Validation errors (400 Bad Request) - invalid input data
    Validation(String),

    /// Authentication errors (400 Bad Request) - wrong credentials, etc.
    Auth(String),

    /// Uniqueness violations (409 Conflict) - taken slug, existing member
    Conflict(String),

    /// Database errors (500 Internal Server Error)
    Database(SqlxError),

    /// Generic internal errors (500 Internal Server Error)
    Internal,
}

impl AppError {
    /// The standard tenancy denial.
    pub fn access_denied() -> Self {
        AppError::AccessDenied(ACCESS_DENIED_TO_ORGANIZATION.to_string())
    }

    /// Map a `validator` failure to a 400 with the first field message, if any.
    pub fn from_validation(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
            })
            .next()
            .unwrap_or_else(|| "Invalid input".to_string());
        AppError::Validation(message)
    }
}

impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Unauthorized => f.write_str("Unauthorized"),
            AppError::AccessDenied(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Auth(msg)
            | AppError::Conflict(msg) => f.write_str(msg),
            AppError::Database(err) => write!(f, "database error: {}", err),
            AppError::Internal => f.write_str("Internal server error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::AccessDenied(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Auth(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Database(err) => {
                tracing::error!(%err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
