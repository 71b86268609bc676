/// Error handling for the API server
///
/// A unified error type that maps to HTTP responses. Handlers return
/// `Result<T, ApiError>` which converts to the appropriate status code with
/// a JSON body carrying the error code, a human-readable message, and
/// optional per-field validation details.
///
/// Conversions from the shared crate's typed errors keep the taxonomy
/// intact: a `StoreError::DuplicateField` becomes a 409 naming the field
/// instead of collapsing into a generic "could not save".

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tienda_shared::auth::context::AuthError;
use tienda_shared::auth::password::PasswordError;
use tienda_shared::error::StoreError;
use tienda_shared::notify::Notice;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401) - invalid credentials or missing session
    Unauthorized(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - duplicate email or username
    DuplicateField(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),

    /// Service unavailable (503) - storage layer unreachable
    ServiceUnavailable(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "duplicate_field", "unauthorized")
    pub error: String,

    /// Categorized status message for display
    pub messages: Vec<Notice>,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DuplicateField(field) => write!(f, "Duplicate field: {}", field),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, notice, details) = match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Notice::error(msg), None)
            }
            ApiError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                Notice::warning(msg),
                None,
            ),
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, "not_found", Notice::error(msg), None)
            }
            ApiError::DuplicateField(field) => (
                StatusCode::CONFLICT,
                "duplicate_field",
                Notice::error(format!("The {} is already in use", field)),
                None,
            ),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                Notice::error("Request validation failed"),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    Notice::error("An internal error occurred"),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!("Storage unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    Notice::error("The record store is temporarily unavailable"),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            messages: vec![notice],
            details,
        });

        (status, body).into_response()
    }
}

/// Convert store errors to API errors, preserving the taxonomy
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateField { field } => ApiError::DuplicateField(field),
            StoreError::ConstraintViolation { constraint } => {
                ApiError::BadRequest(format!("Constraint violation: {}", constraint))
            }
            StoreError::StorageUnavailable(e) => ApiError::ServiceUnavailable(e.to_string()),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert authentication errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => {
                ApiError::Unauthorized("Please log in to continue".to_string())
            }
            AuthError::InvalidFormat(msg) => ApiError::BadRequest(msg),
            AuthError::InvalidSession => {
                ApiError::Unauthorized("Please log in to continue".to_string())
            }
            AuthError::StoreError(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Maps `validator` failures into per-field validation details
pub fn validation_details(errors: &validator::ValidationErrors) -> ApiError {
    let details: Vec<ValidationErrorDetail> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    ApiError::ValidationError(details)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Customer not found".to_string());
        assert_eq!(err.to_string(), "Not found: Customer not found");
    }

    #[test]
    fn test_duplicate_field_from_store_error() {
        let err = ApiError::from(StoreError::DuplicateField {
            field: "email".to_string(),
        });
        assert!(matches!(err, ApiError::DuplicateField(f) if f == "email"));
    }

    #[test]
    fn test_storage_unavailable_maps_to_503() {
        let err = ApiError::from(StoreError::StorageUnavailable(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, ApiError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_validation_error_counts() {
        let errors = vec![
            ValidationErrorDetail {
                field: "email".to_string(),
                message: "Invalid email format".to_string(),
            },
            ValidationErrorDetail {
                field: "age".to_string(),
                message: "Age out of range".to_string(),
            },
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }
}
