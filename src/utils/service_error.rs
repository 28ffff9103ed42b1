// Service error type shared by all core services
// Business failures are 4xx-class; unexpected persistence errors are 500s
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found")]
    NotFound,

    #[error("Already applied to this job")]
    AlreadyApplied,

    #[error("Email already in use")]
    EmailInUse,

    #[error("Parent employer not found")]
    ParentEmployerNotFound,

    #[error("Job post quota exceeded")]
    QuotaExceeded,

    #[error("No subscription found for employer")]
    SubscriptionMissing,

    #[error("Subscription expired or inactive")]
    SubscriptionExpired,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal server error")]
    InternalError,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServiceError::DatabaseError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ServiceError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::NotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
            ServiceError::AlreadyApplied => (
                StatusCode::CONFLICT,
                "An application for this job already exists".to_string(),
            ),
            ServiceError::EmailInUse => {
                (StatusCode::CONFLICT, "Email already in use".to_string())
            },
            ServiceError::ParentEmployerNotFound => (
                StatusCode::BAD_REQUEST,
                "Parent employer not found".to_string(),
            ),
            ServiceError::QuotaExceeded => (
                StatusCode::PAYMENT_REQUIRED,
                "Job post quota exceeded".to_string(),
            ),
            ServiceError::SubscriptionMissing => (
                StatusCode::PAYMENT_REQUIRED,
                "No active subscription".to_string(),
            ),
            ServiceError::SubscriptionExpired => (
                StatusCode::PAYMENT_REQUIRED,
                "Subscription expired or inactive".to_string(),
            ),
            ServiceError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ServiceError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

/// Whether a diesel error was caused by a unique constraint
pub fn is_unique_violation(error: &diesel::result::Error) -> bool {
    matches!(
        error,
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _
        )
    )
}

// Conversion from various error types
impl From<diesel::result::Error> for ServiceError {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            diesel::result::Error::NotFound => ServiceError::NotFound,
            _ => ServiceError::DatabaseError(error.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(error: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(error.to_string())
    }
}

impl From<crate::utils::password::PasswordError> for ServiceError {
    fn from(error: crate::utils::password::PasswordError) -> Self {
        ServiceError::DatabaseError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_errors_are_client_class() {
        for err in [
            ServiceError::QuotaExceeded,
            ServiceError::SubscriptionMissing,
            ServiceError::SubscriptionExpired,
            ServiceError::AlreadyApplied,
            ServiceError::Unauthorized,
            ServiceError::ParentEmployerNotFound,
        ] {
            let status = err.into_response().status();
            assert!(status.is_client_error(), "expected 4xx, got {}", status);
        }
    }

    #[test]
    fn test_persistence_errors_are_server_class() {
        let err = ServiceError::DatabaseError("connection reset".to_string());
        assert!(err.into_response().status().is_server_error());
    }

    #[test]
    fn test_diesel_not_found_maps_to_not_found() {
        let err = ServiceError::from(diesel::result::Error::NotFound);
        assert!(matches!(err, ServiceError::NotFound));
    }
}
