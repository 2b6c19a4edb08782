//! Unified error handling for the dashboard API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::validation::ValidationError;

/// Application-level error type for the dashboard API.
///
/// Response bodies are plain text. Server faults never leak detail to the
/// caller; use [`AppError::report`] at the handler boundary to log them.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// No authenticated principal on the request.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// The principal does not own the store.
    #[error("Unauthorized")]
    Forbidden,

    /// A payload field is missing or invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Bad request from client (malformed path or query).
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// The entity is still referenced and cannot be removed.
    #[error("{0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::InUse(what) => Self::Conflict(what),
            RepositoryError::NotFound => Self::NotFound("Not found".to_string()),
            other => Self::Database(other),
        }
    }
}

impl AppError {
    /// Whether this error is a server fault rather than a caller mistake.
    #[must_use]
    pub const fn is_server_fault(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Internal(_))
    }

    /// Log a server fault with the operation tag that produced it and send it
    /// to Sentry. Caller mistakes are not reported.
    pub fn report(&self, operation: &'static str) {
        if !self.is_server_fault() {
            return;
        }
        let event_id = sentry::capture_error(self);
        tracing::error!(
            operation,
            error = %self,
            sentry_event_id = %event_id,
            "[{operation}] request failed"
        );
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Don't expose internal error details to clients
        let message = if self.is_server_fault() {
            "Internal error".to_string()
        } else {
            self.to_string()
        };

        (self.status(), message).into_response()
    }
}

/// Set the Sentry user context from the request principal.
pub fn set_sentry_user(user_id: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::validation::Field;

    async fn body_text(err: AppError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(AppError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::Validation(ValidationError::Required(Field::Name)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Conflict("Size is still referenced".to_string()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::NotFound("Size not found".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Internal("boom".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_error_mapping() {
        assert!(matches!(
            AppError::from(RepositoryError::InUse("Color is still referenced".to_string())),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(RepositoryError::NotFound),
            AppError::NotFound(_)
        ));
        assert!(
            AppError::from(RepositoryError::DataCorruption("x".to_string())).is_server_fault()
        );
    }

    #[tokio::test]
    async fn test_plain_text_bodies() {
        assert_eq!(
            body_text(AppError::Unauthenticated).await,
            (StatusCode::UNAUTHORIZED, "Unauthenticated".to_string())
        );
        assert_eq!(
            body_text(AppError::Forbidden).await,
            (StatusCode::FORBIDDEN, "Unauthorized".to_string())
        );
        assert_eq!(
            body_text(ValidationError::Required(Field::Price).into()).await,
            (StatusCode::BAD_REQUEST, "Price is required".to_string())
        );
    }

    #[tokio::test]
    async fn test_internal_detail_not_leaked() {
        let (status, body) =
            body_text(AppError::Internal("connection reset by peer".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal error");
    }
}
