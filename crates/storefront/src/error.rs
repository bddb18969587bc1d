//! HTTP error type with Sentry integration.
//!
//! Route handlers return [`Result<T>`]. Server-side failures are captured to
//! Sentry before a generic JSON body goes back to the client.
//!
//! Cart rule violations (decrementing below one, touching an absent line) are
//! not errors at all; they come back as unchanged snapshots.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use sneakerhub_core::CategoryError;
use thiserror::Error;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Unknown product, category or path.
    #[error("not found: {0}")]
    NotFound(String),

    /// Request the storefront cannot act on (e.g. checkout of an empty cart).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        Self::NotFound(err.to_string())
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if let Self::Internal(detail) = &self {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %detail,
                sentry_event_id = %event_id,
                "request failed"
            );
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (self.status(), Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Record a cart action as a Sentry breadcrumb.
///
/// The trail shows up on any error event captured later in the session.
pub fn cart_breadcrumb(action: &str, tag: &str) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some("cart".to_string()),
        message: Some(action.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };
    breadcrumb
        .data
        .insert("tag".to_string(), serde_json::Value::String(tag.to_string()));

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("product ghost".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BadRequest("cart is empty".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("disk full".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unknown_category_maps_to_not_found() {
        let err = AppError::from(CategoryError("adidas".into()));
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let response = AppError::Internal("secret path /var/lib".into()).into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();

        assert!(text.contains("internal server error"));
        assert!(!text.contains("secret"));
    }

    #[tokio::test]
    async fn test_client_errors_carry_message() {
        let response = AppError::BadRequest("cart is empty".into()).into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value["error"], "bad request: cart is empty");
    }
}
