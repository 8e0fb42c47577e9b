//! `AppError` to HTTP response conversion.
//!
//! Every error body has the `ErrorResponse` shape and carries the id of the
//! request that produced it. Sources of server-side failures are logged here
//! and never sent to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::api::middleware::current_request_id;
use crate::error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let code = error_to_code(&self);

        let error_response = match &self {
            AppError::NotFound { entity, field, value } => {
                ErrorResponse::not_found_error(entity, field, value)
            }
            AppError::Duplicate { entity, field, value } => {
                ErrorResponse::duplicate_error(entity, field, value)
            }
            AppError::Validation { field, reason } => ErrorResponse::validation_error(field, reason),
            AppError::ValidationErrors { errors } => {
                ErrorResponse::new(code, "Request validation failed")
                    .with_details(json!({ "errors": errors }))
            }
            AppError::BadRequest { message } | AppError::Unauthorized { message } => {
                ErrorResponse::new(code, message)
            }
            AppError::Rejected { rule, message } => ErrorResponse::new(rule, message),
            AppError::Database { operation, .. } => ErrorResponse::new(
                code,
                &format!("Database operation failed: {}", operation),
            )
            .with_details(json!({ "operation": operation })),
            AppError::Configuration { key, .. } => {
                ErrorResponse::new(code, &format!("Configuration error: {}", key))
                    .with_details(json!({ "key": key }))
            }
            AppError::ConnectionPool { .. } => {
                ErrorResponse::new(code, "Database connection unavailable")
            }
            AppError::Internal { .. } => ErrorResponse::new(code, "An internal error occurred"),
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        }

        let error_response = match current_request_id() {
            Some(id) => error_response.with_request_id(&id),
            None => error_response,
        };

        (status, Json(error_response)).into_response()
    }
}

pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. }
        | AppError::ValidationErrors { .. }
        | AppError::BadRequest { .. }
        | AppError::Rejected { .. } => StatusCode::BAD_REQUEST,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::Database { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Code used in the body; `Rejected` reports its own rule code instead.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Rejected { .. } => "REJECTED",
        AppError::Unauthorized { .. } => "UNAUTHORIZED",
        AppError::Database { .. } => "DATABASE_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFieldError;
    use crate::services::BorrowError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::not_found_by_id("book", 1), StatusCode::NOT_FOUND),
            (
                AppError::Duplicate {
                    entity: "reader".to_string(),
                    field: "email".to_string(),
                    value: "a@b.io".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (AppError::from(BorrowError::AlreadyReturned), StatusCode::BAD_REQUEST),
            (
                AppError::Unauthorized {
                    message: "no".to_string(),
                },
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::ConnectionPool {
                    source: anyhow::anyhow!("timed out"),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Internal {
                    source: anyhow::anyhow!("boom"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error_to_status_code(&error), status, "{:?}", error);
        }
    }

    #[tokio::test]
    async fn test_rejection_body_uses_rule_code() {
        let response = AppError::from(BorrowError::NoAvailableCopies).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["code"], "NO_AVAILABLE_COPIES");
        assert_eq!(body["message"], "No available copies of this book");
    }

    #[tokio::test]
    async fn test_validation_errors_are_listed() {
        let response = AppError::ValidationErrors {
            errors: vec![ValidationFieldError {
                field: "title".to_string(),
                message: "Title must be between 1 and 255 characters".to_string(),
            }],
        }
        .into_response();

        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["errors"][0]["field"], "title");
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let response = AppError::Internal {
            source: anyhow::anyhow!("secret connection string"),
        }
        .into_response();

        let body = body_json(response).await;
        assert_eq!(body["message"], "An internal error occurred");
        assert!(!body.to_string().contains("secret"));
    }
}
