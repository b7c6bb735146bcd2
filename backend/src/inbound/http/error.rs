//! Error classification at the API boundary.
//!
//! Domain failures stay transport agnostic; this module reshapes them into
//! the fixed set of categories the API exposes, attaching the request path
//! where one is known. The layer never retries and never turns a failure
//! into a success. Failures that are not domain errors (payload
//! deserialisation, unmatched routes) never reach it and keep the
//! framework's default handling.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::error::{Error, ErrorCode};

/// Generic message returned when a failure looks like a validation problem
/// but carries no structured field information.
const ABORTED_MESSAGE: &str = "The input is invalid. Please check required fields and data types.";

/// API-visible failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Aggregated field-level constraint violations.
    Validation,
    /// A semantically illegal argument, such as a blank identifier.
    InvalidSyntax,
    /// A failure raised while resolving the operation: missing records,
    /// identity conflicts, storage faults, and other runtime errors.
    DataFetching,
    /// A validation-style failure without structured field information;
    /// clients get a generic message rather than internal detail.
    Aborted,
}

/// Structured error envelope returned to API clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub category: ErrorCategory,
    pub message: String,
    /// Request path the failure was raised for, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip)]
    status: StatusCode,
}

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Classify a domain failure, attaching the request path.
    pub fn classify(error: Error, path: impl Into<String>) -> Self {
        Self::build(error, Some(path.into()))
    }

    fn build(error: Error, path: Option<String>) -> Self {
        let details = error.details().cloned();
        let (category, status, message) = match error.code() {
            ErrorCode::Validation => (
                ErrorCategory::Validation,
                StatusCode::BAD_REQUEST,
                error.message().to_owned(),
            ),
            ErrorCode::InvalidArgument => (
                ErrorCategory::InvalidSyntax,
                StatusCode::BAD_REQUEST,
                error.message().to_owned(),
            ),
            ErrorCode::NotFound => (
                ErrorCategory::DataFetching,
                StatusCode::NOT_FOUND,
                error.message().to_owned(),
            ),
            ErrorCode::Conflict => (
                ErrorCategory::DataFetching,
                StatusCode::CONFLICT,
                error.message().to_owned(),
            ),
            ErrorCode::StorageFailure => (
                ErrorCategory::DataFetching,
                StatusCode::SERVICE_UNAVAILABLE,
                error.message().to_owned(),
            ),
            // A validation-shaped message without structured fields gets the
            // generic wording instead of echoing internal detail.
            ErrorCode::Internal if error.message().contains("Validation error") => (
                ErrorCategory::Aborted,
                StatusCode::BAD_REQUEST,
                ABORTED_MESSAGE.to_owned(),
            ),
            _ => (
                ErrorCategory::DataFetching,
                StatusCode::INTERNAL_SERVER_ERROR,
                error.message().to_owned(),
            ),
        };
        Self {
            category,
            message,
            path,
            details,
            status,
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self::build(error, None)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Error::validation("Validation error(s): [firstName] blank; "), ErrorCategory::Validation, StatusCode::BAD_REQUEST)]
    #[case(Error::invalid_argument("Department ID cannot be blank"), ErrorCategory::InvalidSyntax, StatusCode::BAD_REQUEST)]
    #[case(Error::not_found("Employee with id 9 does not exist"), ErrorCategory::DataFetching, StatusCode::NOT_FOUND)]
    #[case(Error::conflict("Department with id d001 already exists"), ErrorCategory::DataFetching, StatusCode::CONFLICT)]
    #[case(Error::storage("gateway down"), ErrorCategory::DataFetching, StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Error::internal("boom"), ErrorCategory::DataFetching, StatusCode::INTERNAL_SERVER_ERROR)]
    fn codes_map_to_categories_and_statuses(
        #[case] error: Error,
        #[case] category: ErrorCategory,
        #[case] status: StatusCode,
    ) {
        let classified = ApiError::classify(error, "/api/v1/employees");
        assert_eq!(classified.category, category);
        assert_eq!(classified.status_code(), status);
        assert_eq!(classified.path.as_deref(), Some("/api/v1/employees"));
    }

    #[test]
    fn validation_shaped_internal_failures_get_the_generic_message() {
        let classified =
            ApiError::from(Error::internal("Validation error inside the resolver"));
        assert_eq!(classified.category, ErrorCategory::Aborted);
        assert_eq!(classified.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(classified.message, ABORTED_MESSAGE);
    }

    #[test]
    fn messages_and_details_are_preserved_for_classified_failures() {
        let classified = ApiError::classify(
            Error::validation("Validation error(s): [gender] Gender cannot be blank; ")
                .with_details(json!({ "fieldErrors": [] })),
            "/api/v1/employees",
        );
        assert!(classified.message.contains("[gender]"));
        assert_eq!(classified.details, Some(json!({ "fieldErrors": [] })));
    }

    #[actix_web::test]
    async fn the_response_body_carries_the_envelope() {
        let classified = ApiError::classify(
            Error::not_found("Department with id zzzz does not exist"),
            "/api/v1/departments/zzzz",
        );
        let response = classified.error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body()).await.expect("body bytes");
        let body: Value = serde_json::from_slice(&bytes).expect("valid JSON");
        assert_eq!(body["category"], "data_fetching");
        assert_eq!(body["path"], "/api/v1/departments/zzzz");
        assert_eq!(body["message"], "Department with id zzzz does not exist");
    }
}
