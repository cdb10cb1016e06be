//! API error types and JSON error response formatting.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use settle_assistant::{AssistantError, EscalationError};
use settle_core::error::SettleError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "not_found").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid parameters.
    BadRequest(String),
    /// 404 Not Found - unknown user or escalation.
    NotFound(String),
    /// 409 Conflict - escalation already decided.
    Conflict(String),
    /// 429 Too Many Requests - a turn for this user is still in flight.
    TooManyRequests(String),
    /// 500 Internal Server Error.
    Internal(String),
    /// 503 Service Unavailable - assistant switched off.
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::TooManyRequests(msg) => {
                (StatusCode::TOO_MANY_REQUESTS, "too_many_requests", msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::EmptyMessage | AssistantError::MessageTooLong(_) => {
                ApiError::BadRequest(err.to_string())
            }
            AssistantError::UnknownUser(_) => ApiError::NotFound(err.to_string()),
            AssistantError::Busy(_) => ApiError::TooManyRequests(err.to_string()),
            AssistantError::Disabled => ApiError::ServiceUnavailable(err.to_string()),
            AssistantError::Storage(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<EscalationError> for ApiError {
    fn from(err: EscalationError) -> Self {
        match err {
            EscalationError::NotFound(_) => ApiError::NotFound(err.to_string()),
            EscalationError::InvalidTransition(..) => ApiError::Conflict(err.to_string()),
            EscalationError::Storage(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<SettleError> for ApiError {
    fn from(err: SettleError) -> Self {
        match &err {
            SettleError::Config(msg) => ApiError::BadRequest(msg.clone()),
            SettleError::NotFound(msg) => ApiError::NotFound(msg.clone()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use settle_assistant::EscalationStatus;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_assistant_error_mapping() {
        assert_eq!(
            status_of(AssistantError::EmptyMessage.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AssistantError::MessageTooLong(2000).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AssistantError::UnknownUser("x".into()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AssistantError::Busy("x".into()).into()),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            status_of(AssistantError::Disabled.into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_escalation_error_mapping() {
        assert_eq!(
            status_of(EscalationError::NotFound("notif-1".into()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(
                EscalationError::InvalidTransition(
                    EscalationStatus::Declined,
                    EscalationStatus::Accepted
                )
                .into()
            ),
            StatusCode::CONFLICT
        );
    }
}
