use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gigbook_core::BookingError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError(String),
    NotFoundError(String),
    /// `status` carries the booking's current status when a transition lost.
    ConflictError { message: String, status: Option<String> },
    BadGateway(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, current) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg, None),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::ConflictError { message, status } => (StatusCode::CONFLICT, message, status),
            AppError::BadGateway(msg) => {
                tracing::error!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, msg, None)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string(), None)
            }
        };

        let body = match current {
            Some(current) => json!({ "error": error_message, "status": current }),
            None => json!({ "error": error_message }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let message = err.to_string();
        match err {
            BookingError::ValidationError(msg) => AppError::ValidationError(msg),
            BookingError::AuthorizationError { .. } => AppError::AuthorizationError(message),
            BookingError::StateError { status, .. } => AppError::ConflictError {
                message,
                status: Some(status),
            },
            BookingError::MutationInFlight(_) => AppError::ConflictError {
                message,
                status: None,
            },
            BookingError::NotFoundError(_) => AppError::NotFoundError(message),
            BookingError::NetworkError(_) => AppError::BadGateway(message),
        }
    }
}
