use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::errors::ServiceError;
use service::validation::FieldErrors;

/// JSON error payload: `{"error": ...}` plus `"errors": {field: message}`
/// when a form submission failed validation.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub fields: Option<FieldErrors>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), fields: None }
    }

    pub fn fields(errors: FieldErrors) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "Validation Error".into(),
            fields: Some(errors),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Invalid(errs) => ApiError::fields(errs),
            ServiceError::Validation(msg) => {
                ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, msg)
            }
            ServiceError::Forbidden(msg) => ApiError::new(StatusCode::FORBIDDEN, msg),
            ServiceError::NotFound(msg) => ApiError::new(StatusCode::NOT_FOUND, msg),
            ServiceError::Db(_) | ServiceError::Model(_) => {
                error!(err = %e, "persistence failure");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.fields {
            Some(fields) => serde_json::json!({
                "error": self.message,
                "errors": fields.into_map(),
            }),
            None => serde_json::json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}
