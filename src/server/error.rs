use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::server::requests::ValidationErrors;
use crate::services::ServiceError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthenticated.")]
    Unauthenticated,

    #[error("This action is unauthorized.")]
    Forbidden,

    #[error("Object not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("The given data was invalid.")]
    Validation(ValidationErrors),

    #[error("File upload failed.")]
    Upload(#[source] StorageError),

    #[error("Database error")]
    Database(#[source] sqlx::Error),
}

pub type ApiResponse<T> = Result<T, ApiError>;

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> ApiError {
        match error {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            error => ApiError::Database(error),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> ApiError {
        match error {
            ServiceError::Upload(error) => ApiError::Upload(error),
            ServiceError::Database(error) => error.into(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Upload(_) => StatusCode::BAD_GATEWAY,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Upload failures were already logged where they happened.
        if let ApiError::Database(error) = &self {
            tracing::error!(error = %error, "Database error while handling request");
        }
        let body = match &self {
            ApiError::Validation(errors) => json!({
                "message": self.to_string(),
                "errors": errors,
            }),
            other => json!({ "message": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
