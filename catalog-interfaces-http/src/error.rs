use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use catalog_application::AppError;
use catalog_domain::CatalogError;

#[derive(Debug)]
pub enum HttpError {
    Unauthorized,
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unprocessable(String),
    Internal(String),
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        match value {
            AppError::Unauthorized => HttpError::Unauthorized,
            AppError::BadRequest(msg) => HttpError::BadRequest(msg),
            AppError::Catalog(err) => HttpError::from(err),
            AppError::Internal(err) => HttpError::Internal(err.to_string()),
        }
    }
}

impl From<CatalogError> for HttpError {
    fn from(value: CatalogError) -> Self {
        let message = value.to_string();
        match value {
            CatalogError::IndexOutOfRange { .. } | CatalogError::NotFound(_) => {
                HttpError::NotFound(message)
            }
            CatalogError::VersionConflict { .. } => HttpError::Conflict(message),
            CatalogError::Validation(_) => HttpError::Unprocessable(message),
            CatalogError::Persistence(_) => HttpError::Internal(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Unauthorized => StatusCode::UNAUTHORIZED,
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::Conflict(_) => StatusCode::CONFLICT,
            HttpError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            HttpError::Unauthorized => "unauthorized".to_string(),
            HttpError::BadRequest(msg) => format!("bad request: {}", msg),
            HttpError::NotFound(msg) | HttpError::Conflict(msg) | HttpError::Unprocessable(msg) => {
                msg
            }
            HttpError::Internal(msg) => {
                error!("request failed: {}", msg);
                msg
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
