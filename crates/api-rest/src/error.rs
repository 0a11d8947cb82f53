//! HTTP mapping for the error envelope.
//!
//! Handlers return `Result<_, ApiError>`. Extractor rejections are routed
//! through [`AppJson`], [`AppQuery`] and [`AppPath`] so malformed input produces the same
//! envelope as any other validation failure.

use api_shared::{ErrorEnvelope, ErrorKind, ErrorResponse};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hysio_core::CoreError;

/// Error returned by every REST handler.
#[derive(Debug)]
pub struct ApiError(pub ErrorEnvelope);

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self(ErrorEnvelope::validation(message))
    }

    pub fn status(&self) -> StatusCode {
        match self.0.kind {
            ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::UnknownError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.kind == ErrorKind::UnknownError {
            tracing::error!(message = %self.0.message, "request failed");
        }
        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}

impl From<ErrorEnvelope> for ApiError {
    fn from(envelope: ErrorEnvelope) -> Self {
        Self(envelope)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        if matches!(err, CoreError::LockPoisoned) {
            tracing::error!("core error: {err}");
        }
        Self(ErrorEnvelope::from(&err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(format!("Invalid path: {}", rejection.body_text()))
    }
}

/// `Json` extractor that rejects with an [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// `Query` extractor that rejects with an [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

/// `Path` extractor that rejects with an [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);
