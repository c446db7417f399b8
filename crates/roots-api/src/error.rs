//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::{
    multipart::MultipartError,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::{IntoResponse, Response},
};
use roots_core::{FailureKind, StoreFailure};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("invalid: {0}")]
  Unprocessable(String),

  #[error("payload too large: {0}")]
  TooLarge(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Translate a store error by its [`FailureKind`].
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + StoreFailure + Send + Sync + 'static,
  {
    match err.failure_kind() {
      FailureKind::NotFound => Self::NotFound(err.to_string()),
      FailureKind::Conflict => Self::Conflict(err.to_string()),
      FailureKind::Invalid => Self::Unprocessable(err.to_string()),
      FailureKind::Internal => Self::Store(Box::new(err)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::TooLarge(m) => (StatusCode::PAYLOAD_TOO_LARGE, m.clone()),
      ApiError::Io(e) => {
        tracing::error!(error = %e, "io failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_owned())
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

// ─── Extractor rejections ────────────────────────────────────────────────────

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    match rejection {
      // Well-formed JSON whose values fail type-level validation.
      JsonRejection::JsonDataError(e) => Self::Unprocessable(e.body_text()),
      other if other.status() == StatusCode::PAYLOAD_TOO_LARGE => {
        Self::TooLarge(other.body_text())
      }
      other => Self::BadRequest(other.body_text()),
    }
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

impl From<MultipartError> for ApiError {
  fn from(err: MultipartError) -> Self {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
      Self::TooLarge(err.body_text())
    } else {
      Self::BadRequest(err.body_text())
    }
  }
}
