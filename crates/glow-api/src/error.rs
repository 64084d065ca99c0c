//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use glow_core::{store::StoreError, tracker::TrackerError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// Well-formed but rejected by policy (e.g. toggling a non-today date).
  #[error("unprocessable: {0}")]
  Unprocessable(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a tracker failure: policy rejections become client errors, backend
  /// failures stay server errors.
  pub fn from_tracker<E: StoreError>(err: TrackerError<E>) -> Self {
    match err {
      TrackerError::Core(core @ glow_core::Error::DateNotEditable { .. }) => {
        ApiError::Unprocessable(core.to_string())
      }
      TrackerError::Core(core) => ApiError::BadRequest(core.to_string()),
      TrackerError::Store(e) => ApiError::Store(Box::new(e)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
