//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use docket_core::oracle::CollaboratorError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  /// The named external collaborator is not wired into this deployment.
  #[error("{0} not configured")]
  Unconfigured(&'static str),

  /// The analysis oracle failed on every invocation. Deliberately neutral:
  /// nothing was persisted.
  #[error("the analysis service did not return a usable response")]
  OracleUnavailable,

  #[error("collaborator error: {0}")]
  Collaborator(#[from] CollaboratorError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Unconfigured(_) => {
        (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
      }
      ApiError::OracleUnavailable => (StatusCode::BAD_GATEWAY, self.to_string()),
      ApiError::Collaborator(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
