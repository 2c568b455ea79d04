//! API error taxonomy and [`axum::response::IntoResponse`] implementation.
//!
//! Validation and not-found conditions are detected before mutating state;
//! anything unexpected collapses to a logged, generic 500 so backend details
//! never reach the client.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use clairiere_core::{StoreError, resolver::JoinError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  Validation(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("not authenticated")]
  Unauthenticated,

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      // The original surfaces duplicate-subscriber as a 400, not a 409.
      ApiError::Conflict(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthenticated => {
        (StatusCode::UNAUTHORIZED, "not authenticated".to_string())
      }
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

impl From<StoreError> for ApiError {
  fn from(err: StoreError) -> Self {
    match err {
      StoreError::DuplicateEmail(_) => {
        ApiError::Conflict("this email is already subscribed".to_string())
      }
      StoreError::ExpeditionNotFound(id) => {
        ApiError::NotFound(format!("expedition {id} not found"))
      }
      StoreError::ExpeditionerNotFound(id) => {
        ApiError::NotFound(format!("expeditioner {id} not found"))
      }
      // DuplicateExpeditioner is reinterpreted by the resolver; reaching
      // here means a call site failed to do so.
      other => ApiError::Internal(Box::new(other)),
    }
  }
}

impl From<JoinError> for ApiError {
  fn from(err: JoinError) -> Self {
    match err {
      JoinError::Validation(m) => ApiError::Validation(m),
      JoinError::ExpeditionNotFound(id) => {
        ApiError::NotFound(format!("expedition {id} not found"))
      }
      JoinError::Store(e) => e.into(),
    }
  }
}
