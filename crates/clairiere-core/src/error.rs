//! Error kinds surfaced by the persistence gateway.
//!
//! Constraint violations are their own variants so call sites can match on
//! them by type instead of inspecting backend-specific error codes.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("email {0:?} is already subscribed")]
  DuplicateEmail(String),

  #[error("expeditioner {name:?} born {birthday} already exists")]
  DuplicateExpeditioner { name: String, birthday: NaiveDate },

  #[error("expedition not found: {0}")]
  ExpeditionNotFound(Uuid),

  #[error("expeditioner not found: {0}")]
  ExpeditionerNotFound(Uuid),

  #[error("backend error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
