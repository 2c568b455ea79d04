//! Error type for `clairiere-store-sqlite` and the mapping into the core
//! error-kind enumeration.

use clairiere_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for StoreError {
  fn from(err: Error) -> Self {
    StoreError::Backend(Box::new(err))
  }
}

/// Whether a database error is a UNIQUE-constraint violation.
///
/// Call sites translate these into the specific `StoreError` duplicate
/// variants; they must never leak as raw backend errors.
pub(crate) fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.code == rusqlite::ErrorCode::ConstraintViolation
  )
}
