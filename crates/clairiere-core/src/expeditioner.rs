//! Expeditioners — participant records.
//!
//! There is no account system: the `(name, birthday)` pair is the identity
//! and de-duplication key, enforced by a uniqueness constraint in the store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A participant, deduplicated by `(name, birthday)`. The birthday is a
/// calendar date; any submitted time-of-day is discarded before storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expeditioner {
  pub id:         Uuid,
  pub name:       String,
  pub birthday:   NaiveDate,
  pub created_at: DateTime<Utc>,
}
