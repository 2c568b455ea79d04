//! Landing-page email opt-ins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A captured email address. Insert-only: never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSubscriber {
  pub id:         Uuid,
  pub email:      String,
  pub created_at: DateTime<Utc>,
}
