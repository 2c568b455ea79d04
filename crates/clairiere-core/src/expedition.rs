//! Expeditions — the events participants sign up for.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An event created by an admin. Participants attach to it through the
/// membership relation; deleting an expedition drops the relation but never
/// the participant records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expedition {
  pub id:         Uuid,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

/// An expedition together with its current participant count — the shape the
/// join page and the profile view read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpeditionSummary {
  pub id:                 Uuid,
  pub name:               String,
  pub created_at:         DateTime<Utc>,
  pub expeditioner_count: u64,
}
