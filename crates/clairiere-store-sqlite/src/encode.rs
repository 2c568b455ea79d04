//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, birthdays as `YYYY-MM-DD`,
//! UUIDs as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use clairiere_core::{
  expedition::{Expedition, ExpeditionSummary},
  expeditioner::Expeditioner,
};
use uuid::Uuid;

use crate::error::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row shapes ──────────────────────────────────────────────────────────────

pub struct RawExpedition {
  pub expedition_id: String,
  pub name:          String,
  pub created_at:    String,
}

impl RawExpedition {
  pub fn into_expedition(self) -> Result<Expedition> {
    Ok(Expedition {
      id:         decode_uuid(&self.expedition_id)?,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawExpeditionSummary {
  pub expedition_id:      String,
  pub name:               String,
  pub created_at:         String,
  pub expeditioner_count: i64,
}

impl RawExpeditionSummary {
  pub fn into_summary(self) -> Result<ExpeditionSummary> {
    Ok(ExpeditionSummary {
      id:                 decode_uuid(&self.expedition_id)?,
      name:               self.name,
      created_at:         decode_dt(&self.created_at)?,
      expeditioner_count: self.expeditioner_count.max(0) as u64,
    })
  }
}

pub struct RawExpeditioner {
  pub expeditioner_id: String,
  pub name:            String,
  pub birthday:        String,
  pub created_at:      String,
}

impl RawExpeditioner {
  pub fn into_expeditioner(self) -> Result<Expeditioner> {
    Ok(Expeditioner {
      id:         decode_uuid(&self.expeditioner_id)?,
      name:       self.name,
      birthday:   decode_date(&self.birthday)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
