//! The identity resolver — the join workflow behind every sign-up link.
//!
//! Given an expedition and a `(name, birthday)` pair, decide whether this is
//! a brand-new participant, a returning participant joining a new
//! expedition, or a returning participant already in this one. Joining is
//! idempotent: re-submitting the same pair against the same expedition
//! succeeds without side effects.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{StoreError, expeditioner::Expeditioner, store::ExpeditionStore};

// ─── Outcome types ───────────────────────────────────────────────────────────

/// How a successful join resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStatus {
  /// A new participant record was created and related to the expedition.
  Created,
  /// An existing participant was related to this expedition for the first
  /// time.
  Joined,
  /// The participant was already related; nothing changed.
  AlreadyMember,
}

/// The result of a successful [`resolve_and_join`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinOutcome {
  pub expeditioner: Expeditioner,
  pub status:       JoinStatus,
}

/// Why a join was refused.
#[derive(Debug, thiserror::Error)]
pub enum JoinError {
  #[error("invalid join request: {0}")]
  Validation(String),

  #[error("expedition not found: {0}")]
  ExpeditionNotFound(Uuid),

  #[error(transparent)]
  Store(#[from] StoreError),
}

// ─── Input parsing ───────────────────────────────────────────────────────────

/// Parse a submitted birthday.
///
/// Accepts a plain calendar date (`1990-01-01`) or a full RFC 3339 timestamp,
/// whose time-of-day is discarded.
pub fn parse_birthday(raw: &str) -> Option<NaiveDate> {
  let raw = raw.trim();
  if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
    return Some(date);
  }
  chrono::DateTime::parse_from_rfc3339(raw)
    .ok()
    .map(|dt| dt.date_naive())
}

// ─── Resolution ──────────────────────────────────────────────────────────────

/// Validate raw form input, then resolve and join.
///
/// Validation order: blank name or unparseable birthday first, then the
/// expedition existence check — nothing is mutated before both pass.
pub async fn resolve_and_join<S: ExpeditionStore>(
  store: &S,
  expedition_id: Uuid,
  name: &str,
  birthday: &str,
) -> Result<JoinOutcome, JoinError> {
  let name = name.trim();
  if name.is_empty() {
    return Err(JoinError::Validation("name must not be blank".into()));
  }
  let birthday = parse_birthday(birthday).ok_or_else(|| {
    JoinError::Validation(format!("unparseable birthday: {birthday:?}"))
  })?;

  join_resolved(store, expedition_id, name, birthday).await
}

/// Join with already-validated identity — used directly by the auto-join
/// flow, which replays a participant's on-file name and birthday.
pub async fn join_resolved<S: ExpeditionStore>(
  store: &S,
  expedition_id: Uuid,
  name: &str,
  birthday: NaiveDate,
) -> Result<JoinOutcome, JoinError> {
  if store.get_expedition(expedition_id).await?.is_none() {
    return Err(JoinError::ExpeditionNotFound(expedition_id));
  }

  let (expeditioner, freshly_created) =
    match store.find_expeditioner(name.to_owned(), birthday).await? {
      Some(existing) => (existing, false),
      None => match store.create_expeditioner(name.to_owned(), birthday).await
      {
        Ok(created) => (created, true),
        // A concurrent identical request won the create race; the record
        // exists now, so re-resolve instead of surfacing the collision.
        Err(StoreError::DuplicateExpeditioner { .. }) => {
          let existing = store
            .find_expeditioner(name.to_owned(), birthday)
            .await?
            .ok_or_else(|| {
              StoreError::Backend(
                "expeditioner vanished after duplicate-key collision"
                  .to_string()
                  .into(),
              )
            })?;
          (existing, false)
        }
        Err(other) => return Err(other.into()),
      },
    };

  // The membership insert is itself idempotent, so a concurrent duplicate
  // relation collapses to `AlreadyMember` rather than an error.
  let newly_related = store
    .add_membership(expeditioner.id, expedition_id)
    .await?;

  let status = match (freshly_created, newly_related) {
    (true, _) => JoinStatus::Created,
    (false, true) => JoinStatus::Joined,
    (false, false) => JoinStatus::AlreadyMember,
  };

  Ok(JoinOutcome { expeditioner, status })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
