//! The `ExpeditionStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `clairiere-store-sqlite`). The HTTP layer and the identity resolver depend
//! on this abstraction, not on any concrete backend. A store instance is
//! constructed once at process startup and injected into request handlers;
//! it is the only shared state in the system.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  Result,
  expedition::{Expedition, ExpeditionSummary},
  expeditioner::Expeditioner,
  subscriber::EmailSubscriber,
};

/// Abstraction over the persistence gateway for the three record kinds.
///
/// Uniqueness constraints — subscriber email, and the expeditioner
/// `(name, birthday)` pair — are enforced by the backend and reported as the
/// corresponding [`StoreError`](crate::StoreError) variants, never as raw
/// backend errors.
pub trait ExpeditionStore: Send + Sync {
  // ── Subscribers ───────────────────────────────────────────────────────

  /// Persist a new email opt-in.
  ///
  /// Returns `StoreError::DuplicateEmail` if the address is already
  /// subscribed.
  fn add_subscriber(
    &self,
    email: String,
  ) -> impl Future<Output = Result<EmailSubscriber>> + Send + '_;

  // ── Expeditions ───────────────────────────────────────────────────────

  /// Create a new expedition.
  fn add_expedition(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Expedition>> + Send + '_;

  /// List all expeditions, newest first.
  fn list_expeditions(
    &self,
  ) -> impl Future<Output = Result<Vec<Expedition>>> + Send + '_;

  /// The most recently created expedition, if any.
  fn latest_expedition(
    &self,
  ) -> impl Future<Output = Result<Option<Expedition>>> + Send + '_;

  /// Retrieve an expedition with its participant count. `None` if absent.
  fn get_expedition(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ExpeditionSummary>>> + Send + '_;

  /// Delete an expedition, cascading the membership relation only —
  /// participant records survive.
  ///
  /// Returns `StoreError::ExpeditionNotFound` if there is nothing to delete.
  fn delete_expedition(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  // ── Expeditioners ─────────────────────────────────────────────────────

  /// Create a participant record.
  ///
  /// Returns `StoreError::DuplicateExpeditioner` if `(name, birthday)` is
  /// already taken — the backstop for concurrent identical joins.
  fn create_expeditioner(
    &self,
    name: String,
    birthday: NaiveDate,
  ) -> impl Future<Output = Result<Expeditioner>> + Send + '_;

  /// Look up a participant by the `(name, birthday)` identity key.
  fn find_expeditioner(
    &self,
    name: String,
    birthday: NaiveDate,
  ) -> impl Future<Output = Result<Option<Expeditioner>>> + Send + '_;

  /// Retrieve a participant by id. Returns `None` if not found.
  fn get_expeditioner(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Expeditioner>>> + Send + '_;

  // ── Memberships ───────────────────────────────────────────────────────

  /// Relate a participant to an expedition. Idempotent: returns `true` if a
  /// new relation was created, `false` if it already existed. Existing
  /// relations to other expeditions are never touched.
  fn add_membership(
    &self,
    expeditioner_id: Uuid,
    expedition_id: Uuid,
  ) -> impl Future<Output = Result<bool>> + Send + '_;

  /// Whether the participant is already related to the expedition.
  fn is_member(
    &self,
    expeditioner_id: Uuid,
    expedition_id: Uuid,
  ) -> impl Future<Output = Result<bool>> + Send + '_;

  /// All expeditions the participant has joined, newest first, each with
  /// its participant count.
  fn expeditions_for(
    &self,
    expeditioner_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ExpeditionSummary>>> + Send + '_;
}
