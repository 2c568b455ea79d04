//! Handlers for `/expeditions` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/expeditions` | Newest first |
//! | `POST` | `/expeditions` | Body: `{"name":"Forest Trail"}` |
//! | `GET`  | `/expeditions/latest` | Newest expedition, 404 if none |
//! | `GET`  | `/expeditions/:id` | Includes participant count, 404 if absent |
//! | `POST` | `/expeditions/:id` | Join; sets the session cookie on success |

use axum::{
  Json,
  extract::{Path, State},
  http::header,
  response::IntoResponse,
};
use clairiere_core::{
  expedition::{Expedition, ExpeditionSummary},
  resolver,
  store::ExpeditionStore,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, error::ApiError, session};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `POST /expeditions` — body: `{"name":"Forest Trail"}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<Json<Expedition>, ApiError>
where
  S: ExpeditionStore + Clone + Send + Sync + 'static,
{
  let name = body.name.trim().to_owned();
  if name.is_empty() {
    return Err(ApiError::Validation(
      "expedition name must not be blank".to_string(),
    ));
  }
  let expedition = state.store.add_expedition(name).await?;
  Ok(Json(expedition))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /expeditions`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Expedition>>, ApiError>
where
  S: ExpeditionStore + Clone + Send + Sync + 'static,
{
  let expeditions = state.store.list_expeditions().await?;
  Ok(Json(expeditions))
}

/// `GET /expeditions/latest`
pub async fn latest<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Expedition>, ApiError>
where
  S: ExpeditionStore + Clone + Send + Sync + 'static,
{
  let expedition = state
    .store
    .latest_expedition()
    .await?
    .ok_or_else(|| ApiError::NotFound("no expeditions yet".to_string()))?;
  Ok(Json(expedition))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /expeditions/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ExpeditionSummary>, ApiError>
where
  S: ExpeditionStore + Clone + Send + Sync + 'static,
{
  let summary = state
    .store
    .get_expedition(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("expedition {id} not found")))?;
  Ok(Json(summary))
}

// ─── Join ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JoinBody {
  pub name:     String,
  pub birthday: String,
}

/// `POST /expeditions/:id` — body: `{"name":"Bob","birthday":"1985-05-05"}`
///
/// Resolves the `(name, birthday)` identity, enrolls it, and binds the
/// client to the participant with a session cookie.
pub async fn join<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<JoinBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ExpeditionStore + Clone + Send + Sync + 'static,
{
  let outcome =
    resolver::resolve_and_join(&*state.store, id, &body.name, &body.birthday)
      .await?;

  tracing::info!(
    expedition = %id,
    expeditioner = %outcome.expeditioner.id,
    status = ?outcome.status,
    "join resolved"
  );

  let cookie = session::set_cookie(
    &state.config.session_secret,
    outcome.expeditioner.id,
    state.config.session_ttl_days,
  );

  Ok((
    [(header::SET_COOKIE, cookie)],
    Json(json!({
      "message": "successfully joined expedition",
      "status": outcome.status,
      "expeditioner": outcome.expeditioner,
    })),
  ))
}
