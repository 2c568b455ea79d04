//! Session-derived profile endpoints.

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, header},
  response::IntoResponse,
};
use chrono::{DateTime, NaiveDate, Utc};
use clairiere_core::{expedition::ExpeditionSummary, store::ExpeditionStore};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, error::ApiError, session};

/// What `GET /user` returns: the participant plus their joined expeditions,
/// newest first.
#[derive(Debug, Serialize)]
pub struct UserProfile {
  pub id:                Uuid,
  pub name:              String,
  pub birthday:          NaiveDate,
  pub created_at:        DateTime<Utc>,
  pub expeditions:       Vec<ExpeditionSummary>,
  pub total_expeditions: usize,
}

/// `GET /user`
///
/// 401 when the cookie is absent, fails signature verification, or names a
/// participant that no longer exists.
pub async fn profile<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Json<UserProfile>, ApiError>
where
  S: ExpeditionStore + Clone + Send + Sync + 'static,
{
  let id = session::session_id(&headers, &state.config.session_secret)
    .ok_or(ApiError::Unauthenticated)?;

  let expeditioner = state
    .store
    .get_expeditioner(id)
    .await?
    .ok_or(ApiError::Unauthenticated)?;

  let expeditions = state.store.expeditions_for(id).await?;
  let total_expeditions = expeditions.len();

  Ok(Json(UserProfile {
    id:         expeditioner.id,
    name:       expeditioner.name,
    birthday:   expeditioner.birthday,
    created_at: expeditioner.created_at,
    expeditions,
    total_expeditions,
  }))
}

/// `DELETE /user` — clear the session cookie.
///
/// Succeeds whether or not a cookie was present.
pub async fn logout() -> impl IntoResponse {
  (
    [(header::SET_COOKIE, session::clear_cookie())],
    Json(json!({ "message": "successfully logged out" })),
  )
}
