//! Admin authentication and the gated management endpoints.
//!
//! Access control is a single shared password compared in plain text against
//! the configured secret — a recorded limitation of the original design, not
//! per-admin identity.

use axum::{
  Json,
  extract::{Path, State},
  http::{StatusCode, header},
  response::IntoResponse,
};
use clairiere_core::{expedition::Expedition, store::ExpeditionStore};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, error::ApiError, gate};

// ─── Auth ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub password: String,
}

/// `POST /admin-auth` — body: `{"password":"..."}`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> impl IntoResponse
where
  S: ExpeditionStore + Clone + Send + Sync + 'static,
{
  if body.password == state.config.admin_password {
    (
      StatusCode::OK,
      [(header::SET_COOKIE, gate::set_cookie())],
      Json(json!({ "success": true })),
    )
      .into_response()
  } else {
    tracing::warn!("admin login attempt with wrong password");
    (
      StatusCode::UNAUTHORIZED,
      Json(json!({ "success": false, "message": "invalid password" })),
    )
      .into_response()
  }
}

/// `POST /admin-auth/logout`
pub async fn logout() -> impl IntoResponse {
  (
    [(header::SET_COOKIE, gate::clear_cookie())],
    Json(json!({ "success": true })),
  )
}

/// `GET /admin/login` — the gate's redirect target. Ungated.
pub async fn login_page() -> impl IntoResponse {
  Json(json!({ "message": "admin login required" }))
}

// ─── Gated management routes ──────────────────────────────────────────────────

/// `GET /admin` — what the management view lists.
pub async fn overview<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Expedition>>, ApiError>
where
  S: ExpeditionStore + Clone + Send + Sync + 'static,
{
  let expeditions = state.store.list_expeditions().await?;
  Ok(Json(expeditions))
}

/// `DELETE /admin/expeditions/:id`
pub async fn delete_expedition<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ExpeditionStore + Clone + Send + Sync + 'static,
{
  state.store.delete_expedition(id).await?;
  tracing::info!(expedition = %id, "expedition deleted");
  Ok(Json(json!({ "message": "expedition deleted" })))
}
