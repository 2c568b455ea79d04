//! The auto-join flow.
//!
//! A returning participant who opens a join link already carries a session
//! cookie, so the client asks the server to enroll them silently with their
//! on-file name and birthday instead of presenting the manual form. The
//! attempt happens exactly once per page load: any failure short of a dead
//! link reports `failed` with a 200 so the client falls back to the manual
//! form — never a retry loop, never an error page.

use axum::{
  Json,
  extract::{Path, State},
  http::HeaderMap,
};
use clairiere_core::{
  resolver::{self, JoinError, JoinStatus},
  store::ExpeditionStore,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError, session};

/// How the silent attempt resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoJoinStatus {
  /// The participant was enrolled without interaction.
  AutoJoined,
  /// They were already in this expedition; nothing changed.
  AlreadyMember,
  /// No usable session or a transient store failure — show the manual form.
  Failed,
}

#[derive(Debug, Serialize)]
pub struct AutoJoinResponse {
  pub status: AutoJoinStatus,
}

fn failed() -> Json<AutoJoinResponse> {
  Json(AutoJoinResponse { status: AutoJoinStatus::Failed })
}

/// `POST /expeditions/:id/auto-join`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  headers: HeaderMap,
) -> Result<Json<AutoJoinResponse>, ApiError>
where
  S: ExpeditionStore + Clone + Send + Sync + 'static,
{
  let Some(expeditioner_id) =
    session::session_id(&headers, &state.config.session_secret)
  else {
    return Ok(failed());
  };

  let expeditioner = match state.store.get_expeditioner(expeditioner_id).await
  {
    Ok(Some(e)) => e,
    Ok(None) => return Ok(failed()),
    Err(e) => {
      tracing::warn!(error = %e, "auto-join lookup failed");
      return Ok(failed());
    }
  };

  match resolver::join_resolved(
    &*state.store,
    id,
    &expeditioner.name,
    expeditioner.birthday,
  )
  .await
  {
    Ok(outcome) => {
      let status = match outcome.status {
        JoinStatus::AlreadyMember => AutoJoinStatus::AlreadyMember,
        JoinStatus::Created | JoinStatus::Joined => AutoJoinStatus::AutoJoined,
      };
      Ok(Json(AutoJoinResponse { status }))
    }
    // A dead join link is a real 404; the manual form could not help.
    Err(JoinError::ExpeditionNotFound(id)) => {
      Err(ApiError::NotFound(format!("expedition {id} not found")))
    }
    Err(e) => {
      tracing::warn!(error = %e, "auto-join attempt failed");
      Ok(failed())
    }
  }
}
