//! Handler for the landing-page email capture.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use clairiere_core::store::ExpeditionStore;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct SubscribeBody {
  pub email: String,
}

/// `POST /subscribe` — body: `{"email":"..."}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<SubscribeBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ExpeditionStore + Clone + Send + Sync + 'static,
{
  let email = body.email.trim().to_owned();
  // Same shallow check the landing page applies; nothing fancier is needed
  // for an opt-in list.
  if email.is_empty() || !email.contains('@') {
    return Err(ApiError::Validation("invalid email address".to_string()));
  }

  let subscriber = state.store.add_subscriber(email).await?;

  Ok((
    StatusCode::CREATED,
    Json(json!({
      "message": "successfully subscribed",
      "subscriber": subscriber,
    })),
  ))
}
