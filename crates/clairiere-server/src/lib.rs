//! HTTP layer for the Clairière expedition service.
//!
//! Exposes an axum [`Router`] backed by any
//! [`clairiere_core::store::ExpeditionStore`]. The store is constructed once
//! at startup and threaded through handlers as shared state; TLS and
//! reverse-proxy concerns are the deployment's responsibility.

pub mod admin;
pub mod autojoin;
pub mod error;
pub mod expeditions;
pub mod gate;
pub mod session;
pub mod subscribe;
pub mod user;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router, middleware,
  routing::{delete, get, post},
};
use clairiere_core::store::ExpeditionStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub store_path:       PathBuf,
  /// The single shared management secret, compared verbatim.
  pub admin_password:   String,
  /// Key for signing session cookies.
  pub session_secret:   String,
  #[serde(default = "default_session_ttl_days")]
  pub session_ttl_days: i64,
}

fn default_session_ttl_days() -> i64 { 365 }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ExpeditionStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
///
/// Everything under `/admin` except the login page goes through the admin
/// gate before reaching a handler.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ExpeditionStore + Clone + Send + Sync + 'static,
{
  let gated = Router::new()
    .route("/admin", get(admin::overview::<S>))
    .route("/admin/expeditions/{id}", delete(admin::delete_expedition::<S>))
    .route_layer(middleware::from_fn(gate::admin_gate));

  Router::new()
    .route("/subscribe", post(subscribe::create::<S>))
    .route(
      "/expeditions",
      get(expeditions::list::<S>).post(expeditions::create::<S>),
    )
    .route("/expeditions/latest", get(expeditions::latest::<S>))
    .route(
      "/expeditions/{id}",
      get(expeditions::get_one::<S>).post(expeditions::join::<S>),
    )
    .route("/expeditions/{id}/auto-join", post(autojoin::handler::<S>))
    .route("/user", get(user::profile::<S>).delete(user::logout))
    .route("/admin-auth", post(admin::login::<S>))
    .route("/admin-auth/logout", post(admin::logout))
    .route("/admin/login", get(admin::login_page))
    .merge(gated)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use clairiere_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState {
      store:  Arc::new(store),
      config: Arc::new(ServerConfig {
        host:             "127.0.0.1".to_string(),
        port:             8080,
        store_path:       PathBuf::from(":memory:"),
        admin_password:   "hunter2".to_string(),
        session_secret:   "test-secret".to_string(),
        session_ttl_days: 365,
      }),
    }
  }

  async fn request(
    state:   AppState<SqliteStore>,
    method:  &str,
    uri:     &str,
    cookie:  Option<&str>,
    body:    Option<Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
      builder = builder.header(header::COOKIE, cookie);
    }
    let req = match body {
      Some(json) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    router(state).oneshot(req).await.unwrap()
  }

  async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  /// Extract the `name=value` pair from a response's Set-Cookie header.
  fn set_cookie_pair(resp: &axum::response::Response) -> String {
    resp
      .headers()
      .get(header::SET_COOKIE)
      .unwrap()
      .to_str()
      .unwrap()
      .split(';')
      .next()
      .unwrap()
      .to_string()
  }

  // ── Subscribe ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn subscribe_returns_201() {
    let state = make_state().await;
    let resp = request(
      state,
      "POST",
      "/subscribe",
      None,
      Some(json!({ "email": "alice@example.com" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["subscriber"]["email"], "alice@example.com");
  }

  #[tokio::test]
  async fn subscribe_rejects_invalid_and_duplicate_email() {
    let state = make_state().await;

    let resp = request(
      state.clone(),
      "POST",
      "/subscribe",
      None,
      Some(json!({ "email": "not-an-email" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let first = request(
      state.clone(),
      "POST",
      "/subscribe",
      None,
      Some(json!({ "email": "alice@example.com" })),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = request(
      state,
      "POST",
      "/subscribe",
      None,
      Some(json!({ "email": "alice@example.com" })),
    )
    .await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body = body_json(second).await;
    assert_eq!(body["error"], "this email is already subscribed");
  }

  // ── Expeditions ─────────────────────────────────────────────────────────

  async fn create_expedition(
    state: &AppState<SqliteStore>,
    name: &str,
  ) -> String {
    let resp = request(
      state.clone(),
      "POST",
      "/expeditions",
      None,
      Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await["id"].as_str().unwrap().to_string()
  }

  #[tokio::test]
  async fn expeditions_list_newest_first() {
    let state = make_state().await;
    create_expedition(&state, "First").await;
    create_expedition(&state, "Second").await;

    let resp = request(state.clone(), "GET", "/expeditions", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body[0]["name"], "Second");
    assert_eq!(body[1]["name"], "First");

    let latest =
      request(state, "GET", "/expeditions/latest", None, None).await;
    assert_eq!(body_json(latest).await["name"], "Second");
  }

  #[tokio::test]
  async fn unknown_expedition_is_404() {
    let state = make_state().await;
    let resp = request(
      state,
      "GET",
      "/expeditions/00000000-0000-0000-0000-000000000000",
      None,
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Join ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn join_sets_session_cookie_and_counts_participant() {
    let state = make_state().await;
    let id = create_expedition(&state, "Forest Trail").await;

    let resp = request(
      state.clone(),
      "POST",
      &format!("/expeditions/{id}"),
      None,
      Some(json!({ "name": "Bob", "birthday": "1985-05-05" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = set_cookie_pair(&resp);
    assert!(cookie.starts_with("expeditioner-id="), "cookie: {cookie}");
    let body = body_json(resp).await;
    assert_eq!(body["status"], "created");

    let resp = request(
      state,
      "GET",
      &format!("/expeditions/{id}"),
      None,
      None,
    )
    .await;
    let body = body_json(resp).await;
    assert_eq!(body["expeditioner_count"], 1);
  }

  #[tokio::test]
  async fn joining_twice_reports_already_member() {
    let state = make_state().await;
    let id = create_expedition(&state, "Forest Trail").await;
    let body = json!({ "name": "Bob", "birthday": "1985-05-05" });

    let first = request(
      state.clone(),
      "POST",
      &format!("/expeditions/{id}"),
      None,
      Some(body.clone()),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = request(
      state.clone(),
      "POST",
      &format!("/expeditions/{id}"),
      None,
      Some(body),
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_json(second).await["status"], "already_member");

    let resp =
      request(state, "GET", &format!("/expeditions/{id}"), None, None).await;
    assert_eq!(body_json(resp).await["expeditioner_count"], 1);
  }

  #[tokio::test]
  async fn join_validation_failures_are_400() {
    let state = make_state().await;
    let id = create_expedition(&state, "Forest Trail").await;

    let blank_name = request(
      state.clone(),
      "POST",
      &format!("/expeditions/{id}"),
      None,
      Some(json!({ "name": "   ", "birthday": "1985-05-05" })),
    )
    .await;
    assert_eq!(blank_name.status(), StatusCode::BAD_REQUEST);

    let bad_birthday = request(
      state,
      "POST",
      &format!("/expeditions/{id}"),
      None,
      Some(json!({ "name": "Bob", "birthday": "soon" })),
    )
    .await;
    assert_eq!(bad_birthday.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn join_against_missing_expedition_is_404() {
    let state = make_state().await;
    let resp = request(
      state,
      "POST",
      "/expeditions/00000000-0000-0000-0000-000000000000",
      None,
      Some(json!({ "name": "Bob", "birthday": "1985-05-05" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── User profile ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn user_without_cookie_is_401() {
    let state = make_state().await;
    let resp = request(state, "GET", "/user", None, None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn user_with_tampered_cookie_is_401() {
    let state = make_state().await;
    let forged = format!(
      "expeditioner-id={}.{}",
      uuid::Uuid::new_v4(),
      "0".repeat(64)
    );
    let resp = request(state, "GET", "/user", Some(&forged), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn end_to_end_join_then_profile() {
    let state = make_state().await;
    let id = create_expedition(&state, "Forest Trail").await;

    let join = request(
      state.clone(),
      "POST",
      &format!("/expeditions/{id}"),
      None,
      Some(json!({ "name": "Bob", "birthday": "1985-05-05" })),
    )
    .await;
    let cookie = set_cookie_pair(&join);

    let resp = request(state, "GET", "/user", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let profile = body_json(resp).await;
    assert_eq!(profile["name"], "Bob");
    assert_eq!(profile["birthday"], "1985-05-05");
    assert_eq!(profile["total_expeditions"], 1);
    assert_eq!(profile["expeditions"][0]["name"], "Forest Trail");
    assert_eq!(profile["expeditions"][0]["expeditioner_count"], 1);
  }

  #[tokio::test]
  async fn logout_clears_cookie_even_without_one() {
    let state = make_state().await;
    let resp = request(state, "DELETE", "/user", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = set_cookie_pair(&resp);
    assert_eq!(cookie, "expeditioner-id=");
  }

  // ── Auto-join ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn auto_join_enrolls_returning_participant() {
    let state = make_state().await;
    let first = create_expedition(&state, "Forest Trail").await;
    let second = create_expedition(&state, "River Crossing").await;

    let join = request(
      state.clone(),
      "POST",
      &format!("/expeditions/{first}"),
      None,
      Some(json!({ "name": "Bob", "birthday": "1985-05-05" })),
    )
    .await;
    let cookie = set_cookie_pair(&join);

    let resp = request(
      state.clone(),
      "POST",
      &format!("/expeditions/{second}/auto-join"),
      Some(&cookie),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "auto_joined");

    let again = request(
      state,
      "POST",
      &format!("/expeditions/{second}/auto-join"),
      Some(&cookie),
      None,
    )
    .await;
    assert_eq!(body_json(again).await["status"], "already_member");
  }

  #[tokio::test]
  async fn auto_join_without_session_falls_back_to_manual_form() {
    let state = make_state().await;
    let id = create_expedition(&state, "Forest Trail").await;

    let resp = request(
      state,
      "POST",
      &format!("/expeditions/{id}/auto-join"),
      None,
      None,
    )
    .await;
    // 200 with `failed`, not an error: the client shows the manual form.
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "failed");
  }

  // ── Admin gate ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn admin_routes_redirect_to_login_without_cookie() {
    let state = make_state().await;

    let resp = request(state.clone(), "GET", "/admin", None, None).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
      resp.headers().get(header::LOCATION).unwrap(),
      "/admin/login"
    );

    // A wrong-valued cookie is no better than none.
    let resp = request(
      state.clone(),
      "GET",
      "/admin",
      Some("admin-auth=false"),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    // The login page itself is reachable.
    let resp = request(state, "GET", "/admin/login", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn wrong_password_is_401_without_cookie() {
    let state = make_state().await;
    let resp = request(
      state,
      "POST",
      "/admin-auth",
      None,
      Some(json!({ "password": "wrong" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(!resp.headers().contains_key(header::SET_COOKIE));
  }

  #[tokio::test]
  async fn correct_password_grants_admin_access() {
    let state = make_state().await;
    let id = create_expedition(&state, "Forest Trail").await;

    let login = request(
      state.clone(),
      "POST",
      "/admin-auth",
      None,
      Some(json!({ "password": "hunter2" })),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    let cookie = set_cookie_pair(&login);
    assert_eq!(cookie, "admin-auth=true");

    let overview =
      request(state.clone(), "GET", "/admin", Some(&cookie), None).await;
    assert_eq!(overview.status(), StatusCode::OK);

    let delete = request(
      state.clone(),
      "DELETE",
      &format!("/admin/expeditions/{id}"),
      Some(&cookie),
      None,
    )
    .await;
    assert_eq!(delete.status(), StatusCode::OK);

    let gone =
      request(state, "GET", &format!("/expeditions/{id}"), None, None).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn admin_logout_clears_cookie() {
    let state = make_state().await;
    let resp = request(state, "POST", "/admin-auth/logout", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(set_cookie_pair(&resp), "admin-auth=");
  }
}
