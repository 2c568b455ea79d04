//! Cookie-based participant sessions.
//!
//! The cookie is the sole session mechanism — there is no server-side
//! session table. Its value is `<uuid>.<hex sha256(secret ‖ uuid)>`: signed
//! but not encrypted, so the participant id is opaque to tampering without
//! being hidden.

use axum::http::{HeaderMap, header};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Cookie holding the signed participant id.
pub const SESSION_COOKIE: &str = "expeditioner-id";

const SECONDS_PER_DAY: i64 = 86_400;

fn signature(secret: &str, id: Uuid) -> String {
  let mut hasher = Sha256::new();
  hasher.update(secret.as_bytes());
  hasher.update(id.as_bytes());
  hex::encode(hasher.finalize())
}

/// Produce the signed cookie value for a participant id.
pub fn issue(secret: &str, id: Uuid) -> String {
  format!("{id}.{}", signature(secret, id))
}

/// Recover the participant id from a cookie value, rejecting anything with
/// a malformed id or a signature that does not verify.
pub fn verify(secret: &str, value: &str) -> Option<Uuid> {
  let (id_part, sig) = value.split_once('.')?;
  let id = Uuid::parse_str(id_part).ok()?;
  (sig == signature(secret, id)).then_some(id)
}

/// Extract a named cookie from the request headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
  headers.get_all(header::COOKIE).iter().find_map(|value| {
    value.to_str().ok()?.split(';').find_map(|pair| {
      let (k, v) = pair.trim().split_once('=')?;
      (k == name).then_some(v)
    })
  })
}

/// The verified participant id carried by the request, if any.
pub fn session_id(headers: &HeaderMap, secret: &str) -> Option<Uuid> {
  verify(secret, cookie_value(headers, SESSION_COOKIE)?)
}

/// `Set-Cookie` value establishing a session. Site-wide, http-only; the
/// expiry horizon is a policy knob, not a correctness property.
pub fn set_cookie(secret: &str, id: Uuid, ttl_days: i64) -> String {
  format!(
    "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
    issue(secret, id),
    ttl_days * SECONDS_PER_DAY,
  )
}

/// `Set-Cookie` value clearing the session.
pub fn clear_cookie() -> String {
  format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
