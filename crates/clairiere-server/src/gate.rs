//! The admin gate: a cookie check in front of every `/admin` route.
//!
//! The cookie is a boolean marker set by `POST /admin-auth` after a password
//! match. Anything other than the literal `true` sends the client to the
//! login page. The login page itself and the auth endpoints sit outside the
//! gated prefix.

use axum::{
  extract::Request,
  http::HeaderMap,
  middleware::Next,
  response::{IntoResponse, Redirect, Response},
};

use crate::session::cookie_value;

/// Cookie granting access to management routes.
pub const ADMIN_COOKIE: &str = "admin-auth";

const ADMIN_COOKIE_SET: &str = "true";

/// Whether the request carries a valid admin cookie.
pub fn is_admin(headers: &HeaderMap) -> bool {
  cookie_value(headers, ADMIN_COOKIE) == Some(ADMIN_COOKIE_SET)
}

/// Middleware applied to the `/admin` route group.
pub async fn admin_gate(req: Request, next: Next) -> Response {
  if is_admin(req.headers()) {
    next.run(req).await
  } else {
    Redirect::to("/admin/login").into_response()
  }
}

/// `Set-Cookie` value granting admin access for a year.
pub fn set_cookie() -> String {
  format!(
    "{ADMIN_COOKIE}={ADMIN_COOKIE_SET}; Path=/; HttpOnly; Secure; \
     SameSite=Strict; Max-Age=31536000"
  )
}

/// `Set-Cookie` value revoking admin access.
pub fn clear_cookie() -> String {
  format!(
    "{ADMIN_COOKIE}=; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age=0"
  )
}

#[cfg(test)]
mod tests {
  use axum::http::{HeaderValue, header};

  use super::*;

  fn headers_with_cookie(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_static(value));
    headers
  }

  #[test]
  fn literal_true_is_admin() {
    assert!(is_admin(&headers_with_cookie("admin-auth=true")));
  }

  #[test]
  fn anything_else_is_not() {
    assert!(!is_admin(&HeaderMap::new()));
    assert!(!is_admin(&headers_with_cookie("admin-auth=TRUE")));
    assert!(!is_admin(&headers_with_cookie("admin-auth=1")));
    assert!(!is_admin(&headers_with_cookie("other=true")));
  }
}
