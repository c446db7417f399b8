//! HTTP Basic authentication against the `users` table, and the role gate.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::{FromRequestParts, Request, State},
  http::{HeaderMap, Method, header, request::Parts},
  middleware::Next,
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rand_core::OsRng;
use roots_api::ApiError;
use roots_core::{store::GenealogyStore, user::User};

use crate::{AppState, error::Error};

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash `password` into an argon2id PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Check `password` against a stored PHC string. Malformed hashes never
/// verify.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(password_hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// Argon2 is slow; the async variants keep it off the runtime workers.

pub async fn verify_password_blocking(password: String, password_hash: String) -> bool {
  tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
    .await
    .unwrap_or(false)
}

pub async fn hash_password_blocking(password: String) -> Result<String, Error> {
  tokio::task::spawn_blocking(move || hash_password(&password))
    .await
    .map_err(|e| Error::PasswordHash(e.to_string()))?
}

// ─── Basic auth ──────────────────────────────────────────────────────────────

/// Decode `Authorization: Basic <base64(user:pass)>`.
pub fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), Error> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded.trim()).map_err(|_| Error::Unauthorized)?;
  let creds = String::from_utf8(decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;
  Ok((username.to_owned(), password.to_owned()))
}

/// Look up the user named in the request's Basic credentials and verify the
/// password.
pub async fn verify_auth<S: GenealogyStore>(
  headers: &HeaderMap,
  store: &S,
) -> Result<User, Error> {
  let (username, password) = basic_credentials(headers)?;

  let user = store
    .get_user_by_username(username)
    .await
    .map_err(ApiError::store)?
    .ok_or(Error::Unauthorized)?;

  if !verify_password_blocking(password, user.password_hash.clone()).await {
    return Err(Error::Unauthorized);
  }
  Ok(user)
}

// ─── Middleware ──────────────────────────────────────────────────────────────

/// The authenticated caller, attached to the request by [`authenticate`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Reject unauthenticated requests; attach [`CurrentUser`] to the rest.
pub async fn authenticate<S: GenealogyStore + 'static>(
  State(state): State<AppState<S>>,
  mut req: Request,
  next: Next,
) -> Result<Response, Error> {
  let headers = req.headers().clone();
  let user = verify_auth(&headers, state.store.as_ref())
    .await
    .inspect_err(|_| tracing::debug!(uri = %req.uri(), "authentication failed"))?;
  req.extensions_mut().insert(CurrentUser(user));
  Ok(next.run(req).await)
}

/// Viewers may only read; writes need `editor` or `admin`.
pub async fn role_gate(req: Request, next: Next) -> Result<Response, Error> {
  let CurrentUser(user) = req
    .extensions()
    .get::<CurrentUser>()
    .ok_or(Error::Unauthorized)?;

  if !is_safe(req.method()) && !user.role.can_write() {
    tracing::info!(username = %user.username, method = %req.method(), "write refused for viewer");
    return Err(Error::Forbidden("read-only account"));
  }
  Ok(next.run(req).await)
}

fn is_safe(method: &Method) -> bool {
  matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<CurrentUser>()
      .cloned()
      .ok_or(Error::Unauthorized)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  fn basic(user: &str, pass: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let encoded = B64.encode(format!("{user}:{pass}"));
    headers.insert(
      header::AUTHORIZATION,
      HeaderValue::from_str(&format!("Basic {encoded}")).unwrap(),
    );
    headers
  }

  #[test]
  fn hash_then_verify() {
    let hash = hash_password("secret").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("secret", &hash));
    assert!(!verify_password("wrong", &hash));
  }

  #[test]
  fn salts_differ() {
    assert_ne!(hash_password("secret").unwrap(), hash_password("secret").unwrap());
  }

  #[tokio::test]
  async fn blocking_variants_agree() {
    let hash = hash_password_blocking("correct horse".into()).await.unwrap();
    assert!(verify_password("correct horse", &hash));
    assert!(verify_password_blocking("correct horse".into(), hash.clone()).await);
    assert!(!verify_password_blocking("battery".into(), hash).await);
  }

  #[test]
  fn malformed_hash_never_verifies() {
    assert!(!verify_password("secret", "not-a-phc-string"));
  }

  #[test]
  fn credentials_are_decoded() {
    let (user, pass) = basic_credentials(&basic("admin", "pa:ss")).unwrap();
    assert_eq!(user, "admin");
    // Only the first colon separates.
    assert_eq!(pass, "pa:ss");
  }

  #[test]
  fn missing_header() {
    assert!(matches!(
      basic_credentials(&HeaderMap::new()),
      Err(Error::Unauthorized)
    ));
  }

  #[test]
  fn invalid_base64() {
    let mut headers = HeaderMap::new();
    headers.insert(
      header::AUTHORIZATION,
      HeaderValue::from_static("Basic !!!not-base64!!!"),
    );
    assert!(matches!(basic_credentials(&headers), Err(Error::Unauthorized)));
  }

  #[test]
  fn bearer_scheme_is_rejected() {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
    assert!(matches!(basic_credentials(&headers), Err(Error::Unauthorized)));
  }
}
