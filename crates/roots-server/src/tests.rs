use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use roots_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt as _;

use super::*;

const ADMIN: (&str, &str) = ("admin", "correct horse battery");

async fn make_state() -> (AppState<SqliteStore>, TempDir) {
  let dir = tempfile::tempdir().unwrap();
  let store = SqliteStore::open_in_memory().await.unwrap();
  let config = ServerConfig {
    store_path: PathBuf::from(":memory:"),
    upload_dir: dir.path().join("uploads"),
    admin_username: Some(ADMIN.0.to_string()),
    admin_password: Some(ADMIN.1.to_string()),
    ..ServerConfig::default()
  };
  seed_admin(&store, &config).await.unwrap();
  let state = AppState { store: Arc::new(store), config: Arc::new(config) };
  (state, dir)
}

fn auth_header((user, pass): (&str, &str)) -> String {
  format!("Basic {}", B64.encode(format!("{user}:{pass}")))
}

async fn oneshot(
  state: &AppState<SqliteStore>,
  method: &str,
  uri: &str,
  creds: Option<(&str, &str)>,
  body: Option<Value>,
) -> axum::response::Response {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(creds) = creds {
    builder = builder.header(header::AUTHORIZATION, auth_header(creds));
  }
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  router(state.clone()).oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn create_user(state: &AppState<SqliteStore>, username: &str, role: &str) {
  let resp = oneshot(
    state,
    "POST",
    "/api/users",
    Some(ADMIN),
    Some(json!({ "username": username, "password": "long enough pw", "role": role })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
}

// ── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_needs_no_credentials() {
  let (state, _dir) = make_state().await;
  let resp = oneshot(&state, "GET", "/health", None, None).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

// ── Authentication ──────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_credentials_are_401_with_challenge() {
  let (state, _dir) = make_state().await;
  let resp = oneshot(&state, "GET", "/api/places", None, None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let challenge = resp.headers()[header::WWW_AUTHENTICATE].to_str().unwrap();
  assert!(challenge.starts_with("Basic"), "{challenge}");
}

#[tokio::test]
async fn wrong_password_is_401() {
  let (state, _dir) = make_state().await;
  let resp = oneshot(&state, "GET", "/api/places", Some((ADMIN.0, "nope")), None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_user_is_401() {
  let (state, _dir) = make_state().await;
  let resp = oneshot(&state, "GET", "/api/places", Some(("ghost", ADMIN.1)), None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_can_write_records() {
  let (state, _dir) = make_state().await;
  let resp = oneshot(
    &state,
    "POST",
    "/api/persons",
    Some(ADMIN),
    Some(json!({ "given_name": "Jane", "surname": "Doe" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let resp = oneshot(&state, "GET", "/api/search?q=doe", Some(ADMIN), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let found: Value = serde_json::from_slice(&bytes).unwrap();
  assert_eq!(found.as_array().unwrap().len(), 1);
}

// ── Roles ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn viewer_can_read_but_not_write() {
  let (state, _dir) = make_state().await;
  create_user(&state, "reader", "viewer").await;
  let viewer = ("reader", "long enough pw");

  let resp = oneshot(&state, "GET", "/api/places", Some(viewer), None).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = oneshot(
    &state,
    "POST",
    "/api/places",
    Some(viewer),
    Some(json!({ "name": "Savannah" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let id = uuid::Uuid::new_v4();
  let resp = oneshot(&state, "DELETE", &format!("/api/persons/{id}"), Some(viewer), None).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn editor_can_write() {
  let (state, _dir) = make_state().await;
  create_user(&state, "clerk", "editor").await;

  let resp = oneshot(
    &state,
    "POST",
    "/api/sources",
    Some(("clerk", "long enough pw")),
    Some(json!({ "title": "1870 census, Chatham County" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
}

// ── User management ─────────────────────────────────────────────────────────

#[tokio::test]
async fn only_admin_manages_users() {
  let (state, _dir) = make_state().await;
  create_user(&state, "clerk", "editor").await;

  let resp = oneshot(
    &state,
    "POST",
    "/api/users",
    Some(("clerk", "long enough pw")),
    Some(json!({ "username": "other", "password": "long enough pw", "role": "admin" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn duplicate_username_is_409() {
  let (state, _dir) = make_state().await;
  create_user(&state, "clerk", "editor").await;

  let resp = oneshot(
    &state,
    "POST",
    "/api/users",
    Some(ADMIN),
    Some(json!({ "username": "clerk", "password": "long enough pw", "role": "viewer" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn short_password_is_rejected() {
  let (state, _dir) = make_state().await;
  let resp = oneshot(
    &state,
    "POST",
    "/api/users",
    Some(ADMIN),
    Some(json!({ "username": "clerk", "password": "short", "role": "viewer" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_json_never_contains_the_hash() {
  let (state, _dir) = make_state().await;
  let resp = oneshot(
    &state,
    "POST",
    "/api/users",
    Some(ADMIN),
    Some(json!({ "username": "clerk", "password": "long enough pw", "role": "viewer" })),
  )
  .await;
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let user: Value = serde_json::from_slice(&bytes).unwrap();
  assert_eq!(user["role"], "viewer");
  assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn viewer_can_change_own_password() {
  let (state, _dir) = make_state().await;
  create_user(&state, "reader", "viewer").await;

  let resp = oneshot(
    &state,
    "PUT",
    "/api/users/me/password",
    Some(("reader", "long enough pw")),
    Some(json!({ "current_password": "wrong", "new_password": "brand new secret" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let resp = oneshot(
    &state,
    "PUT",
    "/api/users/me/password",
    Some(("reader", "long enough pw")),
    Some(json!({ "current_password": "long enough pw", "new_password": "brand new secret" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);

  let old = oneshot(&state, "GET", "/api/places", Some(("reader", "long enough pw")), None).await;
  assert_eq!(old.status(), StatusCode::UNAUTHORIZED);
  let new = oneshot(&state, "GET", "/api/places", Some(("reader", "brand new secret")), None).await;
  assert_eq!(new.status(), StatusCode::OK);
}

// ── Seeding ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_is_seeded_once() {
  let (state, _dir) = make_state().await;
  assert_eq!(state.store.count_users().await.unwrap(), 1);
  let again = seed_admin(state.store.as_ref(), &state.config).await.unwrap();
  assert!(again.is_none());
  assert_eq!(state.store.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn nothing_is_seeded_without_credentials() {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let seeded = seed_admin(&store, &ServerConfig::default()).await.unwrap();
  assert!(seeded.is_none());
  assert_eq!(store.count_users().await.unwrap(), 0);
}

#[test]
fn config_defaults() {
  let config = ServerConfig::default();
  assert_eq!(config.host, "0.0.0.0");
  assert_eq!(config.port, 8000);
  assert_eq!(config.max_upload_bytes, 26_214_400);
  assert_eq!(config.upload_dir, PathBuf::from("/data/uploads"));
}

#[test]
fn env_values_are_not_reparsed() {
  let env = config::Map::from([
    ("ROOTS_ADMIN_PASSWORD".to_string(), "0012345678".to_string()),
    ("ROOTS_ADMIN_USERNAME".to_string(), "1e3".to_string()),
    ("ROOTS_PORT".to_string(), "9090".to_string()),
    ("ROOTS_MAX_UPLOAD_BYTES".to_string(), "1048576".to_string()),
  ]);
  let missing = std::path::Path::new("/nonexistent/roots.toml");
  let config = ServerConfig::load(missing, Some(env)).unwrap();
  assert_eq!(config.admin_password.as_deref(), Some("0012345678"));
  assert_eq!(config.admin_username.as_deref(), Some("1e3"));
  assert_eq!(config.port, 9090);
  assert_eq!(config.max_upload_bytes, 1_048_576);
  assert_eq!(config.host, "0.0.0.0");
}

#[test]
fn env_overrides_file() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("roots.toml");
  std::fs::write(&path, "port = 7000\nhost = \"127.0.0.1\"\n").unwrap();
  let env = config::Map::from([("ROOTS_PORT".to_string(), "7001".to_string())]);
  let config = ServerConfig::load(&path, Some(env)).unwrap();
  assert_eq!(config.port, 7001);
  assert_eq!(config.host, "127.0.0.1");
}

// ── Body limits ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn json_bodies_keep_the_default_limit() {
  let (state, _dir) = make_state().await;
  let huge = "x".repeat(3 * 1024 * 1024);
  let res = oneshot(
    &state,
    "POST",
    "/api/places",
    Some(ADMIN),
    Some(json!({ "name": huge })),
  )
  .await;
  assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
