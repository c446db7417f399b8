//! The Roots HTTP server.
//!
//! Wraps the [`roots_api`] router with HTTP Basic authentication against the
//! `users` table, a role gate, user management, request tracing and a
//! liveness endpoint.

pub mod auth;
pub mod error;
pub mod users;

pub use error::Error;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Router,
  middleware,
  routing::{get, post, put},
};
use roots_api::{ApiError, UploadConfig};
use roots_core::{
  store::GenealogyStore,
  user::{NewUser, Role, User},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROOTS_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub store_path:       PathBuf,
  pub upload_dir:       PathBuf,
  pub max_upload_bytes: usize,
  /// Seeded as an `admin` account when the user table is empty.
  pub admin_username:   Option<String>,
  pub admin_password:   Option<String>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "0.0.0.0".to_string(),
      port:             8000,
      store_path:       PathBuf::from("/data/roots.db"),
      upload_dir:       PathBuf::from("/data/uploads"),
      max_upload_bytes: 25 * 1024 * 1024,
      admin_username:   None,
      admin_password:   None,
    }
  }
}

impl ServerConfig {
  /// Layer `ROOTS_*` environment variables over the optional TOML file at
  /// `path`. `env` replaces the process environment when given.
  ///
  /// Values are kept as strings until deserialisation, so a numeric-looking
  /// password is never reformatted.
  pub fn load(
    path: &Path,
    env: Option<config::Map<String, String>>,
  ) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("ROOTS").source(env))
      .build()?
      .try_deserialize()
  }

  pub fn uploads(&self) -> UploadConfig {
    UploadConfig {
      dir:       self.upload_dir.clone(),
      max_bytes: self.max_upload_bytes,
    }
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through the server's own handlers and middleware.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), config: Arc::clone(&self.config) }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full application router.
///
/// `/health` is public; everything under `/api` requires Basic credentials.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: GenealogyStore + 'static,
{
  let records = roots_api::api_router(state.store.clone(), state.config.uploads())
    .layer(middleware::from_fn(auth::role_gate));

  let users = Router::new()
    .route("/users", post(users::create::<S>))
    .route("/users/me/password", put(users::change_password::<S>))
    .with_state(state.clone());

  let api = users.merge(records).layer(middleware::from_fn_with_state(
    state.clone(),
    auth::authenticate::<S>,
  ));

  Router::new()
    .route("/health", get(health))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str { "ok" }

// ─── Startup ─────────────────────────────────────────────────────────────────

/// Create the configured admin account if no user exists yet.
///
/// Returns the created user, or `None` when users already exist or no admin
/// credential is configured.
pub async fn seed_admin<S: GenealogyStore>(
  store: &S,
  config: &ServerConfig,
) -> Result<Option<User>, Error> {
  if store.count_users().await.map_err(ApiError::store)? > 0 {
    return Ok(None);
  }

  let (Some(username), Some(password)) =
    (config.admin_username.as_deref(), config.admin_password.as_deref())
  else {
    tracing::warn!(
      "no users exist and no admin credential is configured; \
       set ROOTS_ADMIN_USERNAME and ROOTS_ADMIN_PASSWORD"
    );
    return Ok(None);
  };

  let password_hash = auth::hash_password_blocking(password.to_owned()).await?;
  let user = store
    .create_user(NewUser {
      username:      username.to_owned(),
      password_hash,
      role:          Role::Admin,
    })
    .await
    .map_err(ApiError::store)?;

  tracing::warn!(
    username = %user.username,
    "seeded admin account from configuration; change its password now"
  );
  Ok(Some(user))
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests;
