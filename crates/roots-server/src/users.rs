//! User management endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/users` | Admin only; body: `{"username", "password", "role"}` |
//! | `PUT`  | `/api/users/me/password` | Any user; body: `{"current_password", "new_password"}` |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use roots_api::{ApiError, extract::ApiJson};
use roots_core::{
  store::GenealogyStore,
  user::{NewUser, Role},
};
use serde::Deserialize;

use crate::{
  AppState,
  auth::{CurrentUser, hash_password_blocking, verify_password_blocking},
  error::{Error, Result},
};

const MIN_PASSWORD_LEN: usize = 8;

fn check_password_strength(password: &str) -> Result<()> {
  if password.chars().count() < MIN_PASSWORD_LEN {
    return Err(Error::BadRequest(format!(
      "password must be at least {MIN_PASSWORD_LEN} characters"
    )));
  }
  Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub username: String,
  pub password: String,
  pub role:     Role,
}

/// `POST /api/users`
pub async fn create<S: GenealogyStore>(
  State(state): State<AppState<S>>,
  CurrentUser(caller): CurrentUser,
  ApiJson(body): ApiJson<CreateBody>,
) -> Result<impl IntoResponse> {
  if caller.role != Role::Admin {
    return Err(Error::Forbidden("user management requires the admin role"));
  }

  let username = body.username.trim().to_owned();
  if username.is_empty() || username.contains(':') {
    return Err(Error::BadRequest(
      "username must be non-empty and contain no ':'".into(),
    ));
  }
  check_password_strength(&body.password)?;
  let password_hash = hash_password_blocking(body.password).await?;

  let user = state
    .store
    .create_user(NewUser {
      username,
      password_hash,
      role: body.role,
    })
    .await
    .map_err(ApiError::store)?;

  tracing::info!(
    username = %user.username,
    role = %user.role,
    created_by = %caller.username,
    "user created"
  );
  Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordBody {
  pub current_password: String,
  pub new_password:     String,
}

/// `PUT /api/users/me/password`
pub async fn change_password<S: GenealogyStore>(
  State(state): State<AppState<S>>,
  CurrentUser(caller): CurrentUser,
  ApiJson(body): ApiJson<ChangePasswordBody>,
) -> Result<StatusCode> {
  let current_ok =
    verify_password_blocking(body.current_password, caller.password_hash.clone())
      .await;
  if !current_ok {
    return Err(Error::Forbidden("current password does not match"));
  }
  check_password_strength(&body.new_password)?;
  let password_hash = hash_password_blocking(body.new_password).await?;

  let updated = state
    .store
    .set_password_hash(caller.user_id, password_hash)
    .await
    .map_err(ApiError::store)?;
  if !updated {
    return Err(Error::Unauthorized);
  }

  tracing::info!(username = %caller.username, "password changed");
  Ok(StatusCode::NO_CONTENT)
}
