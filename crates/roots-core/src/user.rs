//! Authenticated actors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// The only access-control input: a role string checked by the server.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
  Admin,
  Editor,
  Viewer,
}

impl Role {
  /// Whether this role may create or delete records.
  pub fn can_write(self) -> bool { !matches!(self, Self::Viewer) }
}

/// A stored user account. The password hash never leaves the server crate;
/// it is skipped on serialisation.
#[derive(Debug, Clone, Serialize)]
pub struct User {
  pub user_id:       Uuid,
  pub username:      String,
  #[serde(skip)]
  pub password_hash: String,
  pub role:          Role,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::GenealogyStore::create_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  /// argon2 PHC string, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  pub role:          Role,
}
