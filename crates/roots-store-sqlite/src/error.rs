//! Error type for `roots-store-sqlite`.

use roots_core::{FailureKind, StoreFailure, assertion::SubjectType};
use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] roots_core::Error),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  /// A UNIQUE or PRIMARY KEY constraint failed.
  #[error("duplicate record: {0}")]
  Duplicate(String),

  /// A FOREIGN KEY constraint failed: the referenced row does not exist.
  #[error("referenced record does not exist: {0}")]
  MissingReference(String),

  /// A CHECK or NOT NULL constraint failed.
  #[error("constraint violation: {0}")]
  ConstraintViolation(String),

  #[error("{subject_type} {subject_id} not found")]
  SubjectNotFound {
    subject_type: SubjectType,
    subject_id:   uuid::Uuid,
  },

  #[error("database schema version {found} is newer than supported {latest}")]
  UnsupportedSchemaVersion { found: u32, latest: u32 },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<rusqlite::Error> for Error {
  fn from(e: rusqlite::Error) -> Self {
    match e {
      rusqlite::Error::SqliteFailure(failure, message)
        if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
      {
        let message = message.unwrap_or_else(|| failure.to_string());
        match failure.extended_code {
          ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
            Self::Duplicate(message)
          }
          ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Self::MissingReference(message),
          _ => Self::ConstraintViolation(message),
        }
      }
      other => Self::Database(tokio_rusqlite::Error::Rusqlite(other)),
    }
  }
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Rusqlite(inner) => inner.into(),
      other => Self::Database(other),
    }
  }
}

impl StoreFailure for Error {
  fn failure_kind(&self) -> FailureKind {
    match self {
      Self::Core(e) => e.failure_kind(),
      Self::Duplicate(_) => FailureKind::Conflict,
      Self::MissingReference(_) | Self::SubjectNotFound { .. } => {
        FailureKind::NotFound
      }
      Self::ConstraintViolation(_) => FailureKind::Invalid,
      Self::Database(_)
      | Self::UnsupportedSchemaVersion { .. }
      | Self::Json(_)
      | Self::Uuid(_)
      | Self::DateParse(_) => FailureKind::Internal,
    }
  }
}
