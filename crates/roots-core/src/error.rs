//! Error types for `roots-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("confidence {0} is outside [0, 1]")]
  ConfidenceOutOfRange(f64),

  #[error("regional percentage for {region:?} is outside [0, 100]: {value}")]
  PercentageOutOfRange { region: String, value: f64 },

  #[error("unknown {kind} discriminant: {value:?}")]
  UnknownDiscriminant { kind: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Failure classification ──────────────────────────────────────────────────

/// Coarse category of a store failure, used by the API layer to pick a
/// response status without knowing the concrete backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  /// The addressed record (or one it references) does not exist.
  NotFound,
  /// A uniqueness constraint was violated.
  Conflict,
  /// The input violates a range, enum, or reference constraint.
  Invalid,
  Internal,
}

/// Implemented by every error type a [`crate::store::GenealogyStore`] may
/// return.
pub trait StoreFailure {
  fn failure_kind(&self) -> FailureKind;
}

impl StoreFailure for Error {
  fn failure_kind(&self) -> FailureKind {
    match self {
      Self::ConfidenceOutOfRange(_)
      | Self::PercentageOutOfRange { .. }
      | Self::UnknownDiscriminant { .. } => FailureKind::Invalid,
    }
  }
}

impl StoreFailure for std::convert::Infallible {
  fn failure_kind(&self) -> FailureKind { match *self {} }
}
