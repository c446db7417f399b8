//! Provenance primitives shared by every fact table.
//!
//! A fact is time-bounded by a nullable year range, linked to an optional
//! [`Source`](crate::source::Source), and scored with a [`Confidence`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How certain the recorder is about a fact, as a real number in `[0, 1]`.
///
/// The bounds are enforced on construction and on deserialisation, so a
/// `Confidence` value in hand is always valid.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
  pub fn new(value: f64) -> Result<Self> {
    // NaN fails `contains`, so it is rejected here too.
    if (0.0..=1.0).contains(&value) {
      Ok(Self(value))
    } else {
      Err(Error::ConfidenceOutOfRange(value))
    }
  }

  pub fn value(self) -> f64 { self.0 }
}

impl TryFrom<f64> for Confidence {
  type Error = Error;

  fn try_from(value: f64) -> Result<Self> { Self::new(value) }
}

impl From<Confidence> for f64 {
  fn from(c: Confidence) -> Self { c.0 }
}

impl fmt::Display for Confidence {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
