//! Generic provenance-tagged claims.
//!
//! An assertion is a `(subject, predicate, object)` triple about any record.
//! The subject is polymorphic: `subject_type` names the table and
//! `subject_id` the row. There is no foreign key; the store checks that the
//! subject exists when the assertion is recorded, and the assertion outlives
//! it afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::provenance::Confidence;

/// The kind of record an assertion is about.
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
pub enum SubjectType {
  Person,
  PersonName,
  Place,
  Event,
  Relationship,
  Source,
  Document,
  GeneticProfile,
}

impl SubjectType {
  /// The table and id column that hold subjects of this type.
  pub fn table(self) -> (&'static str, &'static str) {
    match self {
      Self::Person => ("persons", "person_id"),
      Self::PersonName => ("person_names", "name_id"),
      Self::Place => ("places", "place_id"),
      Self::Event => ("events", "event_id"),
      Self::Relationship => ("relationships", "relationship_id"),
      Self::Source => ("sources", "source_id"),
      Self::Document => ("documents", "document_id"),
      Self::GeneticProfile => ("genetic_profiles", "profile_id"),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assertion {
  pub assertion_id: Uuid,
  pub subject_type: SubjectType,
  pub subject_id:   Uuid,
  /// e.g. `"occupation"`, `"residence"`, `"literate"`.
  pub predicate:    String,
  pub object_value: String,
  pub confidence:   Option<Confidence>,
  pub source_id:    Option<Uuid>,
  pub created_at:   DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAssertion {
  pub subject_type: SubjectType,
  pub subject_id:   Uuid,
  pub predicate:    String,
  pub object_value: String,
  pub confidence:   Option<Confidence>,
  pub source_id:    Option<Uuid>,
}
