//! Persons and the facts that hang off them: names, events, relationships,
//! and genetic profiles.
//!
//! Every fact row carries optional provenance (a source reference) and an
//! optional [`Confidence`]. Years are nullable to model partial or uncertain
//! dates.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result, assertion::Assertion, provenance::Confidence};

// ─── Person ──────────────────────────────────────────────────────────────────

/// An individual under study. Canonical identity only; alternate names live
/// in [`PersonName`] rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub person_id:         Uuid,
  pub given_name:        Option<String>,
  pub surname:           Option<String>,
  /// Sex exactly as written in the record, not normalised.
  pub sex_recorded:      Option<String>,
  pub birth_year_approx: Option<i32>,
  pub death_year_approx: Option<i32>,
  /// Vocabulary code from the `ethnicity` scheme.
  pub ethnicity_code:    Option<String>,
  pub notes:             Option<String>,
  pub created_at:        DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPerson {
  pub given_name:        Option<String>,
  pub surname:           Option<String>,
  pub sex_recorded:      Option<String>,
  pub birth_year_approx: Option<i32>,
  pub death_year_approx: Option<i32>,
  pub ethnicity_code:    Option<String>,
  pub notes:             Option<String>,
}

impl NewPerson {
  pub fn named(given: impl Into<String>, surname: impl Into<String>) -> Self {
    Self {
      given_name: Some(given.into()),
      surname: Some(surname.into()),
      ..Default::default()
    }
  }
}

// ─── Names ───────────────────────────────────────────────────────────────────

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
pub enum NameType {
  Birth,
  Alias,
  Married,
  SlaveName,
  EmancipatedName,
  Nickname,
}

/// A name held by a person over some interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonName {
  pub name_id:    Uuid,
  pub person_id:  Uuid,
  pub name_type:  NameType,
  pub given_name: Option<String>,
  pub surname:    Option<String>,
  pub language:   Option<String>,
  pub start_year: Option<i32>,
  pub end_year:   Option<i32>,
  pub confidence: Option<Confidence>,
  pub source_id:  Option<Uuid>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPersonName {
  pub person_id:  Uuid,
  pub name_type:  NameType,
  pub given_name: Option<String>,
  pub surname:    Option<String>,
  pub language:   Option<String>,
  pub start_year: Option<i32>,
  pub end_year:   Option<i32>,
  pub confidence: Option<Confidence>,
  pub source_id:  Option<Uuid>,
}

impl NewPersonName {
  pub fn new(person_id: Uuid, name_type: NameType) -> Self {
    Self {
      person_id,
      name_type,
      given_name: None,
      surname: None,
      language: None,
      start_year: None,
      end_year: None,
      confidence: None,
      source_id: None,
    }
  }
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// A dated occurrence involving a person.
///
/// `date_text` keeps the date exactly as written; the numeric parts hold
/// whatever is known and are never derived from the text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
  pub event_id:    Uuid,
  pub person_id:   Uuid,
  /// Vocabulary code from the `event_type` scheme, e.g. `"birth"`.
  pub event_type:  String,
  pub place_id:    Option<Uuid>,
  pub date_text:   Option<String>,
  pub year:        Option<i32>,
  pub month:       Option<u8>,
  pub day:         Option<u8>,
  pub description: Option<String>,
  pub confidence:  Option<Confidence>,
  pub source_id:   Option<Uuid>,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
  pub person_id:   Uuid,
  pub event_type:  String,
  pub place_id:    Option<Uuid>,
  pub date_text:   Option<String>,
  pub year:        Option<i32>,
  pub month:       Option<u8>,
  pub day:         Option<u8>,
  pub description: Option<String>,
  pub confidence:  Option<Confidence>,
  pub source_id:   Option<Uuid>,
}

impl NewEvent {
  pub fn new(person_id: Uuid, event_type: impl Into<String>) -> Self {
    Self {
      person_id,
      event_type: event_type.into(),
      place_id: None,
      date_text: None,
      year: None,
      month: None,
      day: None,
      description: None,
      confidence: None,
      source_id: None,
    }
  }
}

// ─── Relationships ───────────────────────────────────────────────────────────

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
pub enum RelationshipType {
  ParentOf,
  SpouseOf,
  SiblingOf,
  AdoptiveParentOf,
  EnslaverOf,
  GuardianOf,
}

/// A directed tie: person A `rel_type` person B.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
  pub relationship_id: Uuid,
  pub person_a_id:     Uuid,
  pub person_b_id:     Uuid,
  pub rel_type:        RelationshipType,
  pub start_year:      Option<i32>,
  pub end_year:        Option<i32>,
  pub confidence:      Option<Confidence>,
  pub source_id:       Option<Uuid>,
  pub created_at:      DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRelationship {
  pub person_a_id: Uuid,
  pub person_b_id: Uuid,
  pub rel_type:    RelationshipType,
  pub start_year:  Option<i32>,
  pub end_year:    Option<i32>,
  pub confidence:  Option<Confidence>,
  pub source_id:   Option<Uuid>,
}

impl NewRelationship {
  pub fn new(a: Uuid, rel_type: RelationshipType, b: Uuid) -> Self {
    Self {
      person_a_id: a,
      person_b_id: b,
      rel_type,
      start_year: None,
      end_year: None,
      confidence: None,
      source_id: None,
    }
  }
}

// ─── Genetic profiles ────────────────────────────────────────────────────────

/// Summary genetic attributes as reported by a lab. Stored verbatim; nothing
/// is inferred from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneticProfile {
  pub profile_id:   Uuid,
  pub person_id:    Uuid,
  /// e.g. `"y_dna"`, `"mtdna"`, `"autosomal"`.
  pub profile_type: String,
  pub haplogroup:   Option<String>,
  /// Region name → percentage in `[0, 100]`.
  pub regions:      BTreeMap<String, f64>,
  pub lab:          Option<String>,
  pub test_date:    Option<NaiveDate>,
  pub source_id:    Option<Uuid>,
  pub created_at:   DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewGeneticProfile {
  pub person_id:    Uuid,
  pub profile_type: String,
  pub haplogroup:   Option<String>,
  pub regions:      BTreeMap<String, f64>,
  pub lab:          Option<String>,
  pub test_date:    Option<NaiveDate>,
  pub source_id:    Option<Uuid>,
}

impl NewGeneticProfile {
  /// Every regional percentage must lie in `[0, 100]`.
  pub fn validate(&self) -> Result<()> {
    for (region, &value) in &self.regions {
      if !(0.0..=100.0).contains(&value) {
        return Err(Error::PercentageOutOfRange {
          region: region.clone(),
          value,
        });
      }
    }
    Ok(())
  }
}

// ─── Materialised view ───────────────────────────────────────────────────────

/// Everything recorded about one person. Never stored; always derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonView {
  pub person:           Person,
  pub names:            Vec<PersonName>,
  pub events:           Vec<Event>,
  /// Relationships in which the person is either party.
  pub relationships:    Vec<Relationship>,
  pub genetic_profiles: Vec<GeneticProfile>,
  /// Assertions whose subject is this person.
  pub assertions:       Vec<Assertion>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn name_type_strings_match_schema() {
    assert_eq!(NameType::SlaveName.as_ref(), "slave_name");
    assert_eq!(NameType::EmancipatedName.to_string(), "emancipated_name");
    assert_eq!("nickname".parse::<NameType>().unwrap(), NameType::Nickname);
  }

  #[test]
  fn relationship_type_serde_is_snake_case() {
    let json = serde_json::to_string(&RelationshipType::AdoptiveParentOf).unwrap();
    assert_eq!(json, "\"adoptive_parent_of\"");
    assert!("cousin_of".parse::<RelationshipType>().is_err());
  }

  #[test]
  fn genetic_profile_rejects_bad_percentages() {
    let mut profile = NewGeneticProfile {
      person_id:    Uuid::nil(),
      profile_type: "autosomal".into(),
      haplogroup:   None,
      regions:      BTreeMap::from([("West Africa".to_owned(), 71.5)]),
      lab:          None,
      test_date:    None,
      source_id:    None,
    };
    assert!(profile.validate().is_ok());

    profile.regions.insert("Iberia".into(), 120.0);
    assert!(matches!(
      profile.validate(),
      Err(Error::PercentageOutOfRange { ref region, .. }) if region == "Iberia"
    ));
  }
}
