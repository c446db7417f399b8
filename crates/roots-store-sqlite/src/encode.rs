//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Enums are stored as their
//! snake_case names, matching the `CHECK (... IN ...)` lists in the schema.
//! Structured fields (regions, shapes) are stored as compact JSON. UUIDs are
//! stored as hyphenated lowercase strings.

use std::{collections::BTreeMap, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use roots_core::{
  assertion::Assertion,
  person::{Event, GeneticProfile, Person, PersonName, Relationship},
  place::{Place, PlaceAlias},
  provenance::Confidence,
  source::{Document, Source},
  user::User,
  vocabulary::VocabularyTerm,
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// Parse a stored enum name. Any failure is a corrupt row, reported through
/// the core error type.
pub fn decode_enum<T: FromStr>(kind: &'static str, s: &str) -> Result<T> {
  s.parse().map_err(|_| {
    Error::Core(roots_core::Error::UnknownDiscriminant {
      kind,
      value: s.to_owned(),
    })
  })
}

pub fn encode_confidence(c: Option<Confidence>) -> Option<f64> {
  c.map(f64::from)
}

pub fn decode_confidence(v: Option<f64>) -> Result<Option<Confidence>> {
  Ok(v.map(Confidence::new).transpose()?)
}

// ─── Column lists ────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str =
  "user_id, username, password_hash, role, created_at";

pub const TERM_COLUMNS: &str =
  "term_id, scheme, code, label, description, created_at";

pub const PLACE_COLUMNS: &str = "place_id, name, place_type, latitude, \
  longitude, start_year, end_year, shape, created_at";

pub const ALIAS_COLUMNS: &str =
  "alias_id, place_id, name, language, start_year, end_year, created_at";

pub const SOURCE_COLUMNS: &str = "source_id, title, author, source_type, \
  repository, citation, rights, created_at";

pub const DOCUMENT_COLUMNS: &str = "document_id, source_id, storage_path, \
  thumbnail_path, doc_type, original_filename, media_type, size_bytes, \
  content_hash, created_at";

pub const PERSON_COLUMNS: &str = "person_id, given_name, surname, \
  sex_recorded, birth_year_approx, death_year_approx, ethnicity_code, notes, \
  created_at";

pub const NAME_COLUMNS: &str = "name_id, person_id, name_type, given_name, \
  surname, language, start_year, end_year, confidence, source_id, created_at";

pub const EVENT_COLUMNS: &str = "event_id, person_id, event_type, place_id, \
  date_text, year, month, day, description, confidence, source_id, created_at";

pub const RELATIONSHIP_COLUMNS: &str = "relationship_id, person_a_id, \
  person_b_id, rel_type, start_year, end_year, confidence, source_id, \
  created_at";

pub const PROFILE_COLUMNS: &str = "profile_id, person_id, profile_type, \
  haplogroup, regions, lab, test_date, source_id, created_at";

pub const ASSERTION_COLUMNS: &str = "assertion_id, subject_type, subject_id, \
  predicate, object_value, confidence, source_id, created_at";

// ─── Row types ───────────────────────────────────────────────────────────────
//
// Each `Raw*` struct holds the column values exactly as read, in the order of
// the matching `*_COLUMNS` list. Decoding happens outside the connection
// closure so parse failures surface as `Error`, not `rusqlite::Error`.

pub struct RawUser {
  pub user_id:       String,
  pub username:      String,
  pub password_hash: String,
  pub role:          String,
  pub created_at:    String,
}

impl RawUser {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      username:      row.get(1)?,
      password_hash: row.get(2)?,
      role:          row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      username:      self.username,
      password_hash: self.password_hash,
      role:          decode_enum("role", &self.role)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawTerm {
  pub term_id:     String,
  pub scheme:      String,
  pub code:        String,
  pub label:       String,
  pub description: Option<String>,
  pub created_at:  String,
}

impl RawTerm {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      term_id:     row.get(0)?,
      scheme:      row.get(1)?,
      code:        row.get(2)?,
      label:       row.get(3)?,
      description: row.get(4)?,
      created_at:  row.get(5)?,
    })
  }

  pub fn into_term(self) -> Result<VocabularyTerm> {
    Ok(VocabularyTerm {
      term_id:     decode_uuid(&self.term_id)?,
      scheme:      self.scheme,
      code:        self.code,
      label:       self.label,
      description: self.description,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawPlace {
  pub place_id:   String,
  pub name:       String,
  pub place_type: Option<String>,
  pub latitude:   Option<f64>,
  pub longitude:  Option<f64>,
  pub start_year: Option<i32>,
  pub end_year:   Option<i32>,
  pub shape:      Option<String>,
  pub created_at: String,
}

impl RawPlace {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      place_id:   row.get(0)?,
      name:       row.get(1)?,
      place_type: row.get(2)?,
      latitude:   row.get(3)?,
      longitude:  row.get(4)?,
      start_year: row.get(5)?,
      end_year:   row.get(6)?,
      shape:      row.get(7)?,
      created_at: row.get(8)?,
    })
  }

  pub fn into_place(self) -> Result<Place> {
    Ok(Place {
      place_id:   decode_uuid(&self.place_id)?,
      name:       self.name,
      place_type: self.place_type,
      latitude:   self.latitude,
      longitude:  self.longitude,
      start_year: self.start_year,
      end_year:   self.end_year,
      shape:      self.shape.as_deref().map(serde_json::from_str).transpose()?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawAlias {
  pub alias_id:   String,
  pub place_id:   String,
  pub name:       String,
  pub language:   Option<String>,
  pub start_year: Option<i32>,
  pub end_year:   Option<i32>,
  pub created_at: String,
}

impl RawAlias {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      alias_id:   row.get(0)?,
      place_id:   row.get(1)?,
      name:       row.get(2)?,
      language:   row.get(3)?,
      start_year: row.get(4)?,
      end_year:   row.get(5)?,
      created_at: row.get(6)?,
    })
  }

  pub fn into_alias(self) -> Result<PlaceAlias> {
    Ok(PlaceAlias {
      alias_id:   decode_uuid(&self.alias_id)?,
      place_id:   decode_uuid(&self.place_id)?,
      name:       self.name,
      language:   self.language,
      start_year: self.start_year,
      end_year:   self.end_year,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawSource {
  pub source_id:   String,
  pub title:       String,
  pub author:      Option<String>,
  pub source_type: Option<String>,
  pub repository:  Option<String>,
  pub citation:    Option<String>,
  pub rights:      Option<String>,
  pub created_at:  String,
}

impl RawSource {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      source_id:   row.get(0)?,
      title:       row.get(1)?,
      author:      row.get(2)?,
      source_type: row.get(3)?,
      repository:  row.get(4)?,
      citation:    row.get(5)?,
      rights:      row.get(6)?,
      created_at:  row.get(7)?,
    })
  }

  pub fn into_source(self) -> Result<Source> {
    Ok(Source {
      source_id:   decode_uuid(&self.source_id)?,
      title:       self.title,
      author:      self.author,
      source_type: self.source_type,
      repository:  self.repository,
      citation:    self.citation,
      rights:      self.rights,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawDocument {
  pub document_id:       String,
  pub source_id:         Option<String>,
  pub storage_path:      String,
  pub thumbnail_path:    Option<String>,
  pub doc_type:          Option<String>,
  pub original_filename: Option<String>,
  pub media_type:        Option<String>,
  pub size_bytes:        Option<i64>,
  pub content_hash:      Option<String>,
  pub created_at:        String,
}

impl RawDocument {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      document_id:       row.get(0)?,
      source_id:         row.get(1)?,
      storage_path:      row.get(2)?,
      thumbnail_path:    row.get(3)?,
      doc_type:          row.get(4)?,
      original_filename: row.get(5)?,
      media_type:        row.get(6)?,
      size_bytes:        row.get(7)?,
      content_hash:      row.get(8)?,
      created_at:        row.get(9)?,
    })
  }

  pub fn into_document(self) -> Result<Document> {
    Ok(Document {
      document_id:       decode_uuid(&self.document_id)?,
      source_id:         decode_opt_uuid(self.source_id)?,
      storage_path:      self.storage_path,
      thumbnail_path:    self.thumbnail_path,
      doc_type:          self.doc_type,
      original_filename: self.original_filename,
      media_type:        self.media_type,
      size_bytes:        self.size_bytes,
      content_hash:      self.content_hash,
      created_at:        decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawPerson {
  pub person_id:         String,
  pub given_name:        Option<String>,
  pub surname:           Option<String>,
  pub sex_recorded:      Option<String>,
  pub birth_year_approx: Option<i32>,
  pub death_year_approx: Option<i32>,
  pub ethnicity_code:    Option<String>,
  pub notes:             Option<String>,
  pub created_at:        String,
}

impl RawPerson {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:         row.get(0)?,
      given_name:        row.get(1)?,
      surname:           row.get(2)?,
      sex_recorded:      row.get(3)?,
      birth_year_approx: row.get(4)?,
      death_year_approx: row.get(5)?,
      ethnicity_code:    row.get(6)?,
      notes:             row.get(7)?,
      created_at:        row.get(8)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:         decode_uuid(&self.person_id)?,
      given_name:        self.given_name,
      surname:           self.surname,
      sex_recorded:      self.sex_recorded,
      birth_year_approx: self.birth_year_approx,
      death_year_approx: self.death_year_approx,
      ethnicity_code:    self.ethnicity_code,
      notes:             self.notes,
      created_at:        decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawName {
  pub name_id:    String,
  pub person_id:  String,
  pub name_type:  String,
  pub given_name: Option<String>,
  pub surname:    Option<String>,
  pub language:   Option<String>,
  pub start_year: Option<i32>,
  pub end_year:   Option<i32>,
  pub confidence: Option<f64>,
  pub source_id:  Option<String>,
  pub created_at: String,
}

impl RawName {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      name_id:    row.get(0)?,
      person_id:  row.get(1)?,
      name_type:  row.get(2)?,
      given_name: row.get(3)?,
      surname:    row.get(4)?,
      language:   row.get(5)?,
      start_year: row.get(6)?,
      end_year:   row.get(7)?,
      confidence: row.get(8)?,
      source_id:  row.get(9)?,
      created_at: row.get(10)?,
    })
  }

  pub fn into_name(self) -> Result<PersonName> {
    Ok(PersonName {
      name_id:    decode_uuid(&self.name_id)?,
      person_id:  decode_uuid(&self.person_id)?,
      name_type:  decode_enum("name_type", &self.name_type)?,
      given_name: self.given_name,
      surname:    self.surname,
      language:   self.language,
      start_year: self.start_year,
      end_year:   self.end_year,
      confidence: decode_confidence(self.confidence)?,
      source_id:  decode_opt_uuid(self.source_id)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawEvent {
  pub event_id:    String,
  pub person_id:   String,
  pub event_type:  String,
  pub place_id:    Option<String>,
  pub date_text:   Option<String>,
  pub year:        Option<i32>,
  pub month:       Option<u8>,
  pub day:         Option<u8>,
  pub description: Option<String>,
  pub confidence:  Option<f64>,
  pub source_id:   Option<String>,
  pub created_at:  String,
}

impl RawEvent {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      event_id:    row.get(0)?,
      person_id:   row.get(1)?,
      event_type:  row.get(2)?,
      place_id:    row.get(3)?,
      date_text:   row.get(4)?,
      year:        row.get(5)?,
      month:       row.get(6)?,
      day:         row.get(7)?,
      description: row.get(8)?,
      confidence:  row.get(9)?,
      source_id:   row.get(10)?,
      created_at:  row.get(11)?,
    })
  }

  pub fn into_event(self) -> Result<Event> {
    Ok(Event {
      event_id:    decode_uuid(&self.event_id)?,
      person_id:   decode_uuid(&self.person_id)?,
      event_type:  self.event_type,
      place_id:    decode_opt_uuid(self.place_id)?,
      date_text:   self.date_text,
      year:        self.year,
      month:       self.month,
      day:         self.day,
      description: self.description,
      confidence:  decode_confidence(self.confidence)?,
      source_id:   decode_opt_uuid(self.source_id)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawRelationship {
  pub relationship_id: String,
  pub person_a_id:     String,
  pub person_b_id:     String,
  pub rel_type:        String,
  pub start_year:      Option<i32>,
  pub end_year:        Option<i32>,
  pub confidence:      Option<f64>,
  pub source_id:       Option<String>,
  pub created_at:      String,
}

impl RawRelationship {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      relationship_id: row.get(0)?,
      person_a_id:     row.get(1)?,
      person_b_id:     row.get(2)?,
      rel_type:        row.get(3)?,
      start_year:      row.get(4)?,
      end_year:        row.get(5)?,
      confidence:      row.get(6)?,
      source_id:       row.get(7)?,
      created_at:      row.get(8)?,
    })
  }

  pub fn into_relationship(self) -> Result<Relationship> {
    Ok(Relationship {
      relationship_id: decode_uuid(&self.relationship_id)?,
      person_a_id:     decode_uuid(&self.person_a_id)?,
      person_b_id:     decode_uuid(&self.person_b_id)?,
      rel_type:        decode_enum("rel_type", &self.rel_type)?,
      start_year:      self.start_year,
      end_year:        self.end_year,
      confidence:      decode_confidence(self.confidence)?,
      source_id:       decode_opt_uuid(self.source_id)?,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawProfile {
  pub profile_id:   String,
  pub person_id:    String,
  pub profile_type: String,
  pub haplogroup:   Option<String>,
  pub regions:      String,
  pub lab:          Option<String>,
  pub test_date:    Option<String>,
  pub source_id:    Option<String>,
  pub created_at:   String,
}

impl RawProfile {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      profile_id:   row.get(0)?,
      person_id:    row.get(1)?,
      profile_type: row.get(2)?,
      haplogroup:   row.get(3)?,
      regions:      row.get(4)?,
      lab:          row.get(5)?,
      test_date:    row.get(6)?,
      source_id:    row.get(7)?,
      created_at:   row.get(8)?,
    })
  }

  pub fn into_profile(self) -> Result<GeneticProfile> {
    let regions: BTreeMap<String, f64> = serde_json::from_str(&self.regions)?;
    Ok(GeneticProfile {
      profile_id: decode_uuid(&self.profile_id)?,
      person_id: decode_uuid(&self.person_id)?,
      profile_type: self.profile_type,
      haplogroup: self.haplogroup,
      regions,
      lab: self.lab,
      test_date: self.test_date.as_deref().map(decode_date).transpose()?,
      source_id: decode_opt_uuid(self.source_id)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawAssertion {
  pub assertion_id: String,
  pub subject_type: String,
  pub subject_id:   String,
  pub predicate:    String,
  pub object_value: String,
  pub confidence:   Option<f64>,
  pub source_id:    Option<String>,
  pub created_at:   String,
}

impl RawAssertion {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      assertion_id: row.get(0)?,
      subject_type: row.get(1)?,
      subject_id:   row.get(2)?,
      predicate:    row.get(3)?,
      object_value: row.get(4)?,
      confidence:   row.get(5)?,
      source_id:    row.get(6)?,
      created_at:   row.get(7)?,
    })
  }

  pub fn into_assertion(self) -> Result<Assertion> {
    Ok(Assertion {
      assertion_id: decode_uuid(&self.assertion_id)?,
      subject_type: decode_enum("subject_type", &self.subject_type)?,
      subject_id:   decode_uuid(&self.subject_id)?,
      predicate:    self.predicate,
      object_value: self.object_value,
      confidence:   decode_confidence(self.confidence)?,
      source_id:    decode_opt_uuid(self.source_id)?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}
