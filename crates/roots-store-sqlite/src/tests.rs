//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use roots_core::{
  FailureKind, StoreFailure,
  assertion::{NewAssertion, SubjectType},
  person::{
    NameType, NewEvent, NewGeneticProfile, NewPerson, NewPersonName,
    NewRelationship, RelationshipType,
  },
  place::{NewPlace, NewPlaceAlias},
  provenance::Confidence,
  source::{NewDocument, NewSource},
  store::{GenealogyStore, PersonQuery},
  user::{NewUser, Role},
  vocabulary::NewVocabularyTerm,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn conf(v: f64) -> Option<Confidence> { Some(Confidence::new(v).unwrap()) }

async fn count(s: &SqliteStore, table: &'static str) -> i64 {
  s.conn
    .call(move |conn| {
      Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| {
        r.get(0)
      })?)
    })
    .await
    .unwrap()
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn schema_version_is_recorded() {
  let s = store().await;
  let version: u32 = s
    .conn
    .call(|conn| Ok(conn.query_row("PRAGMA user_version", [], |r| r.get(0))?))
    .await
    .unwrap();
  assert_eq!(version, crate::latest_version());
}

#[tokio::test]
async fn reopening_a_file_store_is_idempotent() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("roots.db");

  let first = SqliteStore::open(&path).await.unwrap();
  first.add_person(NewPerson::named("Jane", "Doe")).await.unwrap();
  drop(first);

  let second = SqliteStore::open(&path).await.unwrap();
  let found = second.search(&PersonQuery::default()).await.unwrap();
  assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn newer_schema_is_refused() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("roots.db");
  {
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999").unwrap();
  }

  let err = SqliteStore::open(&path).await.err().unwrap();
  assert!(matches!(
    err,
    Error::UnsupportedSchemaVersion { found: 999, .. }
  ));
}

// ─── Users & vocabulary ──────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_fetch_user() {
  let s = store().await;
  assert_eq!(s.count_users().await.unwrap(), 0);

  let user = s
    .create_user(NewUser {
      username:      "archivist".into(),
      password_hash: "$argon2id$fake".into(),
      role:          Role::Editor,
    })
    .await
    .unwrap();

  let fetched = s
    .get_user_by_username("archivist".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.user_id, user.user_id);
  assert_eq!(fetched.role, Role::Editor);
  assert_eq!(s.count_users().await.unwrap(), 1);

  assert!(s.set_password_hash(user.user_id, "$argon2id$new".into()).await.unwrap());
  let fetched = s
    .get_user_by_username("archivist".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.password_hash, "$argon2id$new");
  assert!(!s.set_password_hash(Uuid::new_v4(), "x".into()).await.unwrap());
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
  let s = store().await;
  let new_user = || NewUser {
    username:      "admin".into(),
    password_hash: "h".into(),
    role:          Role::Admin,
  };
  s.create_user(new_user()).await.unwrap();

  let err = s.create_user(new_user()).await.unwrap_err();
  assert!(matches!(err, Error::Duplicate(_)));
  assert_eq!(err.failure_kind(), FailureKind::Conflict);
}

#[tokio::test]
async fn vocabulary_code_is_unique_per_scheme() {
  let s = store().await;
  let term = |scheme: &str, code: &str| NewVocabularyTerm {
    scheme:      scheme.into(),
    code:        code.into(),
    label:       code.to_uppercase(),
    description: None,
  };

  s.add_term(term("event_type", "birth")).await.unwrap();
  s.add_term(term("event_type", "manumission")).await.unwrap();
  // Same code under another scheme is fine.
  s.add_term(term("name_source", "birth")).await.unwrap();

  let err = s.add_term(term("event_type", "birth")).await.unwrap_err();
  assert!(matches!(err, Error::Duplicate(_)));

  let events = s.list_terms(Some("event_type".into())).await.unwrap();
  assert_eq!(events.len(), 2);
  assert_eq!(s.list_terms(None).await.unwrap().len(), 3);
}

// ─── Confidence ──────────────────────────────────────────────────────────────

/// Insert one row with the given confidence into `table`, bypassing the
/// typed API.
async fn insert_with_confidence(
  s: &SqliteStore,
  table: &'static str,
  a: Uuid,
  b: Uuid,
  confidence: f64,
) -> Result<(), Error> {
  let id = Uuid::new_v4().to_string();
  let (a, b) = (a.to_string(), b.to_string());
  s.conn
    .call(move |conn| {
      let sql = match table {
        "person_names" => {
          "INSERT INTO person_names (name_id, person_id, name_type, confidence, created_at)
           VALUES (?1, ?2, 'alias', ?4, '2024-01-01T00:00:00Z')"
        }
        "events" => {
          "INSERT INTO events (event_id, person_id, event_type, confidence, created_at)
           VALUES (?1, ?2, 'birth', ?4, '2024-01-01T00:00:00Z')"
        }
        "relationships" => {
          "INSERT INTO relationships (relationship_id, person_a_id, person_b_id, rel_type, confidence, created_at)
           VALUES (?1, ?2, ?3, 'parent_of', ?4, '2024-01-01T00:00:00Z')"
        }
        _ => {
          "INSERT INTO assertions (assertion_id, subject_type, subject_id, predicate, object_value, confidence, created_at)
           VALUES (?1, 'person', ?2, 'occupation', 'cooper', ?4, '2024-01-01T00:00:00Z')"
        }
      };
      conn.execute(sql, rusqlite::params![id, a, b, confidence])?;
      Ok(())
    })
    .await
    .map_err(Error::from)
}

const CONFIDENCE_TABLES: [&str; 4] =
  ["person_names", "events", "relationships", "assertions"];

#[tokio::test]
async fn out_of_range_confidence_is_rejected_by_the_schema() {
  let s = store().await;
  let a = s.add_person(NewPerson::named("Jane", "Doe")).await.unwrap();
  let b = s.add_person(NewPerson::named("Mary", "Doe")).await.unwrap();

  for table in CONFIDENCE_TABLES {
    for value in [1.5, -0.2] {
      let err = insert_with_confidence(&s, table, a.person_id, b.person_id, value)
        .await
        .unwrap_err();
      assert!(
        matches!(err, Error::ConstraintViolation(_)),
        "{table} at {value}: {err}"
      );
    }
  }
  assert_eq!(count(&s, "relationships").await, 0);
  assert_eq!(count(&s, "assertions").await, 0);
}

#[tokio::test]
async fn confidence_bounds_are_inclusive_in_the_schema() {
  let s = store().await;
  let a = s.add_person(NewPerson::named("Jane", "Doe")).await.unwrap();
  let b = s.add_person(NewPerson::named("Mary", "Doe")).await.unwrap();

  for table in CONFIDENCE_TABLES {
    for value in [0.0, 1.0] {
      insert_with_confidence(&s, table, a.person_id, b.person_id, value)
        .await
        .unwrap_or_else(|e| panic!("{table} at {value}: {e}"));
    }
    assert_eq!(count(&s, table).await, 2, "{table}");
  }
}

// ─── Places ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn place_alias_requires_existing_place() {
  let s = store().await;
  let err = s
    .add_place_alias(NewPlaceAlias {
      place_id:   Uuid::new_v4(),
      name:       "Nowhere".into(),
      language:   None,
      start_year: None,
      end_year:   None,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MissingReference(_)));
  assert_eq!(err.failure_kind(), FailureKind::NotFound);
}

#[tokio::test]
async fn deleting_place_removes_aliases_and_clears_events() {
  let s = store().await;
  let place = s
    .add_place(NewPlace {
      latitude: Some(32.08),
      longitude: Some(-81.09),
      ..NewPlace::named("Savannah")
    })
    .await
    .unwrap();
  s.add_place_alias(NewPlaceAlias {
    place_id:   place.place_id,
    name:       "Savannah Town".into(),
    language:   Some("en".into()),
    start_year: Some(1733),
    end_year:   Some(1789),
  })
  .await
  .unwrap();

  let person = s.add_person(NewPerson::named("Jane", "Doe")).await.unwrap();
  let mut event = NewEvent::new(person.person_id, "birth");
  event.place_id = Some(place.place_id);
  let event = s.add_event(event).await.unwrap();

  let view = s.get_place(place.place_id).await.unwrap().unwrap();
  assert_eq!(view.aliases.len(), 1);

  assert!(s.delete_place(place.place_id).await.unwrap());
  assert!(s.get_place(place.place_id).await.unwrap().is_none());
  assert_eq!(count(&s, "place_aliases").await, 0);

  let person_view = s.materialize(person.person_id).await.unwrap().unwrap();
  assert_eq!(person_view.events.len(), 1);
  assert_eq!(person_view.events[0].event_id, event.event_id);
  assert!(person_view.events[0].place_id.is_none());

  assert!(!s.delete_place(place.place_id).await.unwrap());
}

#[tokio::test]
async fn place_coordinates_are_range_checked() {
  let s = store().await;
  let err = s
    .add_place(NewPlace { latitude: Some(95.0), ..NewPlace::named("Bad") })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ConstraintViolation(_)));
}

// ─── Persons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn alternate_name_keeps_provenance() {
  let s = store().await;
  let source = s
    .add_source(NewSource {
      citation: Some("Chatham County deed book K, p. 114".into()),
      ..NewSource::titled("Bill of sale, 1841")
    })
    .await
    .unwrap();
  let person = s.add_person(NewPerson::named("Jane", "Doe")).await.unwrap();

  let mut name = NewPersonName::new(person.person_id, NameType::SlaveName);
  name.given_name = Some("Jenny".into());
  name.confidence = conf(0.6);
  name.source_id = Some(source.source_id);
  let name = s.add_name(name).await.unwrap();

  let view = s.materialize(person.person_id).await.unwrap().unwrap();
  assert_eq!(view.person.given_name.as_deref(), Some("Jane"));
  assert_eq!(view.person.surname.as_deref(), Some("Doe"));
  assert_eq!(view.names.len(), 1);

  let alt = &view.names[0];
  assert_eq!(alt.name_id, name.name_id);
  assert_eq!(alt.name_type, NameType::SlaveName);
  assert_eq!(alt.given_name.as_deref(), Some("Jenny"));
  assert_eq!(alt.confidence.map(Confidence::value), Some(0.6));
  assert_eq!(alt.source_id, Some(source.source_id));
}

#[tokio::test]
async fn materialize_returns_none_for_unknown_person() {
  let s = store().await;
  assert!(s.materialize(Uuid::new_v4()).await.unwrap().is_none());
  assert!(s.get_person(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_persons_are_allowed() {
  let s = store().await;
  let a = s.add_person(NewPerson::named("John", "Smith")).await.unwrap();
  let b = s.add_person(NewPerson::named("John", "Smith")).await.unwrap();
  assert_ne!(a.person_id, b.person_id);
}

#[tokio::test]
async fn name_for_missing_person_is_rejected() {
  let s = store().await;
  let err = s
    .add_name(NewPersonName::new(Uuid::new_v4(), NameType::Alias))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MissingReference(_)));
}

#[tokio::test]
async fn event_month_is_range_checked() {
  let s = store().await;
  let person = s.add_person(NewPerson::named("Jane", "Doe")).await.unwrap();
  let mut event = NewEvent::new(person.person_id, "baptism");
  event.date_text = Some("abt. 13th month 1850".into());
  event.month = Some(13);

  let err = s.add_event(event).await.unwrap_err();
  assert_eq!(err.failure_kind(), FailureKind::Invalid);
}

#[tokio::test]
async fn deleting_person_cascades_but_keeps_sources_and_places() {
  let s = store().await;
  let source = s.add_source(NewSource::titled("1870 census")).await.unwrap();
  let place = s.add_place(NewPlace::named("Beaufort")).await.unwrap();
  let jane = s.add_person(NewPerson::named("Jane", "Doe")).await.unwrap();
  let mary = s.add_person(NewPerson::named("Mary", "Doe")).await.unwrap();

  let mut name = NewPersonName::new(jane.person_id, NameType::Married);
  name.source_id = Some(source.source_id);
  s.add_name(name).await.unwrap();

  let mut event = NewEvent::new(jane.person_id, "residence");
  event.place_id = Some(place.place_id);
  event.source_id = Some(source.source_id);
  s.add_event(event).await.unwrap();

  s.add_relationship(NewRelationship::new(
    mary.person_id,
    RelationshipType::ParentOf,
    jane.person_id,
  ))
  .await
  .unwrap();

  s.add_genetic_profile(NewGeneticProfile {
    person_id:    jane.person_id,
    profile_type: "mtdna".into(),
    haplogroup:   Some("L3e2".into()),
    regions:      BTreeMap::new(),
    lab:          None,
    test_date:    None,
    source_id:    None,
  })
  .await
  .unwrap();

  assert!(s.delete_person(jane.person_id).await.unwrap());

  assert_eq!(count(&s, "person_names").await, 0);
  assert_eq!(count(&s, "events").await, 0);
  assert_eq!(count(&s, "relationships").await, 0);
  assert_eq!(count(&s, "genetic_profiles").await, 0);

  assert!(s.get_source(source.source_id).await.unwrap().is_some());
  assert!(s.get_place(place.place_id).await.unwrap().is_some());
  assert!(s.get_person(mary.person_id).await.unwrap().is_some());
  assert!(!s.delete_person(jane.person_id).await.unwrap());
}

// ─── Relationships ───────────────────────────────────────────────────────────

#[tokio::test]
async fn relationship_is_removed_with_either_party() {
  for delete_parent in [true, false] {
    let s = store().await;
    let parent = s.add_person(NewPerson::named("Ruth", "Doe")).await.unwrap();
    let child = s.add_person(NewPerson::named("Jane", "Doe")).await.unwrap();

    let mut rel =
      NewRelationship::new(parent.person_id, RelationshipType::ParentOf, child.person_id);
    rel.confidence = conf(0.9);
    let rel = s.add_relationship(rel).await.unwrap();

    let view = s.materialize(child.person_id).await.unwrap().unwrap();
    assert_eq!(view.relationships.len(), 1);
    assert_eq!(view.relationships[0].relationship_id, rel.relationship_id);
    assert_eq!(view.relationships[0].confidence.map(Confidence::value), Some(0.9));

    let victim = if delete_parent { parent.person_id } else { child.person_id };
    s.delete_person(victim).await.unwrap();
    assert_eq!(count(&s, "relationships").await, 0);
  }
}

#[tokio::test]
async fn self_relationship_is_rejected() {
  let s = store().await;
  let p = s.add_person(NewPerson::named("Jane", "Doe")).await.unwrap();
  let err = s
    .add_relationship(NewRelationship::new(
      p.person_id,
      RelationshipType::SpouseOf,
      p.person_id,
    ))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ConstraintViolation(_)));
}

// ─── Sources ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn deleting_source_clears_references() {
  let s = store().await;
  let source = s.add_source(NewSource::titled("Plantation ledger")).await.unwrap();
  let a = s.add_person(NewPerson::named("Jane", "Doe")).await.unwrap();
  let b = s.add_person(NewPerson::named("Sam", "Doe")).await.unwrap();

  let mut name = NewPersonName::new(a.person_id, NameType::Birth);
  name.source_id = Some(source.source_id);
  s.add_name(name).await.unwrap();

  let mut event = NewEvent::new(a.person_id, "birth");
  event.source_id = Some(source.source_id);
  s.add_event(event).await.unwrap();

  let mut rel = NewRelationship::new(a.person_id, RelationshipType::SiblingOf, b.person_id);
  rel.source_id = Some(source.source_id);
  s.add_relationship(rel).await.unwrap();

  s.add_genetic_profile(NewGeneticProfile {
    person_id:    a.person_id,
    profile_type: "autosomal".into(),
    haplogroup:   None,
    regions:      BTreeMap::from([("Nigeria".to_owned(), 42.0)]),
    lab:          Some("Lab".into()),
    test_date:    NaiveDate::from_ymd_opt(2021, 3, 4),
    source_id:    Some(source.source_id),
  })
  .await
  .unwrap();

  s.add_assertion(NewAssertion {
    subject_type: SubjectType::Person,
    subject_id:   a.person_id,
    predicate:    "occupation".into(),
    object_value: "seamstress".into(),
    confidence:   conf(0.5),
    source_id:    Some(source.source_id),
  })
  .await
  .unwrap();

  let document = s
    .add_document(NewDocument {
      source_id: Some(source.source_id),
      storage_path: "ledger.jpg".into(),
      ..Default::default()
    })
    .await
    .unwrap();

  assert!(s.delete_source(source.source_id).await.unwrap());

  let view = s.materialize(a.person_id).await.unwrap().unwrap();
  assert_eq!(view.names.len(), 1);
  assert!(view.names[0].source_id.is_none());
  assert_eq!(view.events.len(), 1);
  assert!(view.events[0].source_id.is_none());
  assert_eq!(view.relationships.len(), 1);
  assert!(view.relationships[0].source_id.is_none());
  assert_eq!(view.genetic_profiles.len(), 1);
  assert!(view.genetic_profiles[0].source_id.is_none());
  assert_eq!(view.genetic_profiles[0].regions.get("Nigeria"), Some(&42.0));
  assert_eq!(view.assertions.len(), 1);
  assert!(view.assertions[0].source_id.is_none());

  let doc = s.get_document(document.document_id).await.unwrap().unwrap();
  assert!(doc.source_id.is_none());
}

#[tokio::test]
async fn list_documents_by_source() {
  let s = store().await;
  let census = s.add_source(NewSource::titled("Census")).await.unwrap();
  let ledger = s.add_source(NewSource::titled("Ledger")).await.unwrap();

  for (path, source) in [("a.png", &census), ("b.png", &census), ("c.png", &ledger)] {
    s.add_document(NewDocument {
      source_id: Some(source.source_id),
      storage_path: path.into(),
      ..Default::default()
    })
    .await
    .unwrap();
  }

  assert_eq!(s.list_documents(Some(census.source_id)).await.unwrap().len(), 2);
  assert_eq!(s.list_documents(None).await.unwrap().len(), 3);
  assert_eq!(s.list_sources().await.unwrap().len(), 2);
}

// ─── Genetic profiles ────────────────────────────────────────────────────────

#[tokio::test]
async fn genetic_profile_percentages_are_validated() {
  let s = store().await;
  let p = s.add_person(NewPerson::named("Jane", "Doe")).await.unwrap();
  let err = s
    .add_genetic_profile(NewGeneticProfile {
      person_id:    p.person_id,
      profile_type: "autosomal".into(),
      haplogroup:   None,
      regions:      BTreeMap::from([("Ghana".to_owned(), 140.0)]),
      lab:          None,
      test_date:    None,
      source_id:    None,
    })
    .await
    .unwrap_err();
  assert_eq!(err.failure_kind(), FailureKind::Invalid);
  assert_eq!(count(&s, "genetic_profiles").await, 0);
}

// ─── Assertions ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn assertion_requires_existing_subject() {
  let s = store().await;
  let err = s
    .add_assertion(NewAssertion {
      subject_type: SubjectType::Place,
      subject_id:   Uuid::new_v4(),
      predicate:    "county".into(),
      object_value: "Chatham".into(),
      confidence:   None,
      source_id:    None,
    })
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::SubjectNotFound { subject_type: SubjectType::Place, .. }
  ));
  assert_eq!(count(&s, "assertions").await, 0);
}

#[tokio::test]
async fn assertions_about_any_subject_type() {
  let s = store().await;
  let place = s.add_place(NewPlace::named("Beaufort")).await.unwrap();

  s.add_assertion(NewAssertion {
    subject_type: SubjectType::Place,
    subject_id:   place.place_id,
    predicate:    "county".into(),
    object_value: "Beaufort District".into(),
    confidence:   conf(0.8),
    source_id:    None,
  })
  .await
  .unwrap();

  let found = s
    .list_assertions(SubjectType::Place, place.place_id)
    .await
    .unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].object_value, "Beaufort District");

  // Same id under a different subject type matches nothing.
  let none = s
    .list_assertions(SubjectType::Person, place.place_id)
    .await
    .unwrap();
  assert!(none.is_empty());
}

#[tokio::test]
async fn assertions_outlive_their_subject() {
  let s = store().await;
  let p = s.add_person(NewPerson::named("Jane", "Doe")).await.unwrap();
  s.add_assertion(NewAssertion {
    subject_type: SubjectType::Person,
    subject_id:   p.person_id,
    predicate:    "literate".into(),
    object_value: "yes".into(),
    confidence:   None,
    source_id:    None,
  })
  .await
  .unwrap();

  s.delete_person(p.person_id).await.unwrap();
  let left = s
    .list_assertions(SubjectType::Person, p.person_id)
    .await
    .unwrap();
  assert_eq!(left.len(), 1);
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_matches_canonical_and_alternate_names() {
  let s = store().await;
  let jane = s
    .add_person(NewPerson {
      birth_year_approx: Some(1835),
      ..NewPerson::named("Jane", "Doe")
    })
    .await
    .unwrap();
  let sam = s
    .add_person(NewPerson {
      birth_year_approx: Some(1860),
      ..NewPerson::named("Samuel", "Freeman")
    })
    .await
    .unwrap();

  let mut alias = NewPersonName::new(jane.person_id, NameType::SlaveName);
  alias.given_name = Some("Jenny".into());
  s.add_name(alias).await.unwrap();

  let by_alias = s
    .search(&PersonQuery { text: Some("jenny".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_alias.len(), 1);
  assert_eq!(by_alias[0].person_id, jane.person_id);

  let by_full = s
    .search(&PersonQuery { text: Some("Samuel Free".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_full.len(), 1);
  assert_eq!(by_full[0].person_id, sam.person_id);

  let by_year = s
    .search(&PersonQuery { birth_year_from: Some(1850), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_year.len(), 1);
  assert_eq!(by_year[0].person_id, sam.person_id);

  let everyone = s.search(&PersonQuery::default()).await.unwrap();
  assert_eq!(everyone.len(), 2);
  // Ordered by surname.
  assert_eq!(everyone[0].person_id, jane.person_id);

  let paged = s
    .search(&PersonQuery { limit: Some(1), offset: Some(1), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(paged.len(), 1);
  assert_eq!(paged[0].person_id, sam.person_id);
}

#[tokio::test]
async fn search_text_wildcards_are_literal() {
  let s = store().await;
  s.add_person(NewPerson::named("Jane", "Doe")).await.unwrap();
  let odd = s.add_person(NewPerson::named("Ann_e", "100%")).await.unwrap();

  for (text, expected) in [("_", 1), ("%", 1), ("\\", 0), ("Ann_e", 1), ("An_e", 0)] {
    let found = s
      .search(&PersonQuery { text: Some(text.into()), ..Default::default() })
      .await
      .unwrap();
    assert_eq!(found.len(), expected, "{text:?}");
    if expected == 1 {
      assert_eq!(found[0].person_id, odd.person_id);
    }
  }
}

#[tokio::test]
async fn huge_limit_does_not_wrap() {
  let s = store().await;
  s.add_person(NewPerson::named("Jane", "Doe")).await.unwrap();
  s.add_person(NewPerson::named("Mary", "Doe")).await.unwrap();

  let all = s
    .search(&PersonQuery { limit: Some(usize::MAX), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(all.len(), 2);

  let past_end = s
    .search(&PersonQuery { offset: Some(usize::MAX), ..Default::default() })
    .await
    .unwrap();
  assert!(past_end.is_empty());
}
