//! [`SqliteStore`]: the SQLite implementation of [`GenealogyStore`].

use std::path::Path;

use chrono::Utc;
use roots_core::{
  assertion::{Assertion, NewAssertion, SubjectType},
  person::{
    Event, GeneticProfile, NewEvent, NewGeneticProfile, NewPerson,
    NewPersonName, NewRelationship, Person, PersonName, PersonView,
    Relationship,
  },
  place::{NewPlace, NewPlaceAlias, Place, PlaceAlias, PlaceView},
  source::{Document, NewDocument, NewSource, Source},
  store::{GenealogyStore, PersonQuery},
  user::{NewUser, User},
  vocabulary::{NewVocabularyTerm, VocabularyTerm},
};
use rusqlite::{OptionalExtension as _, Row, types::Value};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    ALIAS_COLUMNS, ASSERTION_COLUMNS, DOCUMENT_COLUMNS, EVENT_COLUMNS,
    NAME_COLUMNS, PERSON_COLUMNS, PLACE_COLUMNS, PROFILE_COLUMNS,
    RELATIONSHIP_COLUMNS, SOURCE_COLUMNS, TERM_COLUMNS, USER_COLUMNS,
    RawAlias, RawAssertion, RawDocument, RawEvent, RawName, RawPerson,
    RawPlace, RawProfile, RawRelationship, RawSource, RawTerm, RawUser,
    encode_confidence, encode_dt, encode_uuid,
  },
  schema,
};

/// Bind an optional value, mapping `None` to SQL `NULL`.
fn opt<T: Into<Value>>(v: Option<T>) -> Value {
  v.map_or(Value::Null, Into::into)
}

fn opt_uuid(id: Option<Uuid>) -> Value { opt(id.map(encode_uuid)) }

/// `%text%` for `LIKE ... ESCAPE '\'`, with the wildcards in `text` taken
/// literally.
fn contains_pattern(text: &str) -> String {
  let mut pattern = String::with_capacity(text.len() + 2);
  pattern.push('%');
  for c in text.chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

fn clamp_i64(n: usize) -> i64 { i64::try_from(n).unwrap_or(i64::MAX) }

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roots record store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and apply pending migrations.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    let version = self
      .conn
      .call(|conn| Ok(schema::init(conn)))
      .await??;
    tracing::debug!(version, "schema ready");
    Ok(())
  }

  /// Run a single write statement and return the number of affected rows.
  async fn exec(&self, sql: &'static str, params: Vec<Value>) -> Result<usize> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(sql, rusqlite::params_from_iter(params))?)
      })
      .await?;
    Ok(changed)
  }

  /// Run a query and collect every row through `from_row`.
  async fn fetch<R>(
    &self,
    sql: String,
    params: Vec<Value>,
    from_row: fn(&Row<'_>) -> rusqlite::Result<R>,
  ) -> Result<Vec<R>>
  where
    R: Send + 'static,
  {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Run a query expected to match at most one row.
  async fn fetch_one<R>(
    &self,
    sql: String,
    params: Vec<Value>,
    from_row: fn(&Row<'_>) -> rusqlite::Result<R>,
  ) -> Result<Option<R>>
  where
    R: Send + 'static,
  {
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(params), from_row)
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }
}

// ─── GenealogyStore impl ─────────────────────────────────────────────────────

impl GenealogyStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:       Uuid::new_v4(),
      username:      input.username,
      password_hash: input.password_hash,
      role:          input.role,
      created_at:    Utc::now(),
    };

    self
      .exec(
        "INSERT INTO users (user_id, username, password_hash, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        vec![
          encode_uuid(user.user_id).into(),
          user.username.clone().into(),
          user.password_hash.clone().into(),
          user.role.to_string().into(),
          encode_dt(user.created_at).into(),
        ],
      )
      .await?;

    Ok(user)
  }

  async fn get_user_by_username(&self, username: String) -> Result<Option<User>> {
    self
      .fetch_one(
        format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
        vec![username.into()],
        RawUser::from_row,
      )
      .await?
      .map(RawUser::into_user)
      .transpose()
  }

  async fn set_password_hash(
    &self,
    user_id: Uuid,
    password_hash: String,
  ) -> Result<bool> {
    let changed = self
      .exec(
        "UPDATE users SET password_hash = ?2 WHERE user_id = ?1",
        vec![encode_uuid(user_id).into(), password_hash.into()],
      )
      .await?;
    Ok(changed > 0)
  }

  async fn count_users(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?)
      })
      .await?;
    Ok(count.max(0) as u64)
  }

  // ── Vocabulary ────────────────────────────────────────────────────────────

  async fn add_term(&self, input: NewVocabularyTerm) -> Result<VocabularyTerm> {
    let term = VocabularyTerm {
      term_id:     Uuid::new_v4(),
      scheme:      input.scheme,
      code:        input.code,
      label:       input.label,
      description: input.description,
      created_at:  Utc::now(),
    };

    self
      .exec(
        "INSERT INTO vocabulary_terms
           (term_id, scheme, code, label, description, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        vec![
          encode_uuid(term.term_id).into(),
          term.scheme.clone().into(),
          term.code.clone().into(),
          term.label.clone().into(),
          opt(term.description.clone()),
          encode_dt(term.created_at).into(),
        ],
      )
      .await?;

    Ok(term)
  }

  async fn list_terms(&self, scheme: Option<String>) -> Result<Vec<VocabularyTerm>> {
    self
      .fetch(
        format!(
          "SELECT {TERM_COLUMNS} FROM vocabulary_terms
           WHERE ?1 IS NULL OR scheme = ?1
           ORDER BY scheme, code"
        ),
        vec![opt(scheme)],
        RawTerm::from_row,
      )
      .await?
      .into_iter()
      .map(RawTerm::into_term)
      .collect()
  }

  // ── Places ────────────────────────────────────────────────────────────────

  async fn add_place(&self, input: NewPlace) -> Result<Place> {
    let place = Place {
      place_id:   Uuid::new_v4(),
      name:       input.name,
      place_type: input.place_type,
      latitude:   input.latitude,
      longitude:  input.longitude,
      start_year: input.start_year,
      end_year:   input.end_year,
      shape:      input.shape,
      created_at: Utc::now(),
    };
    let shape_str = place.shape.as_ref().map(serde_json::to_string).transpose()?;

    self
      .exec(
        "INSERT INTO places (
           place_id, name, place_type, latitude, longitude,
           start_year, end_year, shape, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        vec![
          encode_uuid(place.place_id).into(),
          place.name.clone().into(),
          opt(place.place_type.clone()),
          opt(place.latitude),
          opt(place.longitude),
          opt(place.start_year),
          opt(place.end_year),
          opt(shape_str),
          encode_dt(place.created_at).into(),
        ],
      )
      .await?;

    Ok(place)
  }

  async fn get_place(&self, id: Uuid) -> Result<Option<PlaceView>> {
    let place = match self
      .fetch_one(
        format!("SELECT {PLACE_COLUMNS} FROM places WHERE place_id = ?1"),
        vec![encode_uuid(id).into()],
        RawPlace::from_row,
      )
      .await?
    {
      Some(raw) => raw.into_place()?,
      None => return Ok(None),
    };

    let aliases = self.list_place_aliases(id).await?;
    Ok(Some(PlaceView { place, aliases }))
  }

  async fn list_places(&self) -> Result<Vec<Place>> {
    self
      .fetch(
        format!("SELECT {PLACE_COLUMNS} FROM places ORDER BY name"),
        vec![],
        RawPlace::from_row,
      )
      .await?
      .into_iter()
      .map(RawPlace::into_place)
      .collect()
  }

  async fn delete_place(&self, id: Uuid) -> Result<bool> {
    let changed = self
      .exec("DELETE FROM places WHERE place_id = ?1", vec![
        encode_uuid(id).into(),
      ])
      .await?;
    Ok(changed > 0)
  }

  async fn add_place_alias(&self, input: NewPlaceAlias) -> Result<PlaceAlias> {
    let alias = PlaceAlias {
      alias_id:   Uuid::new_v4(),
      place_id:   input.place_id,
      name:       input.name,
      language:   input.language,
      start_year: input.start_year,
      end_year:   input.end_year,
      created_at: Utc::now(),
    };

    self
      .exec(
        "INSERT INTO place_aliases (
           alias_id, place_id, name, language, start_year, end_year, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        vec![
          encode_uuid(alias.alias_id).into(),
          encode_uuid(alias.place_id).into(),
          alias.name.clone().into(),
          opt(alias.language.clone()),
          opt(alias.start_year),
          opt(alias.end_year),
          encode_dt(alias.created_at).into(),
        ],
      )
      .await?;

    Ok(alias)
  }

  async fn list_place_aliases(&self, place_id: Uuid) -> Result<Vec<PlaceAlias>> {
    self
      .fetch(
        format!(
          "SELECT {ALIAS_COLUMNS} FROM place_aliases
           WHERE place_id = ?1
           ORDER BY start_year, name"
        ),
        vec![encode_uuid(place_id).into()],
        RawAlias::from_row,
      )
      .await?
      .into_iter()
      .map(RawAlias::into_alias)
      .collect()
  }

  // ── Sources & documents ───────────────────────────────────────────────────

  async fn add_source(&self, input: NewSource) -> Result<Source> {
    let source = Source {
      source_id:   Uuid::new_v4(),
      title:       input.title,
      author:      input.author,
      source_type: input.source_type,
      repository:  input.repository,
      citation:    input.citation,
      rights:      input.rights,
      created_at:  Utc::now(),
    };

    self
      .exec(
        "INSERT INTO sources (
           source_id, title, author, source_type, repository,
           citation, rights, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        vec![
          encode_uuid(source.source_id).into(),
          source.title.clone().into(),
          opt(source.author.clone()),
          opt(source.source_type.clone()),
          opt(source.repository.clone()),
          opt(source.citation.clone()),
          opt(source.rights.clone()),
          encode_dt(source.created_at).into(),
        ],
      )
      .await?;

    Ok(source)
  }

  async fn get_source(&self, id: Uuid) -> Result<Option<Source>> {
    self
      .fetch_one(
        format!("SELECT {SOURCE_COLUMNS} FROM sources WHERE source_id = ?1"),
        vec![encode_uuid(id).into()],
        RawSource::from_row,
      )
      .await?
      .map(RawSource::into_source)
      .transpose()
  }

  async fn list_sources(&self) -> Result<Vec<Source>> {
    self
      .fetch(
        format!("SELECT {SOURCE_COLUMNS} FROM sources ORDER BY title"),
        vec![],
        RawSource::from_row,
      )
      .await?
      .into_iter()
      .map(RawSource::into_source)
      .collect()
  }

  async fn delete_source(&self, id: Uuid) -> Result<bool> {
    let changed = self
      .exec("DELETE FROM sources WHERE source_id = ?1", vec![
        encode_uuid(id).into(),
      ])
      .await?;
    Ok(changed > 0)
  }

  async fn add_document(&self, input: NewDocument) -> Result<Document> {
    let document = Document {
      document_id:       Uuid::new_v4(),
      source_id:         input.source_id,
      storage_path:      input.storage_path,
      thumbnail_path:    input.thumbnail_path,
      doc_type:          input.doc_type,
      original_filename: input.original_filename,
      media_type:        input.media_type,
      size_bytes:        input.size_bytes,
      content_hash:      input.content_hash,
      created_at:        Utc::now(),
    };

    self
      .exec(
        "INSERT INTO documents (
           document_id, source_id, storage_path, thumbnail_path, doc_type,
           original_filename, media_type, size_bytes, content_hash, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        vec![
          encode_uuid(document.document_id).into(),
          opt_uuid(document.source_id),
          document.storage_path.clone().into(),
          opt(document.thumbnail_path.clone()),
          opt(document.doc_type.clone()),
          opt(document.original_filename.clone()),
          opt(document.media_type.clone()),
          opt(document.size_bytes),
          opt(document.content_hash.clone()),
          encode_dt(document.created_at).into(),
        ],
      )
      .await?;

    Ok(document)
  }

  async fn get_document(&self, id: Uuid) -> Result<Option<Document>> {
    self
      .fetch_one(
        format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE document_id = ?1"),
        vec![encode_uuid(id).into()],
        RawDocument::from_row,
      )
      .await?
      .map(RawDocument::into_document)
      .transpose()
  }

  async fn list_documents(&self, source_id: Option<Uuid>) -> Result<Vec<Document>> {
    self
      .fetch(
        format!(
          "SELECT {DOCUMENT_COLUMNS} FROM documents
           WHERE ?1 IS NULL OR source_id = ?1
           ORDER BY created_at"
        ),
        vec![opt_uuid(source_id)],
        RawDocument::from_row,
      )
      .await?
      .into_iter()
      .map(RawDocument::into_document)
      .collect()
  }

  // ── Persons ───────────────────────────────────────────────────────────────

  async fn add_person(&self, input: NewPerson) -> Result<Person> {
    let person = Person {
      person_id:         Uuid::new_v4(),
      given_name:        input.given_name,
      surname:           input.surname,
      sex_recorded:      input.sex_recorded,
      birth_year_approx: input.birth_year_approx,
      death_year_approx: input.death_year_approx,
      ethnicity_code:    input.ethnicity_code,
      notes:             input.notes,
      created_at:        Utc::now(),
    };

    self
      .exec(
        "INSERT INTO persons (
           person_id, given_name, surname, sex_recorded, birth_year_approx,
           death_year_approx, ethnicity_code, notes, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        vec![
          encode_uuid(person.person_id).into(),
          opt(person.given_name.clone()),
          opt(person.surname.clone()),
          opt(person.sex_recorded.clone()),
          opt(person.birth_year_approx),
          opt(person.death_year_approx),
          opt(person.ethnicity_code.clone()),
          opt(person.notes.clone()),
          encode_dt(person.created_at).into(),
        ],
      )
      .await?;

    Ok(person)
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    self
      .fetch_one(
        format!("SELECT {PERSON_COLUMNS} FROM persons WHERE person_id = ?1"),
        vec![encode_uuid(id).into()],
        RawPerson::from_row,
      )
      .await?
      .map(RawPerson::into_person)
      .transpose()
  }

  async fn delete_person(&self, id: Uuid) -> Result<bool> {
    let changed = self
      .exec("DELETE FROM persons WHERE person_id = ?1", vec![
        encode_uuid(id).into(),
      ])
      .await?;
    Ok(changed > 0)
  }

  async fn materialize(&self, id: Uuid) -> Result<Option<PersonView>> {
    let id_str = encode_uuid(id);

    // One connection call so the view is read from a single snapshot.
    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(person) = tx
          .query_row(
            &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE person_id = ?1"),
            [&id_str],
            RawPerson::from_row,
          )
          .optional()?
        else {
          return Ok(None);
        };

        let names = tx
          .prepare(&format!(
            "SELECT {NAME_COLUMNS} FROM person_names
             WHERE person_id = ?1 ORDER BY start_year, created_at"
          ))?
          .query_map([&id_str], RawName::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let events = tx
          .prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events
             WHERE person_id = ?1 ORDER BY year, month, day, created_at"
          ))?
          .query_map([&id_str], RawEvent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let relationships = tx
          .prepare(&format!(
            "SELECT {RELATIONSHIP_COLUMNS} FROM relationships
             WHERE person_a_id = ?1 OR person_b_id = ?1
             ORDER BY start_year, created_at"
          ))?
          .query_map([&id_str], RawRelationship::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let profiles = tx
          .prepare(&format!(
            "SELECT {PROFILE_COLUMNS} FROM genetic_profiles
             WHERE person_id = ?1 ORDER BY created_at"
          ))?
          .query_map([&id_str], RawProfile::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let assertions = tx
          .prepare(&format!(
            "SELECT {ASSERTION_COLUMNS} FROM assertions
             WHERE subject_type = 'person' AND subject_id = ?1
             ORDER BY created_at"
          ))?
          .query_map([&id_str], RawAssertion::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        tx.commit()?;
        Ok(Some((person, names, events, relationships, profiles, assertions)))
      })
      .await?;

    let Some((person, names, events, relationships, profiles, assertions)) = raw
    else {
      return Ok(None);
    };

    Ok(Some(PersonView {
      person:           person.into_person()?,
      names:            names
        .into_iter()
        .map(RawName::into_name)
        .collect::<Result<_>>()?,
      events:           events
        .into_iter()
        .map(RawEvent::into_event)
        .collect::<Result<_>>()?,
      relationships:    relationships
        .into_iter()
        .map(RawRelationship::into_relationship)
        .collect::<Result<_>>()?,
      genetic_profiles: profiles
        .into_iter()
        .map(RawProfile::into_profile)
        .collect::<Result<_>>()?,
      assertions:       assertions
        .into_iter()
        .map(RawAssertion::into_assertion)
        .collect::<Result<_>>()?,
    }))
  }

  async fn search(&self, query: &PersonQuery) -> Result<Vec<Person>> {
    // SQL LIKE over canonical names and every recorded name.
    let text_pattern = query.text.as_deref().map(|t| contains_pattern(t.trim()));
    let limit_val    = clamp_i64(query.limit.unwrap_or(100));
    let offset_val   = clamp_i64(query.offset.unwrap_or(0));

    self
      .fetch(
        format!(
          "SELECT {PERSON_COLUMNS} FROM persons p
           WHERE (?1 IS NULL
                  OR p.given_name LIKE ?1 ESCAPE '\\'
                  OR p.surname LIKE ?1 ESCAPE '\\'
                  OR COALESCE(p.given_name, '') || ' ' || COALESCE(p.surname, '') LIKE ?1 ESCAPE '\\'
                  OR EXISTS (
                       SELECT 1 FROM person_names n
                       WHERE n.person_id = p.person_id
                         AND (n.given_name LIKE ?1 ESCAPE '\\'
                              OR n.surname LIKE ?1 ESCAPE '\\'
                              OR COALESCE(n.given_name, '') || ' ' || COALESCE(n.surname, '') LIKE ?1 ESCAPE '\\')))
             AND (?2 IS NULL OR p.birth_year_approx >= ?2)
             AND (?3 IS NULL OR p.birth_year_approx <= ?3)
           ORDER BY p.surname, p.given_name, p.created_at
           LIMIT ?4 OFFSET ?5"
        ),
        vec![
          opt(text_pattern),
          opt(query.birth_year_from),
          opt(query.birth_year_to),
          limit_val.into(),
          offset_val.into(),
        ],
        RawPerson::from_row,
      )
      .await?
      .into_iter()
      .map(RawPerson::into_person)
      .collect()
  }

  // ── Person facts ──────────────────────────────────────────────────────────

  async fn add_name(&self, input: NewPersonName) -> Result<PersonName> {
    let name = PersonName {
      name_id:    Uuid::new_v4(),
      person_id:  input.person_id,
      name_type:  input.name_type,
      given_name: input.given_name,
      surname:    input.surname,
      language:   input.language,
      start_year: input.start_year,
      end_year:   input.end_year,
      confidence: input.confidence,
      source_id:  input.source_id,
      created_at: Utc::now(),
    };

    self
      .exec(
        "INSERT INTO person_names (
           name_id, person_id, name_type, given_name, surname, language,
           start_year, end_year, confidence, source_id, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        vec![
          encode_uuid(name.name_id).into(),
          encode_uuid(name.person_id).into(),
          name.name_type.to_string().into(),
          opt(name.given_name.clone()),
          opt(name.surname.clone()),
          opt(name.language.clone()),
          opt(name.start_year),
          opt(name.end_year),
          opt(encode_confidence(name.confidence)),
          opt_uuid(name.source_id),
          encode_dt(name.created_at).into(),
        ],
      )
      .await?;

    Ok(name)
  }

  async fn add_event(&self, input: NewEvent) -> Result<Event> {
    let event = Event {
      event_id:    Uuid::new_v4(),
      person_id:   input.person_id,
      event_type:  input.event_type,
      place_id:    input.place_id,
      date_text:   input.date_text,
      year:        input.year,
      month:       input.month,
      day:         input.day,
      description: input.description,
      confidence:  input.confidence,
      source_id:   input.source_id,
      created_at:  Utc::now(),
    };

    self
      .exec(
        "INSERT INTO events (
           event_id, person_id, event_type, place_id, date_text, year, month,
           day, description, confidence, source_id, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        vec![
          encode_uuid(event.event_id).into(),
          encode_uuid(event.person_id).into(),
          event.event_type.clone().into(),
          opt_uuid(event.place_id),
          opt(event.date_text.clone()),
          opt(event.year),
          opt(event.month),
          opt(event.day),
          opt(event.description.clone()),
          opt(encode_confidence(event.confidence)),
          opt_uuid(event.source_id),
          encode_dt(event.created_at).into(),
        ],
      )
      .await?;

    Ok(event)
  }

  async fn add_relationship(&self, input: NewRelationship) -> Result<Relationship> {
    let relationship = Relationship {
      relationship_id: Uuid::new_v4(),
      person_a_id:     input.person_a_id,
      person_b_id:     input.person_b_id,
      rel_type:        input.rel_type,
      start_year:      input.start_year,
      end_year:        input.end_year,
      confidence:      input.confidence,
      source_id:       input.source_id,
      created_at:      Utc::now(),
    };

    self
      .exec(
        "INSERT INTO relationships (
           relationship_id, person_a_id, person_b_id, rel_type, start_year,
           end_year, confidence, source_id, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        vec![
          encode_uuid(relationship.relationship_id).into(),
          encode_uuid(relationship.person_a_id).into(),
          encode_uuid(relationship.person_b_id).into(),
          relationship.rel_type.to_string().into(),
          opt(relationship.start_year),
          opt(relationship.end_year),
          opt(encode_confidence(relationship.confidence)),
          opt_uuid(relationship.source_id),
          encode_dt(relationship.created_at).into(),
        ],
      )
      .await?;

    Ok(relationship)
  }

  async fn add_genetic_profile(
    &self,
    input: NewGeneticProfile,
  ) -> Result<GeneticProfile> {
    input.validate()?;

    let profile = GeneticProfile {
      profile_id:   Uuid::new_v4(),
      person_id:    input.person_id,
      profile_type: input.profile_type,
      haplogroup:   input.haplogroup,
      regions:      input.regions,
      lab:          input.lab,
      test_date:    input.test_date,
      source_id:    input.source_id,
      created_at:   Utc::now(),
    };
    let regions_str = serde_json::to_string(&profile.regions)?;

    self
      .exec(
        "INSERT INTO genetic_profiles (
           profile_id, person_id, profile_type, haplogroup, regions, lab,
           test_date, source_id, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        vec![
          encode_uuid(profile.profile_id).into(),
          encode_uuid(profile.person_id).into(),
          profile.profile_type.clone().into(),
          opt(profile.haplogroup.clone()),
          regions_str.into(),
          opt(profile.lab.clone()),
          opt(profile.test_date.map(|d| d.format("%Y-%m-%d").to_string())),
          opt_uuid(profile.source_id),
          encode_dt(profile.created_at).into(),
        ],
      )
      .await?;

    Ok(profile)
  }

  // ── Assertions ────────────────────────────────────────────────────────────

  async fn add_assertion(&self, input: NewAssertion) -> Result<Assertion> {
    let assertion = Assertion {
      assertion_id: Uuid::new_v4(),
      subject_type: input.subject_type,
      subject_id:   input.subject_id,
      predicate:    input.predicate,
      object_value: input.object_value,
      confidence:   input.confidence,
      source_id:    input.source_id,
      created_at:   Utc::now(),
    };

    let (table, id_column) = assertion.subject_type.table();
    let exists_sql = format!("SELECT 1 FROM {table} WHERE {id_column} = ?1");
    let params: Vec<Value> = vec![
      encode_uuid(assertion.assertion_id).into(),
      assertion.subject_type.to_string().into(),
      encode_uuid(assertion.subject_id).into(),
      assertion.predicate.clone().into(),
      assertion.object_value.clone().into(),
      opt(encode_confidence(assertion.confidence)),
      opt_uuid(assertion.source_id),
      encode_dt(assertion.created_at).into(),
    ];
    let subject_id_str = encode_uuid(assertion.subject_id);

    // Subject check and insert share one transaction so the subject cannot
    // vanish in between.
    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists = tx
          .query_row(&exists_sql, [&subject_id_str], |_| Ok(()))
          .optional()?
          .is_some();
        if !exists {
          return Ok(false);
        }
        tx.execute(
          "INSERT INTO assertions (
             assertion_id, subject_type, subject_id, predicate, object_value,
             confidence, source_id, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params_from_iter(params),
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::SubjectNotFound {
        subject_type: assertion.subject_type,
        subject_id:   assertion.subject_id,
      });
    }

    Ok(assertion)
  }

  async fn list_assertions(
    &self,
    subject_type: SubjectType,
    subject_id: Uuid,
  ) -> Result<Vec<Assertion>> {
    self
      .fetch(
        format!(
          "SELECT {ASSERTION_COLUMNS} FROM assertions
           WHERE subject_type = ?1 AND subject_id = ?2
           ORDER BY created_at"
        ),
        vec![subject_type.to_string().into(), encode_uuid(subject_id).into()],
        RawAssertion::from_row,
      )
      .await?
      .into_iter()
      .map(RawAssertion::into_assertion)
      .collect()
  }
}
