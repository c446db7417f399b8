//! SQL schema for the Roots SQLite store.
//!
//! Connection pragmas run on every open. Migrations are gated on
//! `PRAGMA user_version` and applied inside one transaction; every statement
//! is also guarded with `IF NOT EXISTS`, so re-running is harmless.

use rusqlite::Connection;

use crate::{Error, Result};

/// Per-connection settings. `foreign_keys` must be on for the cascade and
/// set-null behaviour the schema relies on.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

struct Migration {
  version: u32,
  sql:     &'static str,
}

const MIGRATIONS: &[Migration] = &[
  Migration { version: 1, sql: INITIAL },
  Migration { version: 2, sql: INDEXES },
];

const INITIAL: &str = "
CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role          TEXT NOT NULL DEFAULT 'viewer'
                  CHECK (role IN ('admin', 'editor', 'viewer')),
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS vocabulary_terms (
    term_id     TEXT PRIMARY KEY,
    scheme      TEXT NOT NULL,
    code        TEXT NOT NULL,
    label       TEXT NOT NULL,
    description TEXT,
    created_at  TEXT NOT NULL,
    UNIQUE (scheme, code)
);

CREATE TABLE IF NOT EXISTS places (
    place_id   TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    place_type TEXT,
    latitude   REAL CHECK (latitude  BETWEEN -90  AND 90),
    longitude  REAL CHECK (longitude BETWEEN -180 AND 180),
    start_year INTEGER,
    end_year   INTEGER,
    shape      TEXT,            -- GeoJSON geometry
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS place_aliases (
    alias_id   TEXT PRIMARY KEY,
    place_id   TEXT NOT NULL REFERENCES places(place_id) ON DELETE CASCADE,
    name       TEXT NOT NULL,
    language   TEXT,
    start_year INTEGER,
    end_year   INTEGER,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sources (
    source_id   TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    author      TEXT,
    source_type TEXT,
    repository  TEXT,
    citation    TEXT,
    rights      TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS documents (
    document_id       TEXT PRIMARY KEY,
    source_id         TEXT REFERENCES sources(source_id) ON DELETE SET NULL,
    storage_path      TEXT NOT NULL,
    thumbnail_path    TEXT,
    doc_type          TEXT,
    original_filename TEXT,
    media_type        TEXT,
    size_bytes        INTEGER CHECK (size_bytes >= 0),
    content_hash      TEXT,
    created_at        TEXT NOT NULL
);

-- No uniqueness on persons, names, or events: duplicates are expected.
CREATE TABLE IF NOT EXISTS persons (
    person_id         TEXT PRIMARY KEY,
    given_name        TEXT,
    surname           TEXT,
    sex_recorded      TEXT,
    birth_year_approx INTEGER,
    death_year_approx INTEGER,
    ethnicity_code    TEXT,        -- vocabulary code, not enforced
    notes             TEXT,
    created_at        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS person_names (
    name_id    TEXT PRIMARY KEY,
    person_id  TEXT NOT NULL REFERENCES persons(person_id) ON DELETE CASCADE,
    name_type  TEXT NOT NULL CHECK (name_type IN (
                 'birth', 'alias', 'married', 'slave_name',
                 'emancipated_name', 'nickname')),
    given_name TEXT,
    surname    TEXT,
    language   TEXT,
    start_year INTEGER,
    end_year   INTEGER,
    confidence REAL CHECK (confidence BETWEEN 0 AND 1),
    source_id  TEXT REFERENCES sources(source_id) ON DELETE SET NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS events (
    event_id    TEXT PRIMARY KEY,
    person_id   TEXT NOT NULL REFERENCES persons(person_id) ON DELETE CASCADE,
    event_type  TEXT NOT NULL,     -- vocabulary code, not enforced
    place_id    TEXT REFERENCES places(place_id) ON DELETE SET NULL,
    date_text   TEXT,              -- as written; never parsed
    year        INTEGER,
    month       INTEGER CHECK (month BETWEEN 1 AND 12),
    day         INTEGER CHECK (day   BETWEEN 1 AND 31),
    description TEXT,
    confidence  REAL CHECK (confidence BETWEEN 0 AND 1),
    source_id   TEXT REFERENCES sources(source_id) ON DELETE SET NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS relationships (
    relationship_id TEXT PRIMARY KEY,
    person_a_id     TEXT NOT NULL REFERENCES persons(person_id) ON DELETE CASCADE,
    person_b_id     TEXT NOT NULL REFERENCES persons(person_id) ON DELETE CASCADE,
    rel_type        TEXT NOT NULL CHECK (rel_type IN (
                      'parent_of', 'spouse_of', 'sibling_of',
                      'adoptive_parent_of', 'enslaver_of', 'guardian_of')),
    start_year      INTEGER,
    end_year        INTEGER,
    confidence      REAL CHECK (confidence BETWEEN 0 AND 1),
    source_id       TEXT REFERENCES sources(source_id) ON DELETE SET NULL,
    created_at      TEXT NOT NULL,
    CHECK (person_a_id != person_b_id)
);

CREATE TABLE IF NOT EXISTS genetic_profiles (
    profile_id   TEXT PRIMARY KEY,
    person_id    TEXT NOT NULL REFERENCES persons(person_id) ON DELETE CASCADE,
    profile_type TEXT NOT NULL,
    haplogroup   TEXT,
    regions      TEXT NOT NULL DEFAULT '{}',   -- JSON: region -> percentage
    lab          TEXT,
    test_date    TEXT,                         -- ISO 8601 date
    source_id    TEXT REFERENCES sources(source_id) ON DELETE SET NULL,
    created_at   TEXT NOT NULL
);

-- subject_id is deliberately not a foreign key: it may point into any of
-- several tables, named by subject_type.
CREATE TABLE IF NOT EXISTS assertions (
    assertion_id TEXT PRIMARY KEY,
    subject_type TEXT NOT NULL CHECK (subject_type IN (
                   'person', 'person_name', 'place', 'event',
                   'relationship', 'source', 'document', 'genetic_profile')),
    subject_id   TEXT NOT NULL,
    predicate    TEXT NOT NULL,
    object_value TEXT NOT NULL,
    confidence   REAL CHECK (confidence BETWEEN 0 AND 1),
    source_id    TEXT REFERENCES sources(source_id) ON DELETE SET NULL,
    created_at   TEXT NOT NULL
);
";

const INDEXES: &str = "
CREATE INDEX IF NOT EXISTS place_aliases_place_idx  ON place_aliases(place_id);
CREATE INDEX IF NOT EXISTS documents_source_idx     ON documents(source_id);
CREATE INDEX IF NOT EXISTS persons_surname_idx      ON persons(surname);
CREATE INDEX IF NOT EXISTS person_names_person_idx  ON person_names(person_id);
CREATE INDEX IF NOT EXISTS person_names_surname_idx ON person_names(surname);
CREATE INDEX IF NOT EXISTS events_person_idx        ON events(person_id);
CREATE INDEX IF NOT EXISTS events_place_idx         ON events(place_id);
CREATE INDEX IF NOT EXISTS relationships_a_idx      ON relationships(person_a_id);
CREATE INDEX IF NOT EXISTS relationships_b_idx      ON relationships(person_b_id);
CREATE INDEX IF NOT EXISTS genetic_profiles_person_idx ON genetic_profiles(person_id);
CREATE INDEX IF NOT EXISTS assertions_subject_idx   ON assertions(subject_type, subject_id);
";

/// The schema version this binary writes.
pub fn latest_version() -> u32 {
  MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Apply connection pragmas and every pending migration.
pub fn init(conn: &mut Connection) -> Result<u32> {
  conn.execute_batch(PRAGMAS)?;

  let current: u32 =
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
  let latest = latest_version();

  if current > latest {
    return Err(Error::UnsupportedSchemaVersion { found: current, latest });
  }
  if current == latest {
    return Ok(current);
  }

  let tx = conn.transaction()?;
  for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
    tx.execute_batch(migration.sql)?;
    tx.execute_batch(&format!("PRAGMA user_version = {}", migration.version))?;
  }
  tx.commit()?;

  Ok(latest)
}
