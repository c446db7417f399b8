//! The `GenealogyStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `roots-store-sqlite`).
//! Higher layers (`roots-api`, `roots-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  StoreFailure,
  assertion::{Assertion, NewAssertion, SubjectType},
  person::{
    Event, GeneticProfile, NewEvent, NewGeneticProfile, NewPerson,
    NewPersonName, NewRelationship, Person, PersonName, PersonView,
    Relationship,
  },
  place::{NewPlace, NewPlaceAlias, Place, PlaceAlias, PlaceView},
  source::{Document, NewDocument, NewSource, Source},
  user::{NewUser, User},
  vocabulary::{NewVocabularyTerm, VocabularyTerm},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`GenealogyStore::search`].
#[derive(Debug, Clone, Default)]
pub struct PersonQuery {
  /// Substring matched against canonical names and every recorded name.
  pub text:            Option<String>,
  pub birth_year_from: Option<i32>,
  pub birth_year_to:   Option<i32>,
  pub limit:           Option<usize>,
  pub offset:          Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Roots record store backend.
///
/// Each method is a single unit of work against the store; concurrency
/// control is left to the backend's own transaction manager.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait GenealogyStore: Send + Sync {
  type Error: std::error::Error + StoreFailure + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user_by_username(
    &self,
    username: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Replace a user's password hash. Returns `false` if the user is unknown.
  fn set_password_hash(
    &self,
    user_id: Uuid,
    password_hash: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn count_users(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Vocabulary ────────────────────────────────────────────────────────

  /// Fails with a conflict if `(scheme, code)` is already taken.
  fn add_term(
    &self,
    input: NewVocabularyTerm,
  ) -> impl Future<Output = Result<VocabularyTerm, Self::Error>> + Send + '_;

  fn list_terms(
    &self,
    scheme: Option<String>,
  ) -> impl Future<Output = Result<Vec<VocabularyTerm>, Self::Error>> + Send + '_;

  // ── Places ────────────────────────────────────────────────────────────

  fn add_place(
    &self,
    input: NewPlace,
  ) -> impl Future<Output = Result<Place, Self::Error>> + Send + '_;

  /// The place with its aliases, or `None` if not found.
  fn get_place(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<PlaceView>, Self::Error>> + Send + '_;

  fn list_places(
    &self,
  ) -> impl Future<Output = Result<Vec<Place>, Self::Error>> + Send + '_;

  /// Delete a place and, by cascade, its aliases. Events located there keep
  /// their row with the place cleared.
  fn delete_place(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Requires an existing place.
  fn add_place_alias(
    &self,
    input: NewPlaceAlias,
  ) -> impl Future<Output = Result<PlaceAlias, Self::Error>> + Send + '_;

  fn list_place_aliases(
    &self,
    place_id: Uuid,
  ) -> impl Future<Output = Result<Vec<PlaceAlias>, Self::Error>> + Send + '_;

  // ── Sources & documents ───────────────────────────────────────────────

  fn add_source(
    &self,
    input: NewSource,
  ) -> impl Future<Output = Result<Source, Self::Error>> + Send + '_;

  fn get_source(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Source>, Self::Error>> + Send + '_;

  fn list_sources(
    &self,
  ) -> impl Future<Output = Result<Vec<Source>, Self::Error>> + Send + '_;

  /// Delete a source. Every row citing it survives with its source cleared.
  fn delete_source(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn add_document(
    &self,
    input: NewDocument,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + '_;

  fn get_document(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + '_;

  fn list_documents(
    &self,
    source_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;

  // ── Persons ───────────────────────────────────────────────────────────

  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Delete a person and, by cascade, its names, events, genetic profiles
  /// and relationships. Sources and places are untouched.
  fn delete_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Materialise a [`PersonView`]. Returns `None` if the person does not
  /// exist.
  fn materialize(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<PersonView>, Self::Error>> + Send + '_;

  /// Search for persons matching `query`, ordered by surname then given name.
  fn search<'a>(
    &'a self,
    query: &'a PersonQuery,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  // ── Person facts ──────────────────────────────────────────────────────

  fn add_name(
    &self,
    input: NewPersonName,
  ) -> impl Future<Output = Result<PersonName, Self::Error>> + Send + '_;

  fn add_event(
    &self,
    input: NewEvent,
  ) -> impl Future<Output = Result<Event, Self::Error>> + Send + '_;

  fn add_relationship(
    &self,
    input: NewRelationship,
  ) -> impl Future<Output = Result<Relationship, Self::Error>> + Send + '_;

  fn add_genetic_profile(
    &self,
    input: NewGeneticProfile,
  ) -> impl Future<Output = Result<GeneticProfile, Self::Error>> + Send + '_;

  // ── Assertions ────────────────────────────────────────────────────────

  /// Record an assertion. Fails if no record of `subject_type` with
  /// `subject_id` exists at the time of the call.
  fn add_assertion(
    &self,
    input: NewAssertion,
  ) -> impl Future<Output = Result<Assertion, Self::Error>> + Send + '_;

  fn list_assertions(
    &self,
    subject_type: SubjectType,
    subject_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Assertion>, Self::Error>> + Send + '_;
}
