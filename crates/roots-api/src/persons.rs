//! Handlers for `/persons` and `/relationships`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/persons` | Body: [`NewPerson`] |
//! | `GET`    | `/persons/:id` | Full [`PersonView`], 404 if not found |
//! | `DELETE` | `/persons/:id` | Cascades to names, events, relationships, profiles |
//! | `POST`   | `/persons/:id/names` | Body: [`NameBody`] |
//! | `POST`   | `/persons/:id/events` | Body: [`EventBody`] |
//! | `POST`   | `/persons/:id/genetic-profiles` | Body: [`GeneticProfileBody`] |
//! | `POST`   | `/relationships` | Body: [`NewRelationship`] |

use std::collections::BTreeMap;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use roots_core::{
  person::{
    NameType, NewEvent, NewGeneticProfile, NewPerson, NewPersonName,
    NewRelationship, PersonView,
  },
  provenance::Confidence,
  store::GenealogyStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  extract::{ApiJson, ApiPath},
};

// ─── Person ──────────────────────────────────────────────────────────────────

/// `POST /persons`
pub async fn create<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiJson(body): ApiJson<NewPerson>,
) -> Result<impl IntoResponse, ApiError> {
  let person = state.store.add_person(body).await.map_err(ApiError::store)?;
  tracing::info!(person_id = %person.person_id, "person created");
  Ok((StatusCode::CREATED, Json(person)))
}

/// `GET /persons/:id`
pub async fn get_one<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<PersonView>, ApiError> {
  let view = state
    .store
    .materialize(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(view))
}

/// `DELETE /persons/:id`
pub async fn delete_one<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
  if !state.store.delete_person(id).await.map_err(ApiError::store)? {
    return Err(ApiError::NotFound(format!("person {id} not found")));
  }
  tracing::info!(person_id = %id, "person deleted");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Names ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NameBody {
  pub name_type:  NameType,
  pub given_name: Option<String>,
  pub surname:    Option<String>,
  pub language:   Option<String>,
  pub start_year: Option<i32>,
  pub end_year:   Option<i32>,
  pub confidence: Option<Confidence>,
  pub source_id:  Option<Uuid>,
}

/// `POST /persons/:id/names`
pub async fn add_name<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiPath(person_id): ApiPath<Uuid>,
  ApiJson(body): ApiJson<NameBody>,
) -> Result<impl IntoResponse, ApiError> {
  let name = state
    .store
    .add_name(NewPersonName {
      person_id,
      name_type: body.name_type,
      given_name: body.given_name,
      surname: body.surname,
      language: body.language,
      start_year: body.start_year,
      end_year: body.end_year,
      confidence: body.confidence,
      source_id: body.source_id,
    })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(name)))
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EventBody {
  pub event_type:  String,
  pub place_id:    Option<Uuid>,
  /// Kept verbatim; never parsed into `year`/`month`/`day`.
  pub date_text:   Option<String>,
  pub year:        Option<i32>,
  pub month:       Option<u8>,
  pub day:         Option<u8>,
  pub description: Option<String>,
  pub confidence:  Option<Confidence>,
  pub source_id:   Option<Uuid>,
}

/// `POST /persons/:id/events`
pub async fn add_event<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiPath(person_id): ApiPath<Uuid>,
  ApiJson(body): ApiJson<EventBody>,
) -> Result<impl IntoResponse, ApiError> {
  let event = state
    .store
    .add_event(NewEvent {
      person_id,
      event_type: body.event_type,
      place_id: body.place_id,
      date_text: body.date_text,
      year: body.year,
      month: body.month,
      day: body.day,
      description: body.description,
      confidence: body.confidence,
      source_id: body.source_id,
    })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(event)))
}

// ─── Genetic profiles ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GeneticProfileBody {
  pub profile_type: String,
  pub haplogroup:   Option<String>,
  #[serde(default)]
  pub regions:      BTreeMap<String, f64>,
  pub lab:          Option<String>,
  pub test_date:    Option<NaiveDate>,
  pub source_id:    Option<Uuid>,
}

/// `POST /persons/:id/genetic-profiles`
pub async fn add_genetic_profile<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiPath(person_id): ApiPath<Uuid>,
  ApiJson(body): ApiJson<GeneticProfileBody>,
) -> Result<impl IntoResponse, ApiError> {
  let profile = state
    .store
    .add_genetic_profile(NewGeneticProfile {
      person_id,
      profile_type: body.profile_type,
      haplogroup: body.haplogroup,
      regions: body.regions,
      lab: body.lab,
      test_date: body.test_date,
      source_id: body.source_id,
    })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(profile)))
}

// ─── Relationships ───────────────────────────────────────────────────────────

/// `POST /relationships`
pub async fn add_relationship<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiJson(body): ApiJson<NewRelationship>,
) -> Result<impl IntoResponse, ApiError> {
  let relationship = state
    .store
    .add_relationship(body)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(
    relationship_id = %relationship.relationship_id,
    rel_type = %relationship.rel_type,
    "relationship recorded"
  );
  Ok((StatusCode::CREATED, Json(relationship)))
}
