//! Handlers for `/places` endpoints.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use roots_core::{
  place::{NewPlace, NewPlaceAlias, Place, PlaceView},
  store::GenealogyStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  extract::{ApiJson, ApiPath},
};

/// `GET /places`
pub async fn list<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Place>>, ApiError> {
  let places = state.store.list_places().await.map_err(ApiError::store)?;
  Ok(Json(places))
}

/// `POST /places`
pub async fn create<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiJson(body): ApiJson<NewPlace>,
) -> Result<impl IntoResponse, ApiError> {
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("place name must not be empty".into()));
  }
  let place = state.store.add_place(body).await.map_err(ApiError::store)?;
  tracing::info!(place_id = %place.place_id, "place created");
  Ok((StatusCode::CREATED, Json(place)))
}

/// `GET /places/:id`
pub async fn get_one<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<PlaceView>, ApiError> {
  let view = state
    .store
    .get_place(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("place {id} not found")))?;
  Ok(Json(view))
}

/// `DELETE /places/:id`. Aliases go with it.
pub async fn delete_one<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
  if !state.store.delete_place(id).await.map_err(ApiError::store)? {
    return Err(ApiError::NotFound(format!("place {id} not found")));
  }
  tracing::info!(place_id = %id, "place deleted");
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct AliasBody {
  pub name:       String,
  pub language:   Option<String>,
  pub start_year: Option<i32>,
  pub end_year:   Option<i32>,
}

/// `POST /places/:id/aliases`
pub async fn add_alias<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiPath(place_id): ApiPath<Uuid>,
  ApiJson(body): ApiJson<AliasBody>,
) -> Result<impl IntoResponse, ApiError> {
  let alias = state
    .store
    .add_place_alias(NewPlaceAlias {
      place_id,
      name: body.name,
      language: body.language,
      start_year: body.start_year,
      end_year: body.end_year,
    })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(alias)))
}
