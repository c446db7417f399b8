//! Handlers for `/sources` endpoints.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use roots_core::{
  source::{NewSource, Source},
  store::GenealogyStore,
};
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  extract::{ApiJson, ApiPath},
};

/// `GET /sources`
pub async fn list<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Source>>, ApiError> {
  let sources = state.store.list_sources().await.map_err(ApiError::store)?;
  Ok(Json(sources))
}

/// `POST /sources`
pub async fn create<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiJson(body): ApiJson<NewSource>,
) -> Result<impl IntoResponse, ApiError> {
  if body.title.trim().is_empty() {
    return Err(ApiError::BadRequest("source title must not be empty".into()));
  }
  let source = state.store.add_source(body).await.map_err(ApiError::store)?;
  tracing::info!(source_id = %source.source_id, "source created");
  Ok((StatusCode::CREATED, Json(source)))
}

/// `GET /sources/:id`
pub async fn get_one<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Source>, ApiError> {
  let source = state
    .store
    .get_source(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("source {id} not found")))?;
  Ok(Json(source))
}

/// `DELETE /sources/:id`
///
/// Rows citing the source keep existing with their citation cleared.
pub async fn delete_one<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
  if !state.store.delete_source(id).await.map_err(ApiError::store)? {
    return Err(ApiError::NotFound(format!("source {id} not found")));
  }
  tracing::info!(source_id = %id, "source deleted");
  Ok(StatusCode::NO_CONTENT)
}
