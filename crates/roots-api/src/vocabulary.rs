//! Handlers for `/vocabulary`: controlled codes grouped by scheme.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use roots_core::{
  store::GenealogyStore,
  vocabulary::{NewVocabularyTerm, VocabularyTerm},
};
use serde::Deserialize;

use crate::{
  ApiState,
  error::ApiError,
  extract::{ApiJson, ApiQuery},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub scheme: Option<String>,
}

/// `GET /vocabulary[?scheme=<scheme>]`
pub async fn list<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<VocabularyTerm>>, ApiError> {
  let terms = state
    .store
    .list_terms(params.scheme)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(terms))
}

/// `POST /vocabulary`
pub async fn create<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiJson(body): ApiJson<NewVocabularyTerm>,
) -> Result<impl IntoResponse, ApiError> {
  let term = state.store.add_term(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(term)))
}
