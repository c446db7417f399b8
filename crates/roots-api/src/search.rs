//! Handler for `GET /search`.
//!
//! `q` is matched against canonical names and every recorded alternate name.

use axum::{Json, extract::State};
use roots_core::{
  person::Person,
  store::{GenealogyStore, PersonQuery},
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError, extract::ApiQuery};

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Free-text name filter.
  pub q:               Option<String>,
  pub birth_year_from: Option<i32>,
  pub birth_year_to:   Option<i32>,
  pub limit:           Option<usize>,
  pub offset:          Option<usize>,
}

/// `GET /search[?q=...][&birth_year_from=...][&birth_year_to=...][&limit=...][&offset=...]`
pub async fn handler<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Vec<Person>>, ApiError> {
  let query = PersonQuery {
    text:            params.q.filter(|q| !q.trim().is_empty()),
    birth_year_from: params.birth_year_from,
    birth_year_to:   params.birth_year_to,
    limit:           params.limit,
    offset:          params.offset,
  };

  let persons = state.store.search(&query).await.map_err(ApiError::store)?;
  Ok(Json(persons))
}
