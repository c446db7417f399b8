//! Handlers for `/assertions`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/assertions?subject_type=..&subject_id=..` | Both params required |
//! | `POST` | `/assertions` | 404 if the subject does not exist |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use roots_core::{
  assertion::{Assertion, NewAssertion, SubjectType},
  store::GenealogyStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  extract::{ApiJson, ApiQuery},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub subject_type: SubjectType,
  pub subject_id:   Uuid,
}

/// `GET /assertions?subject_type=<type>&subject_id=<uuid>`
pub async fn list<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<Assertion>>, ApiError> {
  let assertions = state
    .store
    .list_assertions(params.subject_type, params.subject_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(assertions))
}

/// `POST /assertions`
pub async fn create<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiJson(body): ApiJson<NewAssertion>,
) -> Result<impl IntoResponse, ApiError> {
  if body.predicate.trim().is_empty() {
    return Err(ApiError::BadRequest("predicate must not be empty".into()));
  }
  let assertion = state
    .store
    .add_assertion(body)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(
    assertion_id = %assertion.assertion_id,
    subject_type = %assertion.subject_type,
    subject_id = %assertion.subject_id,
    "assertion recorded"
  );
  Ok((StatusCode::CREATED, Json(assertion)))
}
