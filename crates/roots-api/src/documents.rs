//! Handlers for `/documents` endpoints, including file upload.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/documents` | Optional `?source_id=<uuid>` |
//! | `POST` | `/documents` | Metadata only; body: [`NewDocument`] |
//! | `POST` | `/documents/upload` | `multipart/form-data`: `file`, `source_id`, `doc_type` |
//! | `GET`  | `/documents/:id` | Metadata |
//! | `GET`  | `/documents/:id/content` | Stored bytes |
//!
//! Uploaded bytes are written to `<upload dir>/<uuid>.<ext>`; the client's
//! filename is kept only as metadata and never touches the filesystem.

use std::path::Path;

use axum::{
  Json,
  extract::{Multipart, State},
  http::{StatusCode, header},
  response::IntoResponse,
};
use bytes::Bytes;
use roots_core::{
  source::{Document, NewDocument},
  store::GenealogyStore,
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  extract::{ApiJson, ApiPath, ApiQuery},
};

const MAX_EXTENSION_LEN: usize = 16;
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

// ─── Metadata ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub source_id: Option<Uuid>,
}

/// `GET /documents[?source_id=<uuid>]`
pub async fn list<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<Document>>, ApiError> {
  let documents = state
    .store
    .list_documents(params.source_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(documents))
}

/// `POST /documents`: register a document without uploading bytes.
pub async fn create<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiJson(body): ApiJson<NewDocument>,
) -> Result<impl IntoResponse, ApiError> {
  if body.storage_path.trim().is_empty() {
    return Err(ApiError::BadRequest("storage_path must not be empty".into()));
  }
  let document = state
    .store
    .add_document(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(document)))
}

/// `GET /documents/:id`
pub async fn get_one<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Document>, ApiError> {
  let document = state
    .store
    .get_document(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("document {id} not found")))?;
  Ok(Json(document))
}

// ─── Upload ──────────────────────────────────────────────────────────────────

struct UploadedFile {
  filename:   Option<String>,
  media_type: Option<String>,
  bytes:      Bytes,
}

/// `POST /documents/upload`
pub async fn upload<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
  let mut file = None;
  let mut source_id = None;
  let mut doc_type = None;

  while let Some(field) = multipart.next_field().await? {
    let name = field.name().map(str::to_owned);
    match name.as_deref() {
      Some("file") => {
        let filename = field.file_name().map(str::to_owned);
        let media_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await?;
        file = Some(UploadedFile { filename, media_type, bytes });
      }
      Some("source_id") => {
        let text = field.text().await?;
        let text = text.trim();
        if !text.is_empty() {
          let id = text.parse::<Uuid>().map_err(|_| {
            ApiError::BadRequest(format!("invalid source_id: {text:?}"))
          })?;
          source_id = Some(id);
        }
      }
      Some("doc_type") => {
        let text = field.text().await?;
        doc_type = Some(text.trim().to_owned()).filter(|t| !t.is_empty());
      }
      _ => {}
    }
  }

  let file =
    file.ok_or_else(|| ApiError::BadRequest("missing `file` field".into()))?;

  let stored_id = Uuid::new_v4();
  let storage_name = match file.filename.as_deref().and_then(sanitized_extension) {
    Some(ext) => format!("{stored_id}.{ext}"),
    None => stored_id.to_string(),
  };
  let content_hash = hex::encode(Sha256::digest(&file.bytes));
  let size_bytes = file.bytes.len();

  tokio::fs::create_dir_all(&state.uploads.dir).await?;
  let target = state.uploads.dir.join(&storage_name);
  tokio::fs::write(&target, &file.bytes).await?;

  let result = state
    .store
    .add_document(NewDocument {
      source_id,
      storage_path: storage_name,
      thumbnail_path: None,
      doc_type,
      original_filename: file.filename,
      media_type: file.media_type,
      size_bytes: Some(size_bytes as i64),
      content_hash: Some(content_hash),
    })
    .await;

  let document = match result {
    Ok(document) => document,
    Err(e) => {
      if let Err(io) = tokio::fs::remove_file(&target).await {
        tracing::warn!(path = %target.display(), error = %io, "failed to remove orphaned upload");
      }
      return Err(ApiError::store(e));
    }
  };

  tracing::info!(
    document_id = %document.document_id,
    storage_path = %document.storage_path,
    size_bytes,
    "document uploaded"
  );
  Ok((StatusCode::CREATED, Json(document)))
}

/// `GET /documents/:id/content`
pub async fn content<S: GenealogyStore>(
  State(state): State<ApiState<S>>,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
  let not_found = || ApiError::NotFound(format!("no stored content for document {id}"));

  let document = state
    .store
    .get_document(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;

  // Only bare file names inside the uploads directory are ever served.
  if !is_bare_file_name(&document.storage_path) {
    return Err(not_found());
  }

  let path = state.uploads.dir.join(&document.storage_path);
  let bytes = match tokio::fs::read(&path).await {
    Ok(bytes) => bytes,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
    Err(e) => return Err(e.into()),
  };

  let media_type = document
    .media_type
    .unwrap_or_else(|| FALLBACK_MEDIA_TYPE.to_owned());
  Ok(([(header::CONTENT_TYPE, media_type)], bytes))
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// The extension of `filename`, reduced to lowercase ASCII alphanumerics.
fn sanitized_extension(filename: &str) -> Option<String> {
  let ext = Path::new(filename).extension()?.to_str()?;
  let clean: String = ext
    .chars()
    .filter(char::is_ascii_alphanumeric)
    .take(MAX_EXTENSION_LEN)
    .collect::<String>()
    .to_ascii_lowercase();
  (!clean.is_empty()).then_some(clean)
}

fn is_bare_file_name(name: &str) -> bool {
  Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name)
    && name != ".."
}
