//! JSON REST API for Roots.
//!
//! Exposes an axum [`Router`] backed by any
//! [`roots_core::store::GenealogyStore`]. Authentication, TLS and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", roots_api::api_router(store.clone(), uploads))
//! ```

pub mod assertions;
pub mod documents;
pub mod error;
pub mod extract;
pub mod persons;
pub mod places;
pub mod search;
pub mod sources;
pub mod vocabulary;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use roots_core::store::GenealogyStore;

pub use error::ApiError;

// ─── State ───────────────────────────────────────────────────────────────────

/// Where uploaded document bytes live, and how large they may be.
#[derive(Debug, Clone)]
pub struct UploadConfig {
  pub dir:       PathBuf,
  pub max_bytes: usize,
}

/// Shared state threaded through every API handler.
pub struct ApiState<S> {
  pub store:   Arc<S>,
  pub uploads: Arc<UploadConfig>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), uploads: Arc::clone(&self.uploads) }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, uploads: UploadConfig) -> Router<()>
where
  S: GenealogyStore + 'static,
{
  let upload_limit = DefaultBodyLimit::max(uploads.max_bytes);
  let state = ApiState { store, uploads: Arc::new(uploads) };

  Router::new()
    // Search
    .route("/search", get(search::handler::<S>))
    // Persons
    .route("/persons", post(persons::create::<S>))
    .route(
      "/persons/{id}",
      get(persons::get_one::<S>).delete(persons::delete_one::<S>),
    )
    .route("/persons/{id}/names", post(persons::add_name::<S>))
    .route("/persons/{id}/events", post(persons::add_event::<S>))
    .route(
      "/persons/{id}/genetic-profiles",
      post(persons::add_genetic_profile::<S>),
    )
    .route("/relationships", post(persons::add_relationship::<S>))
    // Places
    .route("/places", get(places::list::<S>).post(places::create::<S>))
    .route(
      "/places/{id}",
      get(places::get_one::<S>).delete(places::delete_one::<S>),
    )
    .route("/places/{id}/aliases", post(places::add_alias::<S>))
    // Sources & documents
    .route("/sources", get(sources::list::<S>).post(sources::create::<S>))
    .route(
      "/sources/{id}",
      get(sources::get_one::<S>).delete(sources::delete_one::<S>),
    )
    .route(
      "/documents",
      get(documents::list::<S>).post(documents::create::<S>),
    )
    .route(
      "/documents/upload",
      post(documents::upload::<S>).layer(upload_limit),
    )
    .route("/documents/{id}", get(documents::get_one::<S>))
    .route("/documents/{id}/content", get(documents::content::<S>))
    // Assertions & vocabulary
    .route(
      "/assertions",
      get(assertions::list::<S>).post(assertions::create::<S>),
    )
    .route(
      "/vocabulary",
      get(vocabulary::list::<S>).post(vocabulary::create::<S>),
    )
    .with_state(state)
}
