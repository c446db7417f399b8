//! Sources (citations) and the digitised documents attached to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A citation or provenance origin. Fact tables reference sources with
/// `ON DELETE SET NULL`, so removing a source never removes a fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
  pub source_id:   Uuid,
  pub title:       String,
  pub author:      Option<String>,
  /// e.g. `"census"`, `"bill_of_sale"`, `"oral_history"`.
  pub source_type: Option<String>,
  /// Archive or institution holding the original.
  pub repository:  Option<String>,
  pub citation:    Option<String>,
  pub rights:      Option<String>,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSource {
  pub title:       String,
  pub author:      Option<String>,
  pub source_type: Option<String>,
  pub repository:  Option<String>,
  pub citation:    Option<String>,
  pub rights:      Option<String>,
}

impl NewSource {
  pub fn titled(title: impl Into<String>) -> Self {
    Self { title: title.into(), ..Default::default() }
  }
}

/// A digitised artifact stored on disk; no binary data lives in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
  pub document_id:       Uuid,
  pub source_id:         Option<Uuid>,
  /// Path relative to the configured upload directory.
  pub storage_path:      String,
  pub thumbnail_path:    Option<String>,
  pub doc_type:          Option<String>,
  pub original_filename: Option<String>,
  pub media_type:        Option<String>,
  pub size_bytes:        Option<i64>,
  /// SHA-256 hex digest of the stored bytes.
  pub content_hash:      Option<String>,
  pub created_at:        DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewDocument {
  pub source_id:         Option<Uuid>,
  pub storage_path:      String,
  pub thumbnail_path:    Option<String>,
  pub doc_type:          Option<String>,
  pub original_filename: Option<String>,
  pub media_type:        Option<String>,
  pub size_bytes:        Option<i64>,
  pub content_hash:      Option<String>,
}
