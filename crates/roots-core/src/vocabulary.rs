//! Controlled vocabulary: codes grouped by scheme.
//!
//! Other tables refer to vocabulary codes as plain text (e.g.
//! `person.ethnicity_code`, `event.event_type`); the link is not enforced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyTerm {
  pub term_id:     Uuid,
  /// Grouping of codes, e.g. `"event_type"` or `"ethnicity"`.
  pub scheme:      String,
  /// Unique within `scheme`.
  pub code:        String,
  pub label:       String,
  pub description: Option<String>,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewVocabularyTerm {
  pub scheme:      String,
  pub code:        String,
  pub label:       String,
  pub description: Option<String>,
}
