//! Places and their historical names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A geographic or administrative entity, modern or historical.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
  pub place_id:   Uuid,
  /// Canonical name.
  pub name:       String,
  /// e.g. `"parish"`, `"plantation"`, `"county"`.
  pub place_type: Option<String>,
  pub latitude:   Option<f64>,
  pub longitude:  Option<f64>,
  pub start_year: Option<i32>,
  pub end_year:   Option<i32>,
  /// Optional boundary as a GeoJSON geometry.
  pub shape:      Option<serde_json::Value>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPlace {
  pub name:       String,
  pub place_type: Option<String>,
  pub latitude:   Option<f64>,
  pub longitude:  Option<f64>,
  pub start_year: Option<i32>,
  pub end_year:   Option<i32>,
  pub shape:      Option<serde_json::Value>,
}

impl NewPlace {
  pub fn named(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Default::default() }
  }
}

/// A historical or alternate name for a place. Deleted with its place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceAlias {
  pub alias_id:   Uuid,
  pub place_id:   Uuid,
  pub name:       String,
  pub language:   Option<String>,
  pub start_year: Option<i32>,
  pub end_year:   Option<i32>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPlaceAlias {
  pub place_id:   Uuid,
  pub name:       String,
  pub language:   Option<String>,
  pub start_year: Option<i32>,
  pub end_year:   Option<i32>,
}

/// A place together with all of its aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceView {
  #[serde(flatten)]
  pub place:   Place,
  pub aliases: Vec<PlaceAlias>,
}
