//! Core types and trait definitions for the Roots genealogical record store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod assertion;
pub mod error;
pub mod person;
pub mod place;
pub mod provenance;
pub mod source;
pub mod store;
pub mod user;
pub mod vocabulary;

pub use error::{Error, FailureKind, Result, StoreFailure};
