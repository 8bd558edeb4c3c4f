//! Typed document accessors.
//!
//! # Responsibility
//! - Bind a collection handle to a schema and expose CRUD operations.
//! - Keep store client details behind the `store` contracts.
//!
//! # Invariants
//! - Write paths validate before calling the store.
//! - Operations return `RepoError` values; they never panic on store failure.

pub mod document_model;
pub mod hooks;
