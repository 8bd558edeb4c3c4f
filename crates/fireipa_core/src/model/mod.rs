//! Document data model and schema declarations.
//!
//! # Responsibility
//! - Define the value shapes stored in document fields.
//! - Define schemas that name the expected type of each field.
//!
//! # Invariants
//! - Type tags resolve to a fixed runtime kind; unknown tags never match.

pub mod schema;
pub mod value;
