//! Pure domain logic for the marketplace: the task taxonomy, query
//! parsing/clamping, pagination arithmetic, slug generation, privacy
//! filtering, and payload validation.
//!
//! This crate has no internal dependencies and no I/O so it can be used by
//! the repository layer, the API layer, and any future CLI tooling.

pub mod categories;
pub mod error;
pub mod pagination;
pub mod privacy;
pub mod query;
pub mod search;
pub mod slug;
pub mod task;
pub mod types;
pub mod validation;
