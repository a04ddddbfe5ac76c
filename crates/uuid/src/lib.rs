//! Resource identifiers and sharded-path utilities.
//!
//! Every diversity record and every customer is addressed by a UUID. Callers supply these
//! identifiers in URL paths and JSON bodies using the standard hyphenated form
//! (`550e8400-e29b-41d4-a716-446655440000`), so that is the form accepted on input and
//! produced on output.
//!
//! This crate provides:
//! - A wrapper type ([`ResourceId`]) that guarantees a well-formed UUID once constructed.
//! - Shared sharding logic to derive on-disk record locations from an identifier.
//!
//! ## Accepted input
//! - Hyphenated, lowercase or uppercase hex (`550E8400-E29B-...` is normalised to lowercase)
//! - Surrounding whitespace is rejected, as are braces, URNs and the simple 32-char form
//!
//! ## Sharded directory layout
//! For an identifier `u` with simple (hyphen-free) form `s`, records are stored under:
//! `parent_dir/<s[0..2]>/<s[2..4]>/<s>/`
//!
//! Example:
//! `diversity_data/diversity/55/0e/550e8400e29b41d4a716446655440000/`
//!
//! This scheme prevents very large fan-out in a single directory.

mod service;

// Re-export public types
pub use service::{ResourceId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
