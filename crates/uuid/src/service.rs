//! Internal implementation of resource identifiers.

use crate::{UuidError, UuidResult};
use std::path::{Path, PathBuf};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Length of the hyphenated UUID form (`8-4-4-4-12`).
const HYPHENATED_LEN: usize = 36;

/// Identifier of a customer or diversity record.
///
/// Once constructed, the contained UUID is known to be well formed. Use this wrapper
/// whenever you are:
/// - Accepting an identifier from *outside* the core (URL path, request body, CLI input), or
/// - Deriving a sharded storage path for a record.
/// - Allocating an identifier for a newly created record.
///
/// # Construction
/// - [`ResourceId::new`] generates a fresh random (v4) identifier.
/// - [`ResourceId::parse`] validates an externally supplied identifier.
///
/// # Display format
/// Always the lowercase hyphenated form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ResourceId(Uuid);

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceId {
    /// Generates a new random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier in hyphenated form.
    ///
    /// # Arguments
    ///
    /// * `input` - Identifier string, e.g. `550e8400-e29b-41d4-a716-446655440000`.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not a hyphenated UUID.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_hyphenated(input) {
            return Err(UuidError::InvalidInput(format!(
                "identifier must be a hyphenated UUID, got: '{input}'"
            )));
        }

        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(format!("invalid identifier '{input}': {e}")))
    }

    /// Returns the inner `uuid::Uuid`.
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true if `input` has the `8-4-4-4-12` hyphenated hex layout.
    ///
    /// Purely syntactic; case is not checked.
    pub fn is_hyphenated(input: &str) -> bool {
        input.len() == HYPHENATED_LEN
            && input.bytes().enumerate().all(|(i, b)| match i {
                8 | 13 | 18 | 23 => b == b'-',
                _ => b.is_ascii_hexdigit(),
            })
    }

    /// Returns `parent_dir/<s1>/<s2>/<simple>/` where `s1`/`s2` are derived from this identifier.
    ///
    /// - `s1` is the first two hex characters
    /// - `s2` is the next two hex characters
    /// - The full hyphen-free identifier forms the leaf directory
    pub fn sharded_dir(&self, parent_dir: &Path) -> PathBuf {
        let simple = self.0.simple().to_string();
        let s1 = &simple[0..2];
        let s2 = &simple[2..4];
        parent_dir.join(s1).join(s2).join(&simple)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ResourceId {
    type Err = UuidError;

    /// Equivalent to [`ResourceId::parse`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceId::parse(s)
    }
}

impl From<Uuid> for ResourceId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}
