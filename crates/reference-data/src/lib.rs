//! Reference data for diversity records.
//!
//! This crate defines the closed code sets used by the classification fields of a
//! diversity record:
//! - learning difficulty or disability declaration
//! - primary/secondary learning difficulty or disability (one shared code set)
//! - ethnicity
//!
//! Each set is a plain Rust enum implementing [`ReferenceCode`], which ties every variant
//! to its numeric code and display text. Records carry codes as [`Coded`] values so that
//! an undeclared number survives deserialisation and can be reported by validation.

pub mod coded;
pub mod ethnicity;
pub mod lldd;

pub use coded::Coded;
pub use ethnicity::Ethnicity;
pub use lldd::{LearningDifficultyOrDisability, LearningDifficultyOrDisabilityDeclaration};

/// A closed set of coded reference values.
pub trait ReferenceCode: Copy + Eq + Sized + 'static {
    /// Every declared variant, in code order.
    const ALL: &'static [Self];

    /// Short name of the code set, used in messages.
    const SET_NAME: &'static str;

    /// Numeric code of this variant as stored and exchanged.
    fn code(self) -> i64;

    /// Human-readable description of this variant.
    fn description(self) -> &'static str;

    /// Looks up the variant declared for `code`.
    fn from_code(code: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.code() == code)
    }
}
