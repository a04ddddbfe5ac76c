/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input text was longer than the type allows
    #[error("Text cannot be longer than {max} characters, got {actual}")]
    TooLong {
        /// Maximum number of characters allowed
        max: usize,
        /// Number of characters supplied
        actual: usize,
    },
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err(TextError::Empty)` if the input is empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Identifier of the channel (touchpoint) acting on a record.
///
/// Touchpoint identifiers are stamped onto records as `LastModifiedBy`, which is limited
/// to [`TouchpointId::MAX_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TouchpointId(NonEmptyText);

impl TouchpointId {
    /// Maximum length of a touchpoint identifier.
    pub const MAX_LEN: usize = 10;

    /// Creates a touchpoint identifier from caller-supplied text.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] for blank input and [`TextError::TooLong`] when the
    /// trimmed input exceeds [`TouchpointId::MAX_LEN`] characters.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let text = NonEmptyText::new(input)?;
        let actual = text.as_str().chars().count();
        if actual > Self::MAX_LEN {
            return Err(TextError::TooLong {
                max: Self::MAX_LEN,
                actual,
            });
        }
        Ok(Self(text))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for TouchpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TouchpointId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  hello ").unwrap();
        assert_eq!(text.as_str(), "hello");
    }

    #[test]
    fn non_empty_text_rejects_blank() {
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
    }

    #[test]
    fn non_empty_text_deserialize_rejects_blank() {
        let result: Result<NonEmptyText, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }

    #[test]
    fn touchpoint_accepts_ten_characters() {
        let id = TouchpointId::new("0000000001").unwrap();
        assert_eq!(id.as_str(), "0000000001");
    }

    #[test]
    fn touchpoint_rejects_eleven_characters() {
        let err = TouchpointId::new("00000000011").unwrap_err();
        assert_eq!(err, TextError::TooLong { max: 10, actual: 11 });
    }

    #[test]
    fn touchpoint_rejects_blank() {
        assert_eq!(TouchpointId::new(""), Err(TextError::Empty));
    }
}
