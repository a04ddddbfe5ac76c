//! Raw coded values tied to a reference set.

use crate::ReferenceCode;
use std::fmt;
use std::marker::PhantomData;

/// A numeric code that is meant to belong to the reference set `T`.
///
/// The code is kept as received, so a value outside `T` can be represented and rejected
/// later by validation instead of failing deserialisation. Serialises as a bare integer.
pub struct Coded<T> {
    code: i64,
    _set: PhantomData<T>,
}

impl<T: ReferenceCode> Coded<T> {
    /// Wraps a raw code without checking membership.
    pub fn from_raw(code: i64) -> Self {
        Self {
            code,
            _set: PhantomData,
        }
    }

    /// The raw numeric code.
    pub fn code(&self) -> i64 {
        self.code
    }

    /// The declared variant for this code, if any.
    pub fn value(&self) -> Option<T> {
        T::from_code(self.code)
    }

    /// True when the code belongs to `T`.
    pub fn is_declared(&self) -> bool {
        self.value().is_some()
    }

    /// True when the code is exactly `variant`.
    pub fn is(&self, variant: T) -> bool {
        self.code == variant.code()
    }
}

impl<T: ReferenceCode> From<T> for Coded<T> {
    fn from(value: T) -> Self {
        Self::from_raw(value.code())
    }
}

// Manual impls: derives would add bounds on `T` that the marker does not need.

impl<T> Clone for Coded<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Coded<T> {}

impl<T> PartialEq for Coded<T> {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl<T> Eq for Coded<T> {}

impl<T: ReferenceCode> PartialEq<T> for Coded<T> {
    fn eq(&self, other: &T) -> bool {
        self.is(*other)
    }
}

impl<T: ReferenceCode> fmt::Debug for Coded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(v) => write!(f, "{}({}: {})", T::SET_NAME, self.code, v.description()),
            None => write!(f, "{}({}: undeclared)", T::SET_NAME, self.code),
        }
    }
}

impl<T> serde::Serialize for Coded<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.code)
    }
}

impl<'de, T> serde::Deserialize<'de> for Coded<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = i64::deserialize(deserializer)?;
        Ok(Self {
            code,
            _set: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LearningDifficultyOrDisabilityDeclaration as Declaration;

    #[test]
    fn declared_code_resolves() {
        let coded: Coded<Declaration> = Coded::from_raw(9);
        assert_eq!(coded.value(), Some(Declaration::NotProvidedByTheCustomer));
        assert!(coded.is_declared());
        assert!(coded == Declaration::NotProvidedByTheCustomer);
    }

    #[test]
    fn undeclared_code_is_kept() {
        let coded: Coded<Declaration> = serde_json::from_str("100").unwrap();
        assert_eq!(coded.code(), 100);
        assert!(!coded.is_declared());
        assert_eq!(coded.value(), None);
    }

    #[test]
    fn serialises_as_bare_integer() {
        let coded = Coded::from(Declaration::ConsidersSelfAffected);
        assert_eq!(serde_json::to_string(&coded).unwrap(), "1");
    }

    #[test]
    fn rejects_non_integer_json() {
        let result: Result<Coded<Declaration>, _> = serde_json::from_str("\"9\"");
        assert!(result.is_err());
    }
}
