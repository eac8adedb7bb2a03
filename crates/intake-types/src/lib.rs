//! # Intake Types
//!
//! Small value types and wire-format names shared by the form engine and the
//! submission relay.
//!
//! The relay never depends on the typed form model: it only needs to know where the
//! service user's first name lives in the payload. Those key names live here so both
//! sides agree on the wire shape.

/// JSON key of the service-user group in a submission payload.
pub const SERVICE_USER_DETAILS_KEY: &str = "serviceUserDetails";

/// JSON key of a first name inside a person group.
pub const FIRST_NAME_KEY: &str = "firstName";

/// Errors that can occur when creating validated text types.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// Form fields count as filled only when they contain at least one non-whitespace
/// character, so this wrapper trims its input during construction and rejects what is
/// left if it is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns true if `input` would be accepted by [`NonEmptyText::new`].
    pub fn is_filled(input: &str) -> bool {
        !input.trim().is_empty()
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
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

impl std::str::FromStr for NonEmptyText {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let text = NonEmptyText::new("  Jane ").expect("non-empty");
        assert_eq!(text.as_str(), "Jane");
        assert_eq!(text.to_string(), "Jane");
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(" \t\n"), Err(TextError::Empty));
        assert!(!NonEmptyText::is_filled("   "));
        assert!(NonEmptyText::is_filled(" x "));
    }

    #[test]
    fn deserialisation_enforces_non_empty() {
        let ok: NonEmptyText = serde_json::from_str("\" Jane \"").expect("valid");
        assert_eq!(ok.into_inner(), "Jane");

        let err = serde_json::from_str::<NonEmptyText>("\"  \"").expect_err("blank rejected");
        assert!(err.to_string().contains("Text cannot be empty"));
    }
}
