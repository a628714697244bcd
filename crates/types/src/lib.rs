//! Validated text primitives shared across MedLink crates.

/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The trimmed input exceeded the allowed number of characters
    #[error("Text can have at most {max} characters")]
    TooLong { max: usize },
    /// The input is not a syntactically valid email address
    #[error("Email address is not valid")]
    InvalidEmail,
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Creates a new `NonEmptyText` that is also bounded in length.
    ///
    /// Length is counted in characters after trimming.
    pub fn bounded(input: impl AsRef<str>, max: usize) -> Result<Self, TextError> {
        let text = Self::new(input)?;
        if text.0.chars().count() > max {
            return Err(TextError::TooLong { max });
        }
        Ok(text)
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

/// A syntactically valid email address.
///
/// Parsing trims surrounding whitespace and checks the general `local@domain` shape:
/// a dot-atom local part and a domain made of hostname labels. Equality is exact,
/// so `A@x.org` and `a@x.org` are different addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    const LOCAL_SPECIALS: &'static [u8] = b"!#$%&'*+/=?^_`{|}~.-";

    /// Parses an email address.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` for blank input and `TextError::InvalidEmail`
    /// when the address does not have a valid shape.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }

        let (local, domain) = trimmed.split_once('@').ok_or(TextError::InvalidEmail)?;
        if domain.contains('@') || !Self::valid_local(local) || !Self::valid_domain(domain) {
            return Err(TextError::InvalidEmail);
        }

        Ok(Self(trimmed.to_owned()))
    }

    fn valid_local(local: &str) -> bool {
        if local.is_empty() || local.starts_with('.') || local.ends_with('.') {
            return false;
        }
        if local.contains("..") {
            return false;
        }
        local
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || Self::LOCAL_SPECIALS.contains(&b))
    }

    fn valid_domain(domain: &str) -> bool {
        if domain.is_empty() {
            return false;
        }
        domain.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for EmailAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for EmailAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EmailAddress::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Ana Souza ").unwrap();
        assert_eq!(text.as_str(), "Ana Souza");
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        assert_eq!(NonEmptyText::new(" \t\n"), Err(TextError::Empty));
    }

    #[test]
    fn bounded_counts_characters_not_bytes() {
        let name = "é".repeat(100);
        assert!(NonEmptyText::bounded(&name, 100).is_ok());

        let too_long = "é".repeat(101);
        assert_eq!(
            NonEmptyText::bounded(&too_long, 100),
            Err(TextError::TooLong { max: 100 })
        );
    }

    #[test]
    fn email_accepts_common_addresses() {
        for input in [
            "john.doe@example.com",
            "a+tag@sub.example.org",
            "user@localhost",
            "o'brien@clinic-1.ie",
        ] {
            assert!(EmailAddress::parse(input).is_ok(), "{input} should parse");
        }
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        for input in [
            "plainaddress",
            "@example.com",
            "user@",
            "user@@example.com",
            "a@b@c.com",
            ".user@example.com",
            "user.@example.com",
            "us..er@example.com",
            "user@-example.com",
            "user@example..com",
            "us er@example.com",
        ] {
            assert_eq!(
                EmailAddress::parse(input),
                Err(TextError::InvalidEmail),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn email_blank_is_empty_error() {
        assert_eq!(EmailAddress::parse("   "), Err(TextError::Empty));
    }

    #[test]
    fn email_deserialize_validates() {
        let ok: EmailAddress = serde_json::from_str("\" a@b.com \"").unwrap();
        assert_eq!(ok.as_str(), "a@b.com");

        let err = serde_json::from_str::<EmailAddress>("\"nope\"");
        assert!(err.is_err());
    }
}
