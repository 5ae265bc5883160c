//! Email address type.
//!
//! Used by the administrator profile and the public contact form. The
//! backend does its own verification; this only rejects input that cannot
//! possibly be delivered.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input is empty or only whitespace.
    #[error("email cannot be empty")]
    Empty,
    /// The input is longer than RFC 5321 allows.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input does not have exactly one @ separating two non-empty parts.
    #[error("email must look like name@domain")]
    Malformed,
    /// The domain has no dot (e.g. `user@localhost`).
    #[error("email domain must contain a dot")]
    BareDomain,
    /// The input contains whitespace.
    #[error("email cannot contain spaces")]
    Whitespace,
}

/// An email address, trimmed and with its domain lowercased.
///
/// ```
/// use bookshelf_core::Email;
///
/// let email = Email::parse("  Admin@Bookshelf.DZ ").unwrap();
/// assert_eq!(email.as_str(), "Admin@bookshelf.dz");
///
/// assert!(Email::parse("").is_err());
/// assert!(Email::parse("admin").is_err());
/// assert!(Email::parse("admin@localhost").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from user input.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first rule the input breaks.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(EmailError::Empty);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        let (local, domain) = trimmed.split_once('@').ok_or(EmailError::Malformed)?;
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(EmailError::Malformed);
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(EmailError::BareDomain);
        }

        Ok(Self(format!("{local}@{}", domain.to_ascii_lowercase())))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the domain part of the email (after the @).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Email::parse("admin@bookshelf.dz").is_ok());
        assert!(Email::parse("first.last+orders@mail.example.com").is_ok());
    }

    #[test]
    fn test_parse_rejections() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
        assert_eq!(Email::parse("admin"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("@bookshelf.dz"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("admin@"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("a@b@c.dz"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("admin@localhost"), Err(EmailError::BareDomain));
        assert_eq!(Email::parse("ad min@bookshelf.dz"), Err(EmailError::Whitespace));
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@bookshelf.dz", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }

    #[test]
    fn test_domain_is_lowercased() {
        let email = Email::parse("Reader@Example.COM").unwrap();
        assert_eq!(email.as_str(), "Reader@example.com");
        assert_eq!(email.domain(), "example.com");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Email = serde_json::from_str("\"admin@bookshelf.dz\"").unwrap();
        assert_eq!(ok.to_string(), "admin@bookshelf.dz");
        assert!(serde_json::from_str::<Email>("\"not-an-email\"").is_err());
    }
}
