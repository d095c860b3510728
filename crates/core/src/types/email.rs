//! Account email addresses.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a string was refused as an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email cannot contain whitespace")]
    ContainsWhitespace,
    /// Not of the form `local@domain` with both sides non-empty.
    #[error("email must look like name@domain")]
    Malformed,
}

/// An email address as typed into a login or registration form.
///
/// Accounts are matched on the exact address, so parsing trims the
/// surrounding whitespace and checks the shape without changing case.
///
/// ```
/// use shoop_core::Email;
///
/// assert_eq!(Email::parse(" admin@occ.io.vn ").unwrap().as_str(), "admin@occ.io.vn");
/// assert!(Email::parse("admin@").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// RFC 5321 limit.
    pub const MAX_LENGTH: usize = 254;

    /// Parse a trimmed address.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] for empty, overlong or whitespace-containing
    /// input, and for anything without text on both sides of a single `@`.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::ContainsWhitespace);
        }

        match s.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(s.to_owned()))
            }
            _ => Err(EmailError::Malformed),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
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

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_form_input() {
        assert_eq!(
            Email::parse("  khach@occ.io.vn\n").unwrap().as_str(),
            "khach@occ.io.vn"
        );
        assert!(Email::parse("user+tag@example.co.uk").is_ok());
        // Case is kept; lookups are exact.
        assert_eq!(Email::parse("Admin@OCC.io.vn").unwrap().as_str(), "Admin@OCC.io.vn");
    }

    #[test]
    fn test_rejections() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
        assert_eq!(Email::parse("kh ach@occ.io.vn"), Err(EmailError::ContainsWhitespace));
        assert_eq!(Email::parse("no-at-symbol"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("@occ.io.vn"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("khach@"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("a@b@c"), Err(EmailError::Malformed));

        let long = format!("{}@occ.io.vn", "a".repeat(250));
        assert!(matches!(Email::parse(&long), Err(EmailError::TooLong { .. })));
    }

    #[test]
    fn test_serializes_as_string() {
        let email = Email::parse("admin@occ.io.vn").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"admin@occ.io.vn\"");
        assert_eq!(email.to_string(), "admin@occ.io.vn");
    }
}
