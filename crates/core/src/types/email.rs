//! Email address type.
//!
//! Accounts are keyed by email. The stored address keeps the user's casing;
//! identity is the normalized form ([`normalize_email`]), and registration
//! and login are limited to an allow-list of domains
//! ([`Email::has_domain_in`]).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a string is not an [`Email`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    #[error("email must contain exactly one @ symbol")]
    MultipleAtSymbols,
    #[error("email needs a name before the @")]
    EmptyLocalPart,
    #[error("email needs a domain after the @")]
    EmptyDomain,
}

/// Identity key for an email: trimmed and lower-cased.
///
/// Works on raw input, so it never fails.
#[must_use]
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A storefront account email.
///
/// ```
/// use scooter_shop_core::Email;
///
/// let email = Email::parse("Jo@Gmail.com").unwrap();
/// assert!(email.matches("  jo@gmail.COM "));
/// assert!(email.has_domain_in(&["duocuc.cl", "gmail.com"]));
/// assert!(Email::parse("jo@").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse `s` as given; callers trim first if they want to.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] unless `s` is `local@domain` with exactly
    /// one `@` and both sides non-empty.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        let (local, domain) = s.split_once('@').ok_or(EmailError::MissingAtSymbol)?;
        match (local.is_empty(), domain.is_empty(), domain.contains('@')) {
            (_, _, true) => Err(EmailError::MultipleAtSymbols),
            (true, _, _) => Err(EmailError::EmptyLocalPart),
            (_, true, _) => Err(EmailError::EmptyDomain),
            _ => Ok(Self(s.to_owned())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything after the `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }

    #[must_use]
    pub fn normalized(&self) -> String {
        normalize_email(&self.0)
    }

    /// Whether `raw` names the same account.
    #[must_use]
    pub fn matches(&self, raw: &str) -> bool {
        self.normalized() == normalize_email(raw)
    }

    /// Whether the domain is exactly one of `domains`, ignoring ASCII case.
    /// Subdomains and lookalikes do not count.
    #[must_use]
    pub fn has_domain_in<S: AsRef<str>>(&self, domains: &[S]) -> bool {
        let domain = self.domain().trim();
        domains
            .iter()
            .any(|allowed| allowed.as_ref().trim().eq_ignore_ascii_case(domain))
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
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
    fn test_parse_rules() {
        for ok in ["user@gmail.com", "nombre.apellido@duocuc.cl", "a+b@duoc.cl"] {
            assert!(Email::parse(ok).is_ok(), "{ok}");
        }
        let cases = [
            ("", EmailError::Empty),
            ("jo.gmail.com", EmailError::MissingAtSymbol),
            ("jo@evil.com@gmail.com", EmailError::MultipleAtSymbols),
            ("@gmail.com", EmailError::EmptyLocalPart),
            ("jo@", EmailError::EmptyDomain),
        ];
        for (input, err) in cases {
            assert_eq!(Email::parse(input), Err(err), "{input}");
        }
    }

    #[test]
    fn test_matches_ignores_case_and_whitespace() {
        let email = Email::parse("Admin@DuocUC.cl").unwrap();
        assert!(email.matches("  ADMIN@duocuc.CL\t"));
        assert!(!email.matches("admin@duoc.cl"));
        assert_eq!(email.normalized(), "admin@duocuc.cl");
        assert_eq!(email.to_string(), "Admin@DuocUC.cl");
    }

    #[test]
    fn test_has_domain_in_is_exact() {
        let allowed = ["duocuc.cl", "duoc.cl", "gmail.com"];
        assert!(Email::parse("jo@Gmail.com").unwrap().has_domain_in(&allowed));
        assert!(Email::parse("jo@duoc.cl").unwrap().has_domain_in(&allowed));
        for other in ["jo@notgmail.com", "jo@mail.gmail.com", "jo@duoc.cl.evil.com"] {
            assert!(!Email::parse(other).unwrap().has_domain_in(&allowed), "{other}");
        }
    }

    #[test]
    fn test_serde_is_transparent() {
        let email: Email = serde_json::from_str("\"jo@gmail.com\"").unwrap();
        assert_eq!(email.as_str(), "jo@gmail.com");
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"jo@gmail.com\"");
    }
}
