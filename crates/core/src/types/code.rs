//! Product codes (`PREFIX-NNNN`).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`ProductCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductCodeError {
    /// The prefix is empty or contains something other than ASCII letters.
    #[error("prefix must be 1-{max} ASCII letters")]
    InvalidPrefix {
        /// Maximum prefix length.
        max: usize,
    },
    /// The number does not fit in four digits.
    #[error("number must be at most {max}")]
    NumberOutOfRange {
        /// Largest allowed number.
        max: u16,
    },
    /// The string is not `PREFIX-NNNN`.
    #[error("product code must look like PREFIX-NNNN")]
    Malformed,
}

/// A product code such as `BMS-0042`.
///
/// The prefix is upper-case ASCII letters; the number is always rendered with
/// four digits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProductCode(String);

impl ProductCode {
    /// Maximum prefix length.
    pub const MAX_PREFIX_LENGTH: usize = 8;

    /// Largest number a code can carry.
    pub const MAX_NUMBER: u16 = 9999;

    /// Build a code from a prefix and number. The prefix is upper-cased.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is invalid or the number exceeds
    /// [`ProductCode::MAX_NUMBER`].
    pub fn new(prefix: &str, number: u16) -> Result<Self, ProductCodeError> {
        let prefix = normalize_prefix(prefix)?;
        if number > Self::MAX_NUMBER {
            return Err(ProductCodeError::NumberOutOfRange {
                max: Self::MAX_NUMBER,
            });
        }
        Ok(Self(format!("{prefix}-{number:04}")))
    }

    /// Parse a code in `PREFIX-NNNN` form.
    ///
    /// # Errors
    ///
    /// Returns [`ProductCodeError::Malformed`] when the separator or the
    /// four-digit suffix is missing.
    pub fn parse(s: &str) -> Result<Self, ProductCodeError> {
        let (prefix, digits) = s.split_once('-').ok_or(ProductCodeError::Malformed)?;
        if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProductCodeError::Malformed);
        }
        let number = digits.parse::<u16>().map_err(|_| ProductCodeError::Malformed)?;
        Self::new(prefix, number)
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The letter prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.0.split('-').next().unwrap_or("")
    }
}

/// Upper-case and validate a prefix.
///
/// # Errors
///
/// Returns [`ProductCodeError::InvalidPrefix`] if the prefix is empty, too
/// long, or not ASCII letters.
pub fn normalize_prefix(prefix: &str) -> Result<String, ProductCodeError> {
    let prefix = prefix.trim();
    if prefix.is_empty()
        || prefix.len() > ProductCode::MAX_PREFIX_LENGTH
        || !prefix.bytes().all(|b| b.is_ascii_alphabetic())
    {
        return Err(ProductCodeError::InvalidPrefix {
            max: ProductCode::MAX_PREFIX_LENGTH,
        });
    }
    Ok(prefix.to_ascii_uppercase())
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ProductCode {
    type Err = ProductCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ProductCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pads_and_uppercases() {
        let code = ProductCode::new("bms", 7).unwrap();
        assert_eq!(code.as_str(), "BMS-0007");
        assert_eq!(code.prefix(), "BMS");
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(matches!(
            ProductCode::new("", 1),
            Err(ProductCodeError::InvalidPrefix { .. })
        ));
        assert!(matches!(
            ProductCode::new("B1", 1),
            Err(ProductCodeError::InvalidPrefix { .. })
        ));
        assert!(matches!(
            ProductCode::new("BMS", 10_000),
            Err(ProductCodeError::NumberOutOfRange { .. })
        ));
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            ProductCode::parse("ACC-0420").unwrap(),
            ProductCode::new("ACC", 420).unwrap()
        );
        assert_eq!(ProductCode::parse("ACC0420"), Err(ProductCodeError::Malformed));
        assert_eq!(ProductCode::parse("ACC-42"), Err(ProductCodeError::Malformed));
        assert_eq!(ProductCode::parse("ACC-04x0"), Err(ProductCodeError::Malformed));
    }
}
