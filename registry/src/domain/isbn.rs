//! Book catalogue identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors returned when parsing an [`Isbn`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IsbnValidationError {
    /// Identifier has no characters once separators are removed.
    #[error("isbn must not be empty")]
    Empty,
    /// Identifier contains something other than digits, `X`, hyphens, or
    /// spaces.
    #[error("isbn contains invalid character '{character}'")]
    InvalidCharacter {
        /// First offending character.
        character: char,
    },
    /// Identifier is neither 10 nor 13 characters long.
    #[error("isbn must have 10 or 13 digits, found {length}")]
    InvalidLength {
        /// Number of significant characters found.
        length: usize,
    },
    /// Check digit does not match the payload.
    #[error("isbn check digit does not match for {value}")]
    ChecksumMismatch {
        /// Canonical form that failed verification.
        value: String,
    },
}

/// Canonical ISBN-10 or ISBN-13.
///
/// Hyphens and spaces are stripped and a trailing `x` is upper-cased, so two
/// spellings of the same identifier compare equal.
///
/// # Examples
/// ```
/// use gift_registry::domain::Isbn;
///
/// let isbn = Isbn::parse("0-201-55802-5").expect("valid isbn");
/// assert_eq!(isbn.as_str(), "0201558025");
/// assert!(Isbn::parse("0201558026").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn(String);

const ISBN10_LENGTH: usize = 10;
const ISBN13_LENGTH: usize = 13;

impl Isbn {
    /// Parse and verify an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IsbnValidationError`] when the identifier is empty, contains
    /// unexpected characters, has the wrong length, or fails its checksum.
    pub fn parse(raw: &str) -> Result<Self, IsbnValidationError> {
        let mut canonical = String::with_capacity(ISBN13_LENGTH);
        for character in raw.chars() {
            match character {
                '-' | ' ' => {}
                '0'..='9' => canonical.push(character),
                'x' | 'X' => canonical.push('X'),
                other => return Err(IsbnValidationError::InvalidCharacter { character: other }),
            }
        }

        let length = canonical.len();
        let valid = match length {
            0 => return Err(IsbnValidationError::Empty),
            ISBN10_LENGTH => isbn10_checksum_holds(&canonical),
            ISBN13_LENGTH => isbn13_checksum_holds(&canonical),
            _ => return Err(IsbnValidationError::InvalidLength { length }),
        };
        if !valid {
            return Err(IsbnValidationError::ChecksumMismatch { value: canonical });
        }
        Ok(Self(canonical))
    }

    /// Borrow the canonical form.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

// `X` is only meaningful as the ISBN-10 check digit.
fn isbn10_checksum_holds(canonical: &str) -> bool {
    let mut total: u32 = 0;
    for (position, character) in canonical.chars().enumerate() {
        let value = match (character, position) {
            ('X', 9) => 10,
            ('X', _) => return false,
            (digit, _) => match digit.to_digit(10) {
                Some(value) => value,
                None => return false,
            },
        };
        let weight = u32::try_from(ISBN10_LENGTH - position).unwrap_or(0);
        total += weight * value;
    }
    total.is_multiple_of(11)
}

fn isbn13_checksum_holds(canonical: &str) -> bool {
    let mut total: u32 = 0;
    for (weight, character) in [1, 3].into_iter().cycle().zip(canonical.chars()) {
        let Some(value) = character.to_digit(10) else {
            return false;
        };
        total += weight * value;
    }
    total.is_multiple_of(10)
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Isbn {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<Isbn> for String {
    fn from(value: Isbn) -> Self {
        value.0
    }
}

impl TryFrom<String> for Isbn {
    type Error = IsbnValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl std::str::FromStr for Isbn {
    type Err = IsbnValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
