//! Gift entries and their identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::UserId;

/// Validation errors returned when constructing a [`GiftId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GiftValidationError {
    /// Identifier is empty after trimming whitespace.
    #[error("gift id must not be empty")]
    EmptyId,
    /// Identifier carries leading or trailing whitespace.
    #[error("gift id must not contain surrounding whitespace")]
    SurroundingWhitespace,
}

/// Identifier of a gift, unique within one snapshot.
///
/// # Examples
/// ```
/// use gift_registry::domain::GiftId;
///
/// let id = GiftId::new("mug").expect("valid id");
/// assert_eq!(id.as_str(), "mug");
/// assert!(GiftId::new(" mug").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GiftId(String);

impl GiftId {
    /// Validate and construct a [`GiftId`].
    ///
    /// # Errors
    ///
    /// Returns [`GiftValidationError`] when the identifier is blank or padded.
    pub fn new(id: impl Into<String>) -> Result<Self, GiftValidationError> {
        let raw = id.into();
        if raw.trim().is_empty() {
            return Err(GiftValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(GiftValidationError::SurroundingWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for GiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for GiftId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<GiftId> for String {
    fn from(value: GiftId) -> Self {
        value.0
    }
}

impl TryFrom<String> for GiftId {
    type Error = GiftValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for GiftId {
    type Error = GiftValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One entry in the registry.
///
/// `image` is a URI or the empty string. `reserved_by` is `None` until a
/// member claims the gift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Gift {
    id: GiftId,
    description: String,
    image: String,
    #[serde(default)]
    reserved_by: Option<UserId>,
}

impl Gift {
    /// Build an unreserved gift.
    #[must_use]
    pub fn new(id: GiftId, description: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            image: image.into(),
            reserved_by: None,
        }
    }

    /// Copy of this gift claimed by `user`.
    #[must_use]
    pub fn reserved(&self, user: UserId) -> Self {
        Self {
            reserved_by: Some(user),
            ..self.clone()
        }
    }

    /// Gift identifier.
    #[must_use]
    pub const fn id(&self) -> &GiftId {
        &self.id
    }

    /// Human readable description.
    #[must_use]
    pub const fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Image URI, or the empty string.
    #[must_use]
    pub const fn image(&self) -> &str {
        self.image.as_str()
    }

    /// Member holding the claim, if any.
    #[must_use]
    pub const fn reserved_by(&self) -> Option<UserId> {
        self.reserved_by
    }

    /// Whether any member has claimed the gift.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        self.reserved_by.is_some()
    }
}
