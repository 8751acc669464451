//! Registry members.
//!
//! Users are read by transitions but never created or destroyed by them; the
//! roster is fixed when the initial snapshot is built.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors returned by [`User::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    /// Name is empty once trimmed.
    #[error("user name must not be empty")]
    EmptyName,
}

/// Stable numeric user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u32);

impl UserId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for UserId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Registry member.
///
/// ## Invariants
/// - `name` is non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use gift_registry::domain::{User, UserId};
///
/// let user = User::try_new(UserId::new(1), "Test user").expect("valid user");
/// assert_eq!(user.id(), UserId::new(1));
/// assert_eq!(user.name(), "Test user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: UserId,
    name: String,
}

impl User {
    /// Fallible constructor enforcing the name invariant.
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError::EmptyName`] when `name` is blank.
    pub fn try_new(id: UserId, name: impl Into<String>) -> Result<Self, UserValidationError> {
        let owned = name.into();
        if owned.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self { id, name: owned })
    }

    /// Stable user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct UserDto {
    id: u32,
    name: String,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User { id, name } = value;
        Self { id: id.get(), name }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        Self::try_new(UserId::new(value.id), value.name)
    }
}
