//! Errors raised while building or transitioning registry snapshots.
//!
//! Transitions never swallow or log these; every failure is returned to the
//! immediate caller and the input snapshot is left as it was.

use thiserror::Error;

use super::{GiftId, UserId};

/// Failures surfaced by snapshot construction, transitions, and frozen
/// handles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// A transition referenced a gift that is not in the snapshot.
    #[error("gift '{id}' does not exist in the registry")]
    GiftNotFound {
        /// Identifier that failed to resolve.
        id: GiftId,
    },
    /// A gift with the same identifier is already in the snapshot.
    #[error("gift '{id}' already exists in the registry")]
    DuplicateGift {
        /// Identifier that collided.
        id: GiftId,
    },
    /// The acting user is not part of the roster.
    #[error("current user {id} is not a member of the registry")]
    UnknownCurrentUser {
        /// Identifier of the acting user.
        id: UserId,
    },
    /// Two roster entries share an identifier.
    #[error("user {id} appears more than once in the registry")]
    DuplicateUser {
        /// Identifier that collided.
        id: UserId,
    },
    /// A builder was finished without naming the acting user.
    #[error("registry snapshot requires a current user")]
    MissingCurrentUser,
    /// Something attempted to write into a frozen snapshot value.
    #[error("cannot write to read only {target}")]
    ReadOnly {
        /// Type name of the frozen value.
        target: &'static str,
    },
}

impl SnapshotError {
    /// Helper for unknown gift identifiers.
    #[must_use]
    pub fn gift_not_found(id: &GiftId) -> Self {
        Self::GiftNotFound { id: id.clone() }
    }

    /// Helper for colliding gift identifiers.
    #[must_use]
    pub fn duplicate_gift(id: &GiftId) -> Self {
        Self::DuplicateGift { id: id.clone() }
    }

    /// Helper for rejected writes.
    #[must_use]
    pub const fn read_only(target: &'static str) -> Self {
        Self::ReadOnly { target }
    }
}
