//! Read-only shared handles for snapshot values.
//!
//! Every value reachable from a [`Snapshot`](super::Snapshot) sits behind a
//! [`Frozen`] handle. Handles are cheap to clone and never hand out mutable
//! access, so a caller may keep an old snapshot around while newer snapshots
//! share its unchanged parts. Changing a value means thawing a private copy,
//! editing that copy, and freezing it again as a new allocation.

use std::any::type_name;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use super::SnapshotError;

/// Shared, read-only handle to a snapshot value.
///
/// # Examples
/// ```
/// use gift_registry::domain::Frozen;
///
/// let original = Frozen::new(String::from("mug"));
/// let shared = original.clone();
/// assert!(Frozen::ptr_eq(&original, &shared));
///
/// let mut copy = original.thaw();
/// copy.push_str("s");
/// let changed = Frozen::new(copy);
/// assert_eq!(original.as_str(), "mug");
/// assert_eq!(changed.as_str(), "mugs");
/// ```
pub struct Frozen<T: ?Sized>(Arc<T>);

impl<T> Frozen<T> {
    /// Freeze an owned value.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl<T: ?Sized> Frozen<T> {
    /// Whether both handles point at the same allocation.
    #[must_use]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.0, &other.0)
    }

    /// Refuse in-place mutation.
    ///
    /// Frozen values may be observed through any number of retained
    /// snapshots, so writes are always rejected with
    /// [`SnapshotError::ReadOnly`]. Use [`Frozen::thaw`] to obtain a private
    /// copy instead.
    ///
    /// # Errors
    ///
    /// Always returns [`SnapshotError::ReadOnly`] naming the frozen type.
    ///
    /// # Examples
    /// ```
    /// use gift_registry::domain::{Frozen, SnapshotError};
    ///
    /// let mut value = Frozen::new(7_u32);
    /// let err = value.try_mut().expect_err("frozen values reject writes");
    /// assert!(matches!(err, SnapshotError::ReadOnly { .. }));
    /// assert!(err.to_string().contains("read only"));
    /// ```
    pub fn try_mut(&mut self) -> Result<&mut T, SnapshotError> {
        Err(SnapshotError::read_only(type_name::<T>()))
    }
}

impl<T: Clone> Frozen<T> {
    /// Copy the value out for editing; the frozen original is untouched.
    #[must_use]
    pub fn thaw(&self) -> T {
        T::clone(&self.0)
    }
}

impl<T: ?Sized> Clone for Frozen<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> Deref for Frozen<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: ?Sized> AsRef<T> for Frozen<T> {
    fn as_ref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized + PartialEq> PartialEq for Frozen<T> {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other) || *self.0 == *other.0
    }
}

impl<T: ?Sized + Eq> Eq for Frozen<T> {}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Frozen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl<T> From<Vec<T>> for Frozen<[T]> {
    fn from(values: Vec<T>) -> Self {
        Self(Arc::from(values))
    }
}

impl<T> FromIterator<T> for Frozen<[T]> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
