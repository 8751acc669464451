//! Snapshot transitions.
//!
//! Each function reads one snapshot and returns a new one. Unchanged users
//! and gifts are carried over as the same [`Frozen`] handles; only the gift
//! a transition touches is reallocated.

use std::iter;

use tracing::debug;

use super::{Book, Frozen, Gift, GiftId, Snapshot, SnapshotError};

/// Append an unreserved gift.
///
/// # Errors
///
/// Returns [`SnapshotError::DuplicateGift`] when `id` is already present.
///
/// # Examples
/// ```
/// use gift_registry::domain::{GiftId, Snapshot, User, UserId, add_gift};
///
/// let state = Snapshot::builder()
///     .user(User::try_new(UserId::new(1), "Test user").expect("valid user"))
///     .current_user(UserId::new(1))
///     .build()
///     .expect("valid snapshot");
/// let next = add_gift(&state, GiftId::new("mug").expect("valid id"), "Coffee mug", "")
///     .expect("fresh id");
/// assert_eq!(next.gifts().len(), 1);
/// assert!(state.gifts().is_empty());
/// ```
pub fn add_gift(
    state: &Snapshot,
    id: GiftId,
    description: impl Into<String>,
    image: impl Into<String>,
) -> Result<Snapshot, SnapshotError> {
    if state.gift(&id).is_some() {
        return Err(SnapshotError::duplicate_gift(&id));
    }
    debug!(gift_id = %id, "adding gift");

    let gift = Frozen::new(Gift::new(id, description, image));
    let gifts = state
        .gifts()
        .iter()
        .cloned()
        .chain(iter::once(gift))
        .collect();
    Ok(state.with_gifts(gifts))
}

/// Claim a gift for the acting user.
///
/// An unclaimed gift becomes reserved by the current user. A gift that is
/// already claimed, by anyone, keeps its claim and the input snapshot is
/// returned as is.
///
/// # Errors
///
/// Returns [`SnapshotError::GiftNotFound`] when `gift_id` is absent.
pub fn toggle_reservation(state: &Snapshot, gift_id: &GiftId) -> Result<Snapshot, SnapshotError> {
    let (position, target) = state
        .gifts()
        .iter()
        .enumerate()
        .find(|(_, gift)| gift.id() == gift_id)
        .ok_or_else(|| SnapshotError::gift_not_found(gift_id))?;
    let actor = state.current_user().id();

    if let Some(holder) = target.reserved_by() {
        debug!(%gift_id, %holder, %actor, "gift already reserved; claim kept");
        return Ok(state.clone());
    }
    debug!(%gift_id, %actor, "reserving gift");

    let claimed = Frozen::new(target.reserved(actor));
    let gifts = state
        .gifts()
        .iter()
        .enumerate()
        .map(|(index, gift)| {
            if index == position {
                claimed.clone()
            } else {
                gift.clone()
            }
        })
        .collect();
    Ok(state.with_gifts(gifts))
}

/// Append a gift built from an enriched [`Book`].
///
/// # Errors
///
/// Returns [`SnapshotError::DuplicateGift`] when the book was already added.
pub fn add_book(state: &Snapshot, book: &Book) -> Result<Snapshot, SnapshotError> {
    add_gift(
        state,
        book.gift_id().clone(),
        book.description(),
        book.image(),
    )
}
