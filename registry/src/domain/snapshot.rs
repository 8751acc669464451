//! Root registry snapshot.
//!
//! A [`Snapshot`] is one immutable value of the registry: the roster, the
//! acting user, and the gifts in insertion order. Every nested value sits
//! behind a [`Frozen`] handle, so transitions build a new snapshot by reusing
//! the handles they do not change and allocating only the gift that did.
//!
//! Snapshots serialise to the camelCase JSON shape
//! `{ "users": [...], "currentUser": {...}, "gifts": [...] }`; decoding runs
//! the same validation as [`SnapshotBuilder::build`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Frozen, Gift, GiftId, SnapshotError, User, UserId};

/// Immutable registry state.
///
/// Cloning is O(1) and yields a snapshot for which [`Snapshot::ptr_eq`]
/// holds. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SnapshotDto", into = "SnapshotDto")]
pub struct Snapshot(Frozen<Registry>);

#[derive(Debug, PartialEq, Eq)]
struct Registry {
    users: Frozen<[Frozen<User>]>,
    current_user: Frozen<User>,
    gifts: Frozen<[Frozen<Gift>]>,
}

impl Snapshot {
    /// Start assembling an initial snapshot.
    #[must_use]
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    /// Registry members in roster order.
    #[must_use]
    pub fn users(&self) -> &[Frozen<User>] {
        &self.0.users
    }

    /// The member performing transitions against this snapshot.
    #[must_use]
    pub fn current_user(&self) -> &Frozen<User> {
        &self.0.current_user
    }

    /// Gifts in insertion order.
    #[must_use]
    pub fn gifts(&self) -> &[Frozen<Gift>] {
        &self.0.gifts
    }

    /// Look up a gift by identifier.
    #[must_use]
    pub fn gift(&self, id: &GiftId) -> Option<&Frozen<Gift>> {
        self.gifts().iter().find(|gift| gift.id() == id)
    }

    /// Look up a member by identifier.
    #[must_use]
    pub fn user(&self, id: UserId) -> Option<&Frozen<User>> {
        self.users().iter().find(|user| user.id() == id)
    }

    /// Gifts claimed by the acting user.
    pub fn reserved_by_current_user(&self) -> impl Iterator<Item = &Frozen<Gift>> {
        let actor = self.current_user().id();
        self.gifts()
            .iter()
            .filter(move |gift| gift.reserved_by() == Some(actor))
    }

    /// Whether both snapshots are the same value rather than equal copies.
    #[must_use]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Frozen::ptr_eq(&this.0, &other.0)
    }

    /// New snapshot sharing this roster and acting user with a new gift list.
    pub(crate) fn with_gifts(&self, gifts: Frozen<[Frozen<Gift>]>) -> Self {
        Self(Frozen::new(Registry {
            users: self.0.users.clone(),
            current_user: self.0.current_user.clone(),
            gifts,
        }))
    }
}

/// Mutable assembly area for an initial [`Snapshot`].
///
/// The builder is the only place registry values are mutable; once
/// [`SnapshotBuilder::build`] succeeds the result is frozen.
///
/// # Examples
/// ```
/// use gift_registry::domain::{Gift, GiftId, Snapshot, User, UserId};
///
/// let state = Snapshot::builder()
///     .user(User::try_new(UserId::new(1), "Test user").expect("valid user"))
///     .current_user(UserId::new(1))
///     .gift(Gift::new(GiftId::new("mug").expect("valid id"), "Coffee mug", ""))
///     .build()
///     .expect("valid snapshot");
/// assert_eq!(state.gifts().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    users: Vec<User>,
    current_user: Option<UserId>,
    gifts: Vec<Gift>,
}

impl SnapshotBuilder {
    /// Append a member to the roster.
    #[must_use]
    pub fn user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    /// Name the acting member.
    #[must_use]
    pub const fn current_user(mut self, id: UserId) -> Self {
        self.current_user = Some(id);
        self
    }

    /// Append a gift.
    #[must_use]
    pub fn gift(mut self, gift: Gift) -> Self {
        self.gifts.push(gift);
        self
    }

    /// Validate and freeze the snapshot.
    ///
    /// The acting user shares its allocation with the matching roster entry.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when user or gift identifiers repeat, when no
    /// acting user was named, or when the acting user is not on the roster.
    pub fn build(self) -> Result<Snapshot, SnapshotError> {
        let Self {
            users,
            current_user,
            gifts,
        } = self;

        if let Some(id) = first_repeat(users.iter().map(User::id)) {
            return Err(SnapshotError::DuplicateUser { id });
        }
        if let Some(id) = first_repeat(gifts.iter().map(Gift::id)) {
            return Err(SnapshotError::duplicate_gift(id));
        }

        let actor = current_user.ok_or(SnapshotError::MissingCurrentUser)?;
        let roster: Frozen<[Frozen<User>]> = users.into_iter().map(Frozen::new).collect();
        let acting = roster
            .iter()
            .find(|user| user.id() == actor)
            .cloned()
            .ok_or(SnapshotError::UnknownCurrentUser { id: actor })?;

        Ok(Snapshot(Frozen::new(Registry {
            users: roster,
            current_user: acting,
            gifts: gifts.into_iter().map(Frozen::new).collect(),
        })))
    }
}

fn first_repeat<K: Ord + Copy>(keys: impl IntoIterator<Item = K>) -> Option<K> {
    let mut seen = BTreeSet::new();
    keys.into_iter().find(|key| !seen.insert(*key))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
struct SnapshotDto {
    users: Vec<User>,
    current_user: User,
    gifts: Vec<Gift>,
}

impl From<Snapshot> for SnapshotDto {
    fn from(value: Snapshot) -> Self {
        Self {
            users: value.users().iter().map(Frozen::thaw).collect(),
            current_user: value.current_user().thaw(),
            gifts: value.gifts().iter().map(Frozen::thaw).collect(),
        }
    }
}

impl TryFrom<SnapshotDto> for Snapshot {
    type Error = SnapshotError;

    fn try_from(value: SnapshotDto) -> Result<Self, Self::Error> {
        let SnapshotDto {
            users,
            current_user,
            gifts,
        } = value;
        let actor = current_user.id();
        let builder = gifts.into_iter().fold(
            users
                .into_iter()
                .fold(Self::builder(), SnapshotBuilder::user)
                .current_user(actor),
            SnapshotBuilder::gift,
        );
        let snapshot = builder.build()?;
        if **snapshot.current_user() != current_user {
            return Err(SnapshotError::UnknownCurrentUser { id: actor });
        }
        Ok(snapshot)
    }
}
