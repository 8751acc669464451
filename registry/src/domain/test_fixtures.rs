//! Shared snapshot fixtures for domain unit tests.

use rstest::fixture;

use super::{Gift, GiftId, Snapshot, User, UserId};

pub(crate) const IMMER_LICENSE: &str = "immer_license";
pub(crate) const EGGHEAD_SUBSCRIPTION: &str = "egghead_subscription";

pub(crate) fn gift_id(raw: &str) -> GiftId {
    GiftId::new(raw).expect("valid gift id")
}

pub(crate) fn user(id: u32, name: &str) -> User {
    User::try_new(UserId::new(id), name).expect("valid user")
}

/// Two members, the first acting; one gift claimed by the second member and
/// one unclaimed.
#[fixture]
pub(crate) fn initial_state() -> Snapshot {
    Snapshot::builder()
        .user(user(1, "Test user"))
        .user(user(2, "Someone else"))
        .current_user(UserId::new(1))
        .gift(
            Gift::new(
                gift_id(IMMER_LICENSE),
                "Immer license",
                "https://raw.githubusercontent.com/immerjs/immer/master/images/immer-logo.png",
            )
            .reserved(UserId::new(2)),
        )
        .gift(Gift::new(
            gift_id(EGGHEAD_SUBSCRIPTION),
            "Egghead.io subscription",
            "https://pbs.twimg.com/profile_images/735242324293210112/H8YfgQHP_400x400.jpg",
        ))
        .build()
        .expect("valid initial snapshot")
}
