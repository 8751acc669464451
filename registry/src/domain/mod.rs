//! Domain primitives, snapshot transitions, and enrichment.
//!
//! Purpose: hold the registry state model and the pure functions that derive
//! one snapshot from another. Types are immutable once built; every nested
//! value is shared through [`Frozen`] handles and nothing here exposes
//! mutable access.
//!
//! Public surface:
//! - Snapshot (alias to `snapshot::Snapshot`) — root registry state.
//! - Gift, User — nested entities with validated identifiers.
//! - add_gift, toggle_reservation, add_book — synchronous transitions.
//! - get_book_details — asynchronous enrichment through the `BookLookup` port.

mod book;
mod error;
mod frozen;
mod gift;
mod isbn;
pub mod ports;
mod snapshot;
mod transitions;
mod user;

pub use self::book::{Book, get_book_details, get_books_details};
pub use self::error::SnapshotError;
pub use self::frozen::Frozen;
pub use self::gift::{Gift, GiftId, GiftValidationError};
pub use self::isbn::{Isbn, IsbnValidationError};
pub use self::snapshot::{Snapshot, SnapshotBuilder};
pub use self::transitions::{add_book, add_gift, toggle_reservation};
pub use self::user::{User, UserId, UserValidationError};

#[cfg(test)]
pub(crate) mod test_fixtures;
