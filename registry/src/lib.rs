//! Immutable gift registry snapshots.
//!
//! A [`domain::Snapshot`] holds users, the acting user, and gifts. Every
//! transition derives a new snapshot that shares untouched users and gifts
//! with its input, so earlier snapshots stay valid and unchanged. Book gifts
//! are enriched through the [`domain::ports::BookLookup`] port, backed by
//! Open Library in [`outbound::open_library`] or a bundled catalogue.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
