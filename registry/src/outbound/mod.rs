//! Outbound adapters implementing domain ports for external services.
//!
//! - **open_library**: reqwest-backed `BookLookup` against the Open Library
//!   books API.
//!
//! Adapters translate between provider payloads and domain records. They
//! contain no registry logic.

pub mod open_library;
