//! Open Library outbound adapter.
//!
//! This module provides a thin HTTP implementation of the `BookLookup` port.

mod dto;
mod http_lookup;

pub use http_lookup::{OpenLibraryBookLookup, OpenLibraryIdentity, OpenLibrarySetupError};
