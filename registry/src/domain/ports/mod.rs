//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to reach driven adapters. Each
//! trait exposes a strongly typed error so adapters map their failures into
//! predictable variants instead of returning opaque reports.

mod macros;
pub(crate) use macros::define_port_error;

mod book_lookup;

#[cfg(test)]
pub use book_lookup::MockBookLookup;
pub use book_lookup::{BookCover, BookLookup, BookLookupError, BookRecord, FixtureBookLookup};
