//! Driven port for resolving catalogue identifiers into book metadata.
//!
//! The domain owns the record shape so enrichment stays independent of the
//! provider behind the adapter.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::Isbn;

/// Cover image references published by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookCover {
    /// Thumbnail-sized image URL.
    pub small: Option<String>,
    /// Medium-sized image URL.
    pub medium: Option<String>,
    /// Large image URL.
    pub large: Option<String>,
}

/// Provider-shaped metadata for one book.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookRecord {
    /// Main title as published.
    pub title: String,
    /// Author display names in credit order.
    pub authors: Vec<String>,
    /// Cover image references.
    pub cover: BookCover,
}

define_port_error! {
    /// Errors surfaced while looking up a book.
    pub enum BookLookupError {
        /// The provider has no record for the identifier.
        NotFound {
            /// Canonical identifier that was looked up.
            isbn: String,
        } =>
            "no book found for isbn {isbn}",
        /// Network transport failed before a response arrived.
        Transport {
            /// Provider or transport detail.
            message: String,
        } =>
            "book lookup transport failed: {message}",
        /// The lookup exceeded its timeout.
        Timeout {
            /// Provider or transport detail.
            message: String,
        } =>
            "book lookup timeout: {message}",
        /// The provider rate-limited the request.
        RateLimited {
            /// Provider or transport detail.
            message: String,
        } =>
            "book lookup rate limited: {message}",
        /// The response body could not be decoded.
        Decode {
            /// Provider or transport detail.
            message: String,
        } =>
            "book lookup response decode failed: {message}",
        /// The response decoded but lacks data a gift needs.
        Malformed {
            /// Provider or transport detail.
            message: String,
        } =>
            "book lookup returned malformed data: {message}",
    }
}

/// Port for resolving an ISBN into a [`BookRecord`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookLookup: Send + Sync {
    /// Fetch metadata for one identifier.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use gift_registry::domain::Isbn;
    /// use gift_registry::domain::ports::{BookLookup, FixtureBookLookup};
    ///
    /// let lookup = FixtureBookLookup::default();
    /// let isbn = Isbn::parse("0201558025")?;
    /// let record = lookup.find_by_isbn(&isbn).await?;
    /// assert_eq!(record.title, "Concrete mathematics");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<BookRecord, BookLookupError>;
}

/// In-memory catalogue keyed by canonical ISBN.
///
/// The default catalogue carries the two books used in the demo fixtures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureBookLookup {
    records: BTreeMap<Isbn, BookRecord>,
}

impl FixtureBookLookup {
    /// Build an empty catalogue.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Add or replace one record.
    #[must_use]
    pub fn with_record(mut self, isbn: Isbn, record: BookRecord) -> Self {
        self.records.insert(isbn, record);
        self
    }
}

impl Default for FixtureBookLookup {
    fn default() -> Self {
        let mut records = BTreeMap::new();
        if let Ok(isbn) = Isbn::parse("0201558025") {
            records.insert(
                isbn,
                BookRecord {
                    title: "Concrete mathematics".to_owned(),
                    authors: vec![
                        "Ronald L. Graham".to_owned(),
                        "Donald E. Knuth".to_owned(),
                        "Oren Patashnik".to_owned(),
                    ],
                    cover: BookCover {
                        small: Some("https://covers.openlibrary.org/b/id/135182-S.jpg".to_owned()),
                        medium: Some(
                            "https://covers.openlibrary.org/b/id/135182-M.jpg".to_owned(),
                        ),
                        large: Some("https://covers.openlibrary.org/b/id/135182-L.jpg".to_owned()),
                    },
                },
            );
        }
        if let Ok(isbn) = Isbn::parse("9781598560169") {
            records.insert(
                isbn,
                BookRecord {
                    title: "The Unicode Standard, Version 5.0".to_owned(),
                    authors: vec!["The Unicode Consortium".to_owned()],
                    cover: BookCover::default(),
                },
            );
        }
        Self { records }
    }
}

#[async_trait]
impl BookLookup for FixtureBookLookup {
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<BookRecord, BookLookupError> {
        self.records
            .get(isbn)
            .cloned()
            .ok_or_else(|| BookLookupError::not_found(isbn.as_str()))
    }
}
