//! Book enrichment.
//!
//! [`get_book_details`] awaits one catalogue lookup and folds the provider
//! record into the shape [`add_book`](super::add_book) consumes. No retries
//! happen here; lookup failures reach the caller unchanged.

use futures_util::future::join_all;
use tracing::debug;

use super::ports::{BookLookup, BookLookupError, BookRecord};
use super::{GiftId, Isbn};

/// Book-derived gift payload.
///
/// The gift identifier is the canonical ISBN, so looking up the same book
/// twice yields the same identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    gift_id: GiftId,
    description: String,
    image: String,
    authors: Vec<String>,
}

impl Book {
    /// Identifier the resulting gift will carry.
    #[must_use]
    pub const fn gift_id(&self) -> &GiftId {
        &self.gift_id
    }

    /// Gift description, taken from the book title.
    #[must_use]
    pub const fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Cover image URI, or the empty string.
    #[must_use]
    pub const fn image(&self) -> &str {
        self.image.as_str()
    }

    /// Credited authors.
    #[must_use]
    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    fn from_record(isbn: &Isbn, record: BookRecord) -> Result<Self, BookLookupError> {
        let BookRecord {
            title,
            authors,
            cover,
        } = record;

        let description = title.trim();
        if description.is_empty() {
            return Err(BookLookupError::malformed(format!(
                "record for isbn {isbn} has no title"
            )));
        }
        let gift_id = GiftId::new(isbn.as_str())
            .map_err(|error| BookLookupError::malformed(error.to_string()))?;
        let image = cover
            .medium
            .or(cover.large)
            .or(cover.small)
            .unwrap_or_default();

        Ok(Self {
            gift_id,
            description: description.to_owned(),
            image,
            authors,
        })
    }
}

/// Resolve one identifier into a [`Book`].
///
/// # Errors
///
/// Returns the lookup's [`BookLookupError`] unchanged, or
/// [`BookLookupError::Malformed`] when the record has no usable title.
///
/// # Examples
/// ```
/// use gift_registry::domain::{Isbn, get_book_details};
/// use gift_registry::domain::ports::FixtureBookLookup;
///
/// # tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(async {
/// let lookup = FixtureBookLookup::default();
/// let isbn = Isbn::parse("0201558025").expect("valid isbn");
/// let book = get_book_details(&lookup, &isbn).await.expect("known book");
/// assert_eq!(book.description(), "Concrete mathematics");
/// # });
/// ```
pub async fn get_book_details(
    lookup: &dyn BookLookup,
    isbn: &Isbn,
) -> Result<Book, BookLookupError> {
    debug!(%isbn, "looking up book details");
    let record = lookup.find_by_isbn(isbn).await?;
    Book::from_record(isbn, record)
}

/// Resolve several identifiers concurrently.
///
/// Results come back in input order, each succeeding or failing on its own.
pub async fn get_books_details(
    lookup: &dyn BookLookup,
    isbns: &[Isbn],
) -> Vec<Result<Book, BookLookupError>> {
    join_all(isbns.iter().map(|isbn| get_book_details(lookup, isbn))).await
}

#[cfg(test)]
mod tests;
