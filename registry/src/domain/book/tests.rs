//! Tests for book enrichment.

use std::sync::Mutex;

use async_trait::async_trait;
use rstest::{fixture, rstest};
use tokio::sync::Notify;

use super::*;
use crate::domain::ports::{BookCover, FixtureBookLookup, MockBookLookup};
use crate::domain::test_fixtures::initial_state;
use crate::domain::{Snapshot, add_book};

const CONCRETE_MATHEMATICS: &str = "0201558025";
const UNICODE_STANDARD: &str = "9781598560169";

fn isbn(raw: &str) -> Isbn {
    Isbn::parse(raw).expect("valid isbn")
}

fn record_with_cover(cover: BookCover) -> BookRecord {
    BookRecord {
        title: "Dune".to_owned(),
        authors: vec!["Frank Herbert".to_owned()],
        cover,
    }
}

fn url(size: &str) -> Option<String> {
    Some(format!("https://covers.example/{size}.jpg"))
}

#[fixture]
fn catalogue() -> FixtureBookLookup {
    FixtureBookLookup::default()
}

/// Lookup whose first identifier only resolves after the second one has.
struct GatedLookup {
    inner: FixtureBookLookup,
    held: Isbn,
    gate: Notify,
    completed: Mutex<Vec<String>>,
}

impl GatedLookup {
    fn new(held: Isbn) -> Self {
        Self {
            inner: FixtureBookLookup::default(),
            held,
            gate: Notify::new(),
            completed: Mutex::new(Vec::new()),
        }
    }

    fn completion_order(&self) -> Vec<String> {
        self.completed.lock().expect("completion log").clone()
    }
}

#[async_trait]
impl BookLookup for GatedLookup {
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<BookRecord, BookLookupError> {
        if isbn == &self.held {
            self.gate.notified().await;
        }
        let record = self.inner.find_by_isbn(isbn).await;
        self.completed
            .lock()
            .expect("completion log")
            .push(isbn.to_string());
        if isbn != &self.held {
            self.gate.notify_one();
        }
        record
    }
}

#[rstest]
#[tokio::test]
async fn resolves_a_known_book(catalogue: FixtureBookLookup) {
    let book = get_book_details(&catalogue, &isbn(CONCRETE_MATHEMATICS))
        .await
        .expect("known book");

    assert_eq!(book.description(), "Concrete mathematics");
    assert_eq!(book.gift_id().as_str(), CONCRETE_MATHEMATICS);
    assert_eq!(
        book.image(),
        "https://covers.openlibrary.org/b/id/135182-M.jpg"
    );
    assert_eq!(book.authors().len(), 3);
}

#[rstest]
#[tokio::test]
async fn hyphenated_input_yields_the_canonical_id(catalogue: FixtureBookLookup) {
    let book = get_book_details(&catalogue, &isbn("0-201-55802-5"))
        .await
        .expect("known book");
    assert_eq!(book.gift_id().as_str(), CONCRETE_MATHEMATICS);
}

#[rstest]
#[tokio::test]
async fn book_without_cover_has_an_empty_image(catalogue: FixtureBookLookup) {
    let book = get_book_details(&catalogue, &isbn(UNICODE_STANDARD))
        .await
        .expect("known book");
    assert_eq!(book.image(), "");
}

#[rstest]
#[case::prefers_medium(BookCover { small: url("s"), medium: url("m"), large: url("l") }, "https://covers.example/m.jpg")]
#[case::falls_back_to_large(BookCover { small: url("s"), medium: None, large: url("l") }, "https://covers.example/l.jpg")]
#[case::falls_back_to_small(BookCover { small: url("s"), medium: None, large: None }, "https://covers.example/s.jpg")]
#[case::no_cover(BookCover::default(), "")]
#[tokio::test]
async fn picks_the_best_available_cover(#[case] cover: BookCover, #[case] expected: &str) {
    let lookup = FixtureBookLookup::empty().with_record(isbn("0441172717"), record_with_cover(cover));
    let book = get_book_details(&lookup, &isbn("0441172717"))
        .await
        .expect("known book");
    assert_eq!(book.image(), expected);
}

#[rstest]
#[tokio::test]
async fn trims_the_title() {
    let record = BookRecord {
        title: "  Dune \n".to_owned(),
        ..record_with_cover(BookCover::default())
    };
    let lookup = FixtureBookLookup::empty().with_record(isbn("0441172717"), record);
    let book = get_book_details(&lookup, &isbn("0441172717"))
        .await
        .expect("known book");
    assert_eq!(book.description(), "Dune");
}

#[rstest]
#[tokio::test]
async fn blank_title_is_malformed() {
    let record = BookRecord {
        title: "   ".to_owned(),
        ..record_with_cover(BookCover::default())
    };
    let lookup = FixtureBookLookup::empty().with_record(isbn("0441172717"), record);
    let error = get_book_details(&lookup, &isbn("0441172717"))
        .await
        .expect_err("blank title");
    assert!(matches!(error, BookLookupError::Malformed { .. }));
}

#[rstest]
#[tokio::test]
async fn unknown_book_is_not_found() {
    let error = get_book_details(&FixtureBookLookup::empty(), &isbn(CONCRETE_MATHEMATICS))
        .await
        .expect_err("empty catalogue");
    assert_eq!(error, BookLookupError::not_found(CONCRETE_MATHEMATICS));
}

#[rstest]
#[case::timeout(BookLookupError::timeout("deadline elapsed"))]
#[case::rate_limited(BookLookupError::rate_limited("slow down"))]
#[case::transport(BookLookupError::transport("connection reset"))]
#[case::decode(BookLookupError::decode("expected object"))]
#[tokio::test]
async fn lookup_failures_propagate_unchanged(#[case] failure: BookLookupError) {
    let mut lookup = MockBookLookup::new();
    let returned = failure.clone();
    lookup
        .expect_find_by_isbn()
        .times(1)
        .return_once(move |_| Err(returned));

    let error = get_book_details(&lookup, &isbn(CONCRETE_MATHEMATICS))
        .await
        .expect_err("lookup fails");
    assert_eq!(error, failure);
}

#[rstest]
#[tokio::test]
async fn batch_lookup_keeps_input_order(catalogue: FixtureBookLookup) {
    let isbns = [isbn(UNICODE_STANDARD), isbn("0441172717"), isbn(CONCRETE_MATHEMATICS)];
    let results = get_books_details(&catalogue, &isbns).await;

    let outcomes: Vec<Result<&str, &BookLookupError>> = results
        .iter()
        .map(|result| result.as_ref().map(Book::description))
        .collect();
    assert_eq!(outcomes.len(), 3);
    assert_eq!(
        outcomes.first(),
        Some(&Ok("The Unicode Standard, Version 5.0"))
    );
    assert!(matches!(
        outcomes.get(1),
        Some(Err(BookLookupError::NotFound { .. }))
    ));
    assert_eq!(outcomes.get(2), Some(&Ok("Concrete mathematics")));
}

#[rstest]
#[tokio::test]
async fn composition_order_wins_over_completion_order(initial_state: Snapshot) {
    let first = isbn(CONCRETE_MATHEMATICS);
    let second = isbn(UNICODE_STANDARD);
    let lookup = GatedLookup::new(first.clone());

    let results = get_books_details(&lookup, &[first, second]).await;
    assert_eq!(
        lookup.completion_order(),
        [UNICODE_STANDARD, CONCRETE_MATHEMATICS]
    );

    let mut books = results.into_iter().map(|result| result.expect("known book"));
    let concrete = books.next().expect("first book");
    let unicode = books.next().expect("second book");
    let after_first = add_book(&initial_state, &concrete).expect("fresh id");
    let after_both = add_book(&after_first, &unicode).expect("fresh id");

    let ids: Vec<&str> = after_both
        .gifts()
        .iter()
        .map(|gift| gift.id().as_str())
        .collect();
    assert_eq!(
        ids,
        [
            "immer_license",
            "egghead_subscription",
            CONCRETE_MATHEMATICS,
            UNICODE_STANDARD
        ]
    );
}

#[rstest]
#[tokio::test]
async fn adding_two_books_grows_the_registry_to_four(
    initial_state: Snapshot,
    catalogue: FixtureBookLookup,
) {
    let concrete = get_book_details(&catalogue, &isbn(CONCRETE_MATHEMATICS))
        .await
        .expect("known book");
    let unicode = get_book_details(&catalogue, &isbn(UNICODE_STANDARD))
        .await
        .expect("known book");

    let next = add_book(&add_book(&initial_state, &concrete).expect("fresh id"), &unicode)
        .expect("fresh id");

    assert_eq!(next.gifts().len(), 4);
    assert_eq!(initial_state.gifts().len(), 2);
    let added = next.gift(concrete.gift_id()).expect("book gift");
    assert_eq!(added.description(), "Concrete mathematics");
    assert_eq!(added.reserved_by(), None);
}

#[rstest]
#[tokio::test]
async fn adding_the_same_book_twice_is_rejected(
    initial_state: Snapshot,
    catalogue: FixtureBookLookup,
) {
    let book = get_book_details(&catalogue, &isbn(CONCRETE_MATHEMATICS))
        .await
        .expect("known book");
    let once = add_book(&initial_state, &book).expect("fresh id");
    let error = add_book(&once, &book).expect_err("duplicate");
    assert!(matches!(error, crate::domain::SnapshotError::DuplicateGift { .. }));
}
