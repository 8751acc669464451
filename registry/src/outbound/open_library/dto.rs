//! DTOs for decoding Open Library `jscmd=data` responses.
//!
//! The response is an object keyed by bibkey (`ISBN:<digits>`); a lookup
//! that matched nothing returns an empty object.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::ports::{BookCover, BookRecord};

#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub(super) struct BooksResponseDto {
    pub(super) entries: BTreeMap<String, BookDataDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct BookDataDto {
    #[serde(default)]
    pub(super) title: String,
    #[serde(default)]
    pub(super) authors: Vec<AuthorDto>,
    pub(super) cover: Option<CoverDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthorDto {
    pub(super) name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CoverDto {
    pub(super) small: Option<String>,
    pub(super) medium: Option<String>,
    pub(super) large: Option<String>,
}

impl BooksResponseDto {
    /// Take the entry published under `bibkey`, if any.
    pub(super) fn into_record(mut self, bibkey: &str) -> Option<BookRecord> {
        self.entries.remove(bibkey).map(BookDataDto::into_record)
    }
}

impl BookDataDto {
    fn into_record(self) -> BookRecord {
        let cover = self.cover.map_or_else(BookCover::default, |cover| BookCover {
            small: cover.small,
            medium: cover.medium,
            large: cover.large,
        });
        BookRecord {
            title: self.title,
            authors: self.authors.into_iter().map(|author| author.name).collect(),
            cover,
        }
    }
}
