use chrono::Datelike;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CatalogError, Result};

/// Oldest publication year the service accepts.
pub const MIN_PUBLICATION_YEAR: i32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Genre {
    Fiction,
    Science,
    History,
    Biography,
    Fantasy,
}

impl Genre {
    /// Every genre the service knows, in menu order.
    pub const ALL: [Genre; 5] = [
        Genre::Fiction,
        Genre::Science,
        Genre::History,
        Genre::Biography,
        Genre::Fantasy,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BookStatus {
    #[default]
    Available,
    Issued,
}

impl BookStatus {
    pub const ALL: [BookStatus; 2] = [BookStatus::Available, BookStatus::Issued];
}

/// One catalog record, as confirmed by the remote service.
///
/// The id is assigned by the service and treated as opaque text locally;
/// some backends hand out numeric ids, so deserialization accepts both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: Genre,
    pub year: i32,
    pub status: BookStatus,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Numeric(i64),
}

fn opaque_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(value) => value,
        IdRepr::Numeric(value) => value.to_string(),
    })
}

/// The id-less field set sent to the service when creating or updating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub genre: Genre,
    pub year: i32,
    pub status: BookStatus,
}

impl BookFields {
    pub(crate) fn with_id(&self, id: &str) -> Book {
        Book {
            id: id.to_string(),
            title: self.title.clone(),
            author: self.author.clone(),
            genre: self.genre,
            year: self.year,
            status: self.status,
        }
    }
}

/// Form state for the add and edit views. Fields start empty and are only
/// checked when the user submits; `validated` gates every remote write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub genre: Option<Genre>,
    pub year: Option<i32>,
    pub status: BookStatus,
}

impl BookDraft {
    /// Prefill for the edit form.
    pub fn from_book(book: &Book) -> Self {
        BookDraft {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: Some(book.genre),
            year: Some(book.year),
            status: book.status,
        }
    }

    /// Checks required fields and the year range, producing the payload for
    /// the service. Runs before any request goes out.
    pub fn validated(&self) -> Result<BookFields> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CatalogError::Validation("title is required".to_string()));
        }
        let author = self.author.trim();
        if author.is_empty() {
            return Err(CatalogError::Validation("author is required".to_string()));
        }
        let genre = match self.genre {
            Some(value) => value,
            None => return Err(CatalogError::Validation("genre is required".to_string())),
        };
        let year = match self.year {
            Some(value) => value,
            None => {
                return Err(CatalogError::Validation(
                    "published year is required".to_string(),
                ))
            }
        };
        let max_year = current_year();
        if year < MIN_PUBLICATION_YEAR || year > max_year {
            return Err(CatalogError::Validation(format!(
                "published year must be between {} and {}",
                MIN_PUBLICATION_YEAR, max_year
            )));
        }

        Ok(BookFields {
            title: title.to_string(),
            author: author.to_string(),
            genre,
            year,
            status: self.status,
        })
    }
}

fn current_year() -> i32 {
    chrono::Utc::now().year()
}
