//! Book records and the REST collaborator
//!
//! The wire shape matches the `/api/books` JSON (camelCase keys). Genre and
//! status stay plain strings on the wire; the form validator restricts them
//! to the known values.

pub mod api;
pub mod query;
pub mod validate;

pub use api::{BookApi, HttpBookApi, MemoryBookApi};
pub use query::{BookPage, ListQuery, PAGE_SIZES};

use serde::{Deserialize, Serialize};

/// Genres offered by the form, in menu order
pub const GENRES: [&str; 13] = [
    "Thriller",
    "Memoir",
    "Self-Help",
    "Science Fiction",
    "Fantasy",
    "Biography",
    "Philosophy",
    "History",
    "Dystopian",
    "Classic",
    "Romance",
    "Post-Apocalyptic",
    "Horror",
];

/// Lending statuses, in menu order
pub const STATUSES: [&str; 2] = ["Available", "Issued"];

/// A stored book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub status: String,
}

/// Fields sent on create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub status: String,
}

impl BookDraft {
    pub fn into_book(self, id: u64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            genre: self.genre,
            published_year: self.published_year,
            status: self.status,
        }
    }
}

impl From<&Book> for BookDraft {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            published_year: book.published_year,
            status: book.status.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_wire_format_is_camel_case() {
        let json = r#"{
            "id": 3,
            "title": "Dune",
            "author": "Frank Herbert",
            "genre": "Science Fiction",
            "publishedYear": 1965,
            "status": "Available"
        }"#;

        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.published_year, 1965);

        let draft = BookDraft::from(&book);
        let out = serde_json::to_value(&draft).unwrap();
        assert_eq!(out["publishedYear"], 1965);
        assert!(out.get("id").is_none());
    }
}
