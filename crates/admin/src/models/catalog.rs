//! Catalog records: authors, books, packs and home page sections.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bookshelf_core::{AuthorId, BookId, CategoryId, Language, PackId, Price, TagId};

/// A book author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub biography: Option<String>,
    pub nationality: Option<String>,
}

/// A tag attached to a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRef {
    pub id: TagId,
    pub title: String,
}

/// A book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: Option<Author>,
    pub price: Price,
    pub stock_quantity: i32,
    pub language: Option<Language>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub tags: Vec<TagRef>,
    /// Cache-busted cover URL.
    pub cover_url: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Book {
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Author name, or an empty string for anonymous works.
    #[must_use]
    pub fn author_name(&self) -> &str {
        self.author.as_ref().map_or("", |a| a.name.as_str())
    }
}

/// Short book reference embedded in packs and sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRef {
    pub id: BookId,
    pub title: String,
    pub price: Option<Price>,
}

/// A bundle of books sold together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pack {
    pub id: PackId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub book_ids: Vec<BookId>,
    pub books: Vec<BookRef>,
    pub image: Option<String>,
}

impl Pack {
    /// Sum of the bundled books' individual prices, when all are known.
    #[must_use]
    pub fn books_total(&self) -> Option<Price> {
        self.books.iter().map(|b| b.price).sum()
    }
}

/// A home page section (a "main display" tag).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: TagId,
    pub title: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub main_display: bool,
    pub book_ids: Vec<BookId>,
    pub books: Vec<BookRef>,
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_ref(id: i64, price: Option<i64>) -> BookRef {
        BookRef {
            id: BookId::new(id),
            title: format!("Book {id}"),
            price: price.map(Price::from_dinars),
        }
    }

    #[test]
    fn test_books_total() {
        let mut pack = Pack {
            id: PackId::new(1),
            name: "Classics".to_string(),
            description: None,
            price: Price::from_dinars(2500),
            book_ids: vec![BookId::new(1), BookId::new(2)],
            books: vec![book_ref(1, Some(1500)), book_ref(2, Some(1800))],
            image: None,
        };
        assert_eq!(pack.books_total(), Some(Price::from_dinars(3300)));

        pack.books.push(book_ref(3, None));
        assert_eq!(pack.books_total(), None);
    }
}
