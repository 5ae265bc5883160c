use crate::types::{BookId, PackId, Price};

use super::{FieldErrors, ImageSelection, Validate, is_blank};

/// Fewest books a pack may bundle.
pub const MIN_PACK_BOOKS: usize = 2;

/// Pack create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackForm {
    /// `Some` when editing an existing pack.
    pub id: Option<PackId>,
    pub name: String,
    pub description: String,
    pub price: Option<Price>,
    pub book_ids: Vec<BookId>,
    pub cover: ImageSelection,
}

impl PackForm {
    /// Add a book to the selection, ignoring duplicates.
    pub fn select_book(&mut self, id: BookId) {
        if !self.book_ids.contains(&id) {
            self.book_ids.push(id);
        }
    }

    /// Remove a book from the selection.
    pub fn deselect_book(&mut self, id: BookId) {
        self.book_ids.retain(|selected| *selected != id);
    }
}

impl Validate for PackForm {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if is_blank(&self.name) {
            errors.add("name", "Pack name is required");
        }

        match self.price {
            None => errors.add("price", "Price is required"),
            Some(price) if !price.is_positive() => {
                errors.add("price", "Price must be greater than 0");
            }
            Some(_) => {}
        }

        if self.book_ids.len() < MIN_PACK_BOOKS {
            errors.add("books", format!("Minimum {MIN_PACK_BOOKS} books per pack"));
        }

        if self.id.is_none() && !self.cover.is_present() {
            errors.add("cover", "Cover image is required");
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack_with_books(count: i64) -> PackForm {
        PackForm {
            id: Some(PackId::new(1)),
            name: "Summer reads".to_string(),
            price: Some(Price::from_dinars(2500)),
            book_ids: (1..=count).map(BookId::new).collect(),
            cover: ImageSelection::Existing("http://localhost:8080/api/book-packs/1/cover".into()),
            ..PackForm::default()
        }
    }

    #[test]
    fn test_single_book_fails_minimum() {
        let errors = pack_with_books(1).validate();
        let message = errors.get("books").unwrap_or_default();
        assert!(message.contains("Minimum 2 books"), "got {message:?}");
    }

    #[test]
    fn test_two_books_pass() {
        assert!(pack_with_books(2).validate().is_empty());
    }

    #[test]
    fn test_no_upper_bound_on_books() {
        assert!(pack_with_books(25).validate().is_empty());
    }

    #[test]
    fn test_select_book_ignores_duplicates() {
        let mut form = pack_with_books(0);
        form.select_book(BookId::new(4));
        form.select_book(BookId::new(4));
        form.select_book(BookId::new(5));
        assert_eq!(form.book_ids, vec![BookId::new(4), BookId::new(5)]);

        form.deselect_book(BookId::new(4));
        assert_eq!(form.book_ids, vec![BookId::new(5)]);
        assert!(form.validate().has("books"));
    }

    #[test]
    fn test_new_pack_requires_cover() {
        let form = PackForm {
            id: None,
            cover: ImageSelection::Empty,
            ..pack_with_books(2)
        };
        assert!(form.validate().has("cover"));
    }
}
