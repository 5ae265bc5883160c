use crate::types::{AuthorId, BookId, CategoryId, Language, Price, TagId};

use super::{FieldErrors, ImageSelection, Validate, is_blank};

/// Book create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    /// `Some` when editing an existing book.
    pub id: Option<BookId>,
    pub title: String,
    pub author_id: Option<AuthorId>,
    pub price: Option<Price>,
    pub stock_quantity: Option<i32>,
    pub language: Option<Language>,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub tag_ids: Vec<TagId>,
    pub cover: ImageSelection,
}

impl BookForm {
    /// Whether the form edits an existing book rather than creating one.
    #[must_use]
    pub const fn is_edit(&self) -> bool {
        self.id.is_some()
    }
}

impl Validate for BookForm {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if is_blank(&self.title) {
            errors.add("title", "Title is required");
        }

        match self.price {
            None => errors.add("price", "Price is required"),
            Some(price) if !price.is_positive() => {
                errors.add("price", "Price must be greater than 0");
            }
            Some(_) => {}
        }

        match self.stock_quantity {
            None => errors.add("stockQuantity", "Stock quantity is required"),
            Some(quantity) if quantity < 0 => {
                errors.add("stockQuantity", "Stock quantity cannot be negative");
            }
            Some(_) => {}
        }

        if self.language.is_none() {
            errors.add("language", "Language is required");
        }

        // An edited book keeps its stored cover unless a new one is picked.
        if !self.is_edit() && !self.cover.is_present() {
            errors.add("cover", "Cover image is required");
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::Upload;

    fn editing_existing_book() -> BookForm {
        BookForm {
            id: Some(BookId::new(12)),
            title: "Test".to_string(),
            price: Some(Price::from_dinars(1500)),
            stock_quantity: Some(3),
            language: Some(Language::French),
            cover: ImageSelection::Existing("http://localhost:8080/api/books/12/cover".into()),
            ..BookForm::default()
        }
    }

    #[test]
    fn test_edit_without_new_cover_passes() {
        let form = editing_existing_book();
        assert!(form.validate().is_empty());
        assert!(form.check().is_ok());
    }

    #[test]
    fn test_missing_title_blocks_submission() {
        let form = BookForm {
            title: String::new(),
            ..editing_existing_book()
        };
        let errors = form.validate();
        assert_eq!(errors.get("title"), Some("Title is required"));
        assert_eq!(errors.len(), 1);
        assert!(form.check().is_err());
    }

    #[test]
    fn test_whitespace_title_is_blank() {
        let form = BookForm {
            title: "   ".to_string(),
            ..editing_existing_book()
        };
        assert!(form.validate().has("title"));
    }

    #[test]
    fn test_create_requires_cover() {
        let form = BookForm {
            id: None,
            cover: ImageSelection::Empty,
            ..editing_existing_book()
        };
        assert_eq!(form.validate().get("cover"), Some("Cover image is required"));

        let form = BookForm {
            id: None,
            cover: ImageSelection::New(Upload::new("c.png", "image/png", vec![1])),
            ..editing_existing_book()
        };
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_numeric_ranges() {
        let form = BookForm {
            price: Some(Price::ZERO),
            stock_quantity: Some(-1),
            ..editing_existing_book()
        };
        let errors = form.validate();
        assert_eq!(errors.get("price"), Some("Price must be greater than 0"));
        assert_eq!(
            errors.get("stockQuantity"),
            Some("Stock quantity cannot be negative")
        );
    }

    #[test]
    fn test_empty_form_reports_every_required_field() {
        let errors = BookForm::default().validate();
        for field in ["title", "price", "stockQuantity", "language", "cover"] {
            assert!(errors.has(field), "missing error for {field}");
        }
        assert!(!errors.has("author"));
    }
}
