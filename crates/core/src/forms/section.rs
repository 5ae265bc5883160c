use crate::types::{BookId, TagId};

use super::{FieldErrors, ImageSelection, Validate, is_blank};

/// Most books a storefront section can show.
pub const MAX_SECTION_BOOKS: usize = 9;

/// Main display section create/edit form. Sections are stored as tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionForm {
    /// `Some` when editing an existing section.
    pub id: Option<TagId>,
    pub title: String,
    pub description: String,
    /// Position on the home page, 0 first.
    pub display_order: i32,
    pub book_ids: Vec<BookId>,
    /// Optional banner image.
    pub image: ImageSelection,
}

impl Validate for SectionForm {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if is_blank(&self.title) {
            errors.add("title", "Section title is required");
        }

        if self.display_order < 0 {
            errors.add("displayOrder", "Display order cannot be negative");
        }

        if self.book_ids.is_empty() {
            errors.add("books", "Select at least one book");
        } else if self.book_ids.len() > MAX_SECTION_BOOKS {
            errors.add(
                "books",
                format!("A section shows at most {MAX_SECTION_BOOKS} books"),
            );
        }

        errors
    }
}
