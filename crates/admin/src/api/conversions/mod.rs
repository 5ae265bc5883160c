//! Mappings between wire records, UI records and forms.
//!
//! Each resource has one bidirectional mapping here: wire -> UI when
//! reading, form -> wire when writing, and UI -> form to prefill an edit
//! screen. None of them touch the network.

mod catalog;
mod orders;
mod profile;

pub use catalog::{book_from_wire, pack_from_wire, section_from_wire};
pub use orders::order_from_wire;
pub use profile::profile_from_wire;

/// Builds asset URLs against the backend origin.
///
/// Cover and image URLs carry a `t` query parameter so a replaced image is
/// not served from cache. The stamp is fixed per instance; the client takes
/// the current time in milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct AssetUrls<'a> {
    origin: &'a str,
    stamp: i64,
}

impl<'a> AssetUrls<'a> {
    #[must_use]
    pub const fn new(origin: &'a str, stamp: i64) -> Self {
        Self { origin, stamp }
    }

    #[must_use]
    pub fn book_cover(&self, id: bookshelf_core::BookId) -> String {
        self.stamped(&format!("/api/books/{id}/cover"))
    }

    #[must_use]
    pub fn pack_cover(&self, id: bookshelf_core::PackId) -> String {
        self.stamped(&format!("/api/book-packs/{id}/cover"))
    }

    #[must_use]
    pub fn section_image(&self, id: bookshelf_core::TagId) -> String {
        self.stamped(&format!("/api/tags/{id}/image"))
    }

    #[must_use]
    pub fn profile_picture(&self) -> String {
        self.stamped("/api/admin/profile/picture")
    }

    fn stamped(&self, path: &str) -> String {
        format!("{}{path}?t={}", self.origin, self.stamp)
    }
}

/// Empty or whitespace-only text becomes `None`.
fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
