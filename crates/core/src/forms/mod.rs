//! Pre-submission validation for admin forms.
//!
//! Every form is a plain struct holding the current input state. Validation
//! is a pure function from that state to a [`FieldErrors`] map; a form may be
//! submitted only when the map is empty. Nothing here talks to the server.
//!
//! Field keys are the backend's camelCase names (`stockQuantity`, not
//! `stock_quantity`) so server-side errors and client-side errors can be
//! displayed by the same lookup.

mod author;
mod book;
mod contact;
mod order;
mod pack;
mod password;
mod profile;
mod section;

pub use author::AuthorForm;
pub use book::BookForm;
pub use contact::ContactForm;
pub use order::{OrderForm, OrderLine, OrderLineItem};
pub use pack::{MIN_PACK_BOOKS, PackForm};
pub use password::{MIN_PASSWORD_LENGTH, PasswordForm};
pub use profile::ProfileForm;
pub use section::{MAX_SECTION_BOOKS, SectionForm};

use core::fmt;
use std::collections::BTreeMap;

use serde::Serialize;

/// Field name -> message for every rule the form currently breaks.
///
/// Only the first message recorded for a field is kept, so validators list
/// their rules from most to least fundamental.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// An empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless the field already has one.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether `field` has an error.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// `Ok(())` when empty, otherwise the errors themselves.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field is invalid.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// A form that can check itself before submission.
pub trait Validate {
    /// Every broken rule, keyed by field. Empty means the form may be submitted.
    fn validate(&self) -> FieldErrors;

    /// Convenience wrapper around [`Validate::validate`].
    ///
    /// # Errors
    ///
    /// Returns the field errors when the form is not submittable.
    fn check(&self) -> Result<(), FieldErrors> {
        self.validate().into_result()
    }
}

/// A binary file picked by the administrator.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    /// Original file name, sent as the multipart part's filename.
    pub file_name: String,
    /// MIME type, e.g. `image/jpeg`.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Create an upload.
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// State of an image field (book cover, pack cover, section image, picture).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageSelection {
    /// Nothing picked and nothing stored.
    #[default]
    Empty,
    /// The record already has an image at this URL; keep it.
    Existing(String),
    /// A new file was picked and must be uploaded.
    New(Upload),
}

impl ImageSelection {
    /// Whether the record will have an image after submission.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        !matches!(self, Self::Empty)
    }

    /// The file to upload, if a new one was picked.
    #[must_use]
    pub const fn upload(&self) -> Option<&Upload> {
        match self {
            Self::New(upload) => Some(upload),
            Self::Empty | Self::Existing(_) => None,
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Algerian phone numbers: ten digits starting with 05, 06 or 07.
/// Spaces and dashes are ignored.
fn is_mobile_number(value: &str) -> bool {
    let digits: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();
    digits.len() == 10
        && digits.chars().all(|c| c.is_ascii_digit())
        && ["05", "06", "07"].iter().any(|p| digits.starts_with(p))
}
