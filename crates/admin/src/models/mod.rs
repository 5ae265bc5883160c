//! UI-facing records.
//!
//! These carry the vocabulary screens work with (`name` and `image` for a
//! pack, `title` for a section) rather than the backend's field names. They
//! are produced from wire records by [`crate::api::conversions`] and never
//! deserialized from backend JSON directly.

mod catalog;
mod order;
mod profile;

pub use catalog::{Author, Book, BookRef, Pack, Section, TagRef};
pub use order::{Customer, Order, OrderItem, Shipping};
pub use profile::{AdminProfile, DashboardStats, SalesPoint};
