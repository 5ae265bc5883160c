//! Bookshelf Admin library.
//!
//! Client side of the bookstore back office: one authenticated HTTP client
//! shared by every resource (authors, books, packs, sections, orders,
//! dashboard, profile), plus the session and navigation state it relies on.
//!
//! # Security
//!
//! The session holds the administrator's bearer token. It is kept in a
//! [`secrecy::SecretString`] and never printed. The session file is replaced
//! atomically and, on unix, is readable by its owner only.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod models;
pub mod navigation;
pub mod session;

pub use api::{ApiClient, ApiError, ApiRequest, Listing, ListQuery};
pub use config::{ApiConfig, BookshelfConfig, ConfigError};
pub use navigation::{Location, Navigator};
pub use session::{Session, SessionError};
