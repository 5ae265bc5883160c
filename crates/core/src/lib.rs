//! Bookshelf Core - Shared types library.
//!
//! This crate provides the types shared by every Bookshelf component:
//! - `admin` - Authenticated client for the bookstore REST backend
//! - `cli` - Command-line front end for administrators
//!
//! # Architecture
//!
//! The core crate contains only types, validators and state machines - no I/O,
//! no HTTP clients, no storage. Everything here can be unit tested without a
//! runtime.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails and backend enums
//! - [`forms`] - Pre-submission validation for every admin form
//! - [`carousel`] - Scroll state for the section and pack preview strips

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod carousel;
pub mod forms;
pub mod types;

pub use forms::{FieldErrors, ImageSelection, Upload, Validate};
pub use types::*;
