//! List responses, paginated or not.
//!
//! Some endpoints answer with a page object (`content` plus page metadata),
//! others with a bare array. [`Listing`] keeps whichever shape arrived:
//! mapping transforms the items and leaves every other page field as is.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::ApiError;

/// A page of items plus the backend's pagination fields, untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    /// `totalElements`, `totalPages`, `number`, `size`, ... as received.
    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

/// Normalized list response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Paginated(Page<T>),
    Bare(Vec<T>),
}

impl<T: DeserializeOwned> Listing<T> {
    /// Classify a list response.
    ///
    /// - an array is a bare listing;
    /// - an object whose `content` is an array is a page;
    /// - any other object is taken as a single item.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Json` if an item does not deserialize, or
    /// `ApiError::Parse` if the value is neither an array nor an object.
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        match value {
            Value::Array(items) => Ok(Self::Bare(decode_items(items)?)),
            Value::Object(mut map) if map.get("content").is_some_and(Value::is_array) => {
                let Some(Value::Array(items)) = map.remove("content") else {
                    return Err(ApiError::Parse("page content vanished".to_string()));
                };
                Ok(Self::Paginated(Page {
                    content: decode_items(items)?,
                    meta: map,
                }))
            }
            Value::Object(map) => Ok(Self::Bare(vec![serde_json::from_value(Value::Object(
                map,
            ))?])),
            other => Err(ApiError::Parse(format!(
                "expected a list or a page, got {}",
                json_kind(&other)
            ))),
        }
    }
}

impl<T> Listing<T> {
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Paginated(page) => &page.content,
            Self::Bare(items) => items,
        }
    }

    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Paginated(page) => page.content,
            Self::Bare(items) => items,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    #[must_use]
    pub const fn is_paginated(&self) -> bool {
        matches!(self, Self::Paginated(_))
    }

    /// Transform the items, keeping the shape and page fields.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Listing<U> {
        match self {
            Self::Paginated(page) => Listing::Paginated(Page {
                content: page.content.into_iter().map(f).collect(),
                meta: page.meta,
            }),
            Self::Bare(items) => Listing::Bare(items.into_iter().map(f).collect()),
        }
    }

    /// Fallible [`Listing::map`]: the first error wins.
    ///
    /// # Errors
    ///
    /// Returns the first error `f` produces.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Listing<U>, E> {
        Ok(match self {
            Self::Paginated(page) => Listing::Paginated(Page {
                content: page.content.into_iter().map(f).collect::<Result<_, _>>()?,
                meta: page.meta,
            }),
            Self::Bare(items) => Listing::Bare(items.into_iter().map(f).collect::<Result<_, _>>()?),
        })
    }

    /// Total number of items across pages; the item count when unpaginated.
    #[must_use]
    pub fn total_elements(&self) -> u64 {
        self.meta_u64("totalElements")
            .unwrap_or_else(|| self.len() as u64)
    }

    /// Number of pages; 1 when unpaginated.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.meta_u64("totalPages").unwrap_or(1)
    }

    /// 0-indexed page number; 0 when unpaginated.
    #[must_use]
    pub fn page_number(&self) -> u64 {
        self.meta_u64("number").unwrap_or(0)
    }

    fn meta_u64(&self, key: &str) -> Option<u64> {
        match self {
            Self::Paginated(page) => page.meta.get(key).and_then(Value::as_u64),
            Self::Bare(_) => None,
        }
    }
}

fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>, ApiError> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(ApiError::from))
        .collect()
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
