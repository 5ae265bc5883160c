//! Requests described as data, before any header is attached.

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use rust_decimal::Decimal;
use serde::Serialize;

use bookshelf_core::forms::Upload;
use bookshelf_core::{AuthorId, CategoryId, Language, OrderStatus};

/// Request payload.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartPayload),
}

impl RequestBody {
    #[must_use]
    pub const fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PartContent {
    Json(String),
    File(Upload),
}

/// A multipart body: named JSON metadata parts and file parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartPayload {
    parts: Vec<(String, PartContent)>,
}

impl MultipartPayload {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` as a JSON part named `name`.
    ///
    /// # Errors
    ///
    /// Returns the serialization error if `value` cannot be encoded.
    pub fn json<T: Serialize>(mut self, name: &str, value: &T) -> Result<Self, serde_json::Error> {
        let json = serde_json::to_string(value)?;
        self.parts.push((name.to_string(), PartContent::Json(json)));
        Ok(self)
    }

    /// Add a file part named `name`.
    #[must_use]
    pub fn file(mut self, name: &str, upload: &Upload) -> Self {
        self.parts
            .push((name.to_string(), PartContent::File(upload.clone())));
        self
    }

    /// Add a file part only when an upload is present.
    #[must_use]
    pub fn file_opt(self, name: &str, upload: Option<&Upload>) -> Self {
        match upload {
            Some(upload) => self.file(name, upload),
            None => self,
        }
    }

    /// Part names in insertion order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(name, _)| name.as_str())
    }

    /// Whether any part carries a file.
    #[must_use]
    pub fn has_file(&self) -> bool {
        self.parts
            .iter()
            .any(|(_, content)| matches!(content, PartContent::File(_)))
    }

    /// The JSON text of part `name`, if it is a JSON part.
    #[must_use]
    pub fn json_part(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(n, content)| match content {
            PartContent::Json(json) if n == name => Some(json.as_str()),
            _ => None,
        })
    }

    /// Build the reqwest form. reqwest picks the boundary and sets the
    /// `multipart/form-data` content type itself.
    pub(crate) fn into_form(self) -> Result<Form, reqwest::Error> {
        let mut form = Form::new();
        for (name, content) in self.parts {
            let part = match content {
                PartContent::Json(json) => Part::text(json).mime_str("application/json")?,
                PartContent::File(upload) => Part::bytes(upload.bytes)
                    .file_name(upload.file_name)
                    .mime_str(&upload.content_type)?,
            };
            form = form.part(name, part);
        }
        Ok(form)
    }
}

/// One API call: method, path relative to the base URL, query and body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append one query parameter.
    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append every option set in `list`.
    #[must_use]
    pub fn list_query(mut self, list: &ListQuery) -> Self {
        self.query.extend(
            list.to_pairs()
                .into_iter()
                .map(|(key, value)| (key.to_string(), value)),
        );
        self
    }

    /// Serialize `value` as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns the serialization error if `value` cannot be encoded.
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.body = RequestBody::Json(serde_json::to_value(value)?);
        Ok(self)
    }

    #[must_use]
    pub fn multipart(mut self, payload: MultipartPayload) -> Self {
        self.body = RequestBody::Multipart(payload);
        self
    }

    /// POST, PUT, PATCH and DELETE change server state.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        matches!(
            self.method,
            Method::POST | Method::PUT | Method::PATCH | Method::DELETE
        )
    }
}

/// List options recognised by the backend. Unset options are left out of
/// the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// 0-indexed page number.
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub category_id: Option<CategoryId>,
    pub author_id: Option<AuthorId>,
    pub language: Option<Language>,
    /// Backend sort expression, e.g. `price,desc`.
    pub sort: Option<String>,
    pub status: Option<OrderStatus>,
}

impl ListQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// First page of `size` items.
    #[must_use]
    pub fn paged(page: u32, size: u32) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.trim().is_empty()).then_some(term);
        self
    }

    #[must_use]
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// `(backend name, value)` for every set option.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(value) = value {
                pairs.push((key, value));
            }
        };

        push("page", self.page.map(|v| v.to_string()));
        push("size", self.size.map(|v| v.to_string()));
        push("search", self.search.clone());
        push("minPrice", self.min_price.map(|v| v.to_string()));
        push("maxPrice", self.max_price.map(|v| v.to_string()));
        push("categoryId", self.category_id.map(|v| v.to_string()));
        push("authorId", self.author_id.map(|v| v.to_string()));
        push("language", self.language.map(|v| v.as_str().to_string()));
        push("sort", self.sort.clone());
        push("status", self.status.map(|v| v.as_str().to_string()));

        pairs
    }
}
