//! Books, their covers and their tags.

use tracing::instrument;

use bookshelf_core::forms::{BookForm, Validate};
use bookshelf_core::{BookId, TagId};

use super::conversions::book_from_wire;
use super::wire::{BookDto, BookPayload};
use super::{ApiClient, ApiError, ApiRequest, ListQuery, Listing, MultipartPayload, require_id};
use crate::models::Book;

impl ApiClient {
    /// List books matching `query`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_books(&self, query: &ListQuery) -> Result<Listing<Book>, ApiError> {
        let listing: Listing<BookDto> = self
            .fetch_listing(ApiRequest::get("/api/books").list_query(query))
            .await?;
        let urls = self.asset_urls();
        Ok(listing.map(|dto| book_from_wire(dto, &urls)))
    }

    /// Fetch one book.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the book does not exist.
    #[instrument(skip(self))]
    pub async fn get_book(&self, id: BookId) -> Result<Book, ApiError> {
        let dto: BookDto = self
            .fetch_json(ApiRequest::get(format!("/api/books/{id}")))
            .await?;
        Ok(book_from_wire(dto, &self.asset_urls()))
    }

    /// Create a book, uploading its cover.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` without sending anything if the form does
    /// not validate.
    #[instrument(skip(self, form), fields(title = %form.title))]
    pub async fn create_book(&self, form: &BookForm) -> Result<Book, ApiError> {
        form.check()?;
        let request = ApiRequest::post("/api/books").multipart(book_payload(form)?);
        let dto: BookDto = self.fetch_json(request).await?;
        tracing::info!(book_id = %dto.id, "Book created");
        Ok(book_from_wire(dto, &self.asset_urls()))
    }

    /// Update a book. The cover is replaced only if a new file was picked.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` if the form does not validate or has no id.
    #[instrument(skip(self, form), fields(book_id = ?form.id))]
    pub async fn update_book(&self, form: &BookForm) -> Result<Book, ApiError> {
        form.check()?;
        let id = require_id(form.id)?;
        let request = ApiRequest::put(format!("/api/books/{id}")).multipart(book_payload(form)?);
        let dto: BookDto = self.fetch_json(request).await?;
        Ok(book_from_wire(dto, &self.asset_urls()))
    }

    /// Delete a book.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend refuses.
    #[instrument(skip(self))]
    pub async fn delete_book(&self, id: BookId) -> Result<(), ApiError> {
        self.fetch_empty(ApiRequest::delete(format!("/api/books/{id}")))
            .await?;
        tracing::info!(book_id = %id, "Book deleted");
        Ok(())
    }

    /// Cache-busted cover URL for a book.
    #[must_use]
    pub fn book_cover_url(&self, id: BookId) -> String {
        self.asset_urls().book_cover(id)
    }

    /// Attach tags to a book.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn add_book_tags(&self, id: BookId, tags: &[TagId]) -> Result<(), ApiError> {
        let request = ApiRequest::post(format!("/api/books/{id}/tags")).json(&tags)?;
        self.fetch_empty(request).await
    }

    /// Detach tags from a book.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn remove_book_tags(&self, id: BookId, tags: &[TagId]) -> Result<(), ApiError> {
        let request = ApiRequest::delete(format!("/api/books/{id}/tags")).json(&tags)?;
        self.fetch_empty(request).await
    }
}

/// `book` JSON part, plus `cover` when a new file was picked.
fn book_payload(form: &BookForm) -> Result<MultipartPayload, ApiError> {
    Ok(MultipartPayload::new()
        .json("book", &BookPayload::from(form))?
        .file_opt("cover", form.cover.upload()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bookshelf_core::forms::{ImageSelection, Upload};
    use bookshelf_core::{Language, Price};

    use super::*;

    fn form(cover: ImageSelection) -> BookForm {
        BookForm {
            id: Some(BookId::new(12)),
            title: "Test".to_string(),
            price: Some(Price::from_dinars(1500)),
            stock_quantity: Some(3),
            language: Some(Language::French),
            cover,
            ..BookForm::default()
        }
    }

    #[test]
    fn test_existing_cover_sends_metadata_only() {
        let payload = book_payload(&form(ImageSelection::Existing(
            "http://localhost:8080/api/books/12/cover".into(),
        )))
        .unwrap();
        assert_eq!(payload.part_names().collect::<Vec<_>>(), ["book"]);
    }

    #[test]
    fn test_new_cover_adds_file_part() {
        let upload = Upload::new("cover.png", "image/png", vec![1, 2, 3]);
        let payload = book_payload(&form(ImageSelection::New(upload))).unwrap();
        assert_eq!(payload.part_names().collect::<Vec<_>>(), ["book", "cover"]);

        let json: serde_json::Value =
            serde_json::from_str(payload.json_part("book").unwrap()).unwrap();
        assert_eq!(json["title"], "Test");
        assert_eq!(json["stockQuantity"], 3);
    }
}
