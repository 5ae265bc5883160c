//! Authors.

use tracing::instrument;

use bookshelf_core::AuthorId;
use bookshelf_core::forms::{AuthorForm, Validate};

use super::wire::{AuthorDto, AuthorPayload};
use super::{ApiClient, ApiError, ApiRequest, ListQuery, Listing, require_id};
use crate::models::Author;

impl ApiClient {
    /// List authors.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_authors(&self, query: &ListQuery) -> Result<Listing<Author>, ApiError> {
        let listing: Listing<AuthorDto> = self
            .fetch_listing(ApiRequest::get("/api/authors").list_query(query))
            .await?;
        Ok(listing.map(Author::from))
    }

    /// Fetch one author.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the author does not exist.
    #[instrument(skip(self))]
    pub async fn get_author(&self, id: AuthorId) -> Result<Author, ApiError> {
        let dto: AuthorDto = self
            .fetch_json(ApiRequest::get(format!("/api/authors/{id}")))
            .await?;
        Ok(dto.into())
    }

    /// Create an author.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` without sending anything if the form does
    /// not validate.
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn create_author(&self, form: &AuthorForm) -> Result<Author, ApiError> {
        form.check()?;
        let request = ApiRequest::post("/api/authors").json(&AuthorPayload::from(form))?;
        let dto: AuthorDto = self.fetch_json(request).await?;
        tracing::info!(author_id = %dto.id, "Author created");
        Ok(dto.into())
    }

    /// Update an existing author. The form must carry the author's id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` if the form does not validate or has no id.
    #[instrument(skip(self, form), fields(author_id = ?form.id))]
    pub async fn update_author(&self, form: &AuthorForm) -> Result<Author, ApiError> {
        form.check()?;
        let id = require_id(form.id)?;
        let request =
            ApiRequest::put(format!("/api/authors/{id}")).json(&AuthorPayload::from(form))?;
        let dto: AuthorDto = self.fetch_json(request).await?;
        Ok(dto.into())
    }

    /// Delete an author.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend refuses, e.g. the author still has
    /// books.
    #[instrument(skip(self))]
    pub async fn delete_author(&self, id: AuthorId) -> Result<(), ApiError> {
        self.fetch_empty(ApiRequest::delete(format!("/api/authors/{id}")))
            .await?;
        tracing::info!(author_id = %id, "Author deleted");
        Ok(())
    }
}

