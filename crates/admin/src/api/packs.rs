//! Book packs.

use tracing::instrument;

use bookshelf_core::PackId;
use bookshelf_core::forms::{PackForm, Validate};

use super::conversions::pack_from_wire;
use super::wire::{PackDto, PackPayload};
use super::{ApiClient, ApiError, ApiRequest, ListQuery, Listing, MultipartPayload, require_id};
use crate::models::Pack;

impl ApiClient {
    /// List packs.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_packs(&self, query: &ListQuery) -> Result<Listing<Pack>, ApiError> {
        let listing: Listing<PackDto> = self
            .fetch_listing(ApiRequest::get("/api/book-packs").list_query(query))
            .await?;
        let urls = self.asset_urls();
        Ok(listing.map(|dto| pack_from_wire(dto, &urls)))
    }

    /// Fetch one pack.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the pack does not exist.
    #[instrument(skip(self))]
    pub async fn get_pack(&self, id: PackId) -> Result<Pack, ApiError> {
        let dto: PackDto = self
            .fetch_json(ApiRequest::get(format!("/api/book-packs/{id}")))
            .await?;
        Ok(pack_from_wire(dto, &self.asset_urls()))
    }

    /// Create a pack with its cover.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` without sending anything if the form does
    /// not validate (fewer than two books, no cover, ...).
    #[instrument(skip(self, form), fields(name = %form.name, books = form.book_ids.len()))]
    pub async fn create_pack(&self, form: &PackForm) -> Result<Pack, ApiError> {
        form.check()?;
        let request = ApiRequest::post("/api/book-packs").multipart(pack_payload(form)?);
        let dto: PackDto = self.fetch_json(request).await?;
        tracing::info!(pack_id = %dto.id, "Pack created");
        Ok(pack_from_wire(dto, &self.asset_urls()))
    }

    /// Update a pack.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` if the form does not validate or has no id.
    #[instrument(skip(self, form), fields(pack_id = ?form.id))]
    pub async fn update_pack(&self, form: &PackForm) -> Result<Pack, ApiError> {
        form.check()?;
        let id = require_id(form.id)?;
        let request =
            ApiRequest::put(format!("/api/book-packs/{id}")).multipart(pack_payload(form)?);
        let dto: PackDto = self.fetch_json(request).await?;
        Ok(pack_from_wire(dto, &self.asset_urls()))
    }

    /// Delete a pack.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend refuses.
    #[instrument(skip(self))]
    pub async fn delete_pack(&self, id: PackId) -> Result<(), ApiError> {
        self.fetch_empty(ApiRequest::delete(format!("/api/book-packs/{id}")))
            .await?;
        tracing::info!(pack_id = %id, "Pack deleted");
        Ok(())
    }

    /// Cache-busted cover URL for a pack.
    #[must_use]
    pub fn pack_cover_url(&self, id: PackId) -> String {
        self.asset_urls().pack_cover(id)
    }
}

fn pack_payload(form: &PackForm) -> Result<MultipartPayload, ApiError> {
    Ok(MultipartPayload::new()
        .json("pack", &PackPayload::from(form))?
        .file_opt("cover", form.cover.upload()))
}
