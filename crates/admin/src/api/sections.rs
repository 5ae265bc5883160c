//! Home page sections, stored by the backend as main display tags.

use tracing::instrument;

use bookshelf_core::forms::{SectionForm, Validate};
use bookshelf_core::{BookId, TagId};

use super::conversions::section_from_wire;
use super::wire::{TagDto, TagPayload};
use super::{ApiClient, ApiError, ApiRequest, ListQuery, Listing, MultipartPayload, require_id};
use crate::models::Section;

impl ApiClient {
    /// List every tag, main display or not.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_sections(&self, query: &ListQuery) -> Result<Listing<Section>, ApiError> {
        let listing: Listing<TagDto> = self
            .fetch_listing(ApiRequest::get("/api/tags").list_query(query))
            .await?;
        let urls = self.asset_urls();
        Ok(listing.map(|dto| section_from_wire(dto, &urls)))
    }

    /// The sections shown on the storefront home page, in display order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn main_display_sections(&self) -> Result<Vec<Section>, ApiError> {
        let listing: Listing<TagDto> = self
            .fetch_listing(ApiRequest::get("/api/tags/main-display"))
            .await?;
        let urls = self.asset_urls();
        let mut sections: Vec<Section> = listing
            .into_items()
            .into_iter()
            .map(|dto| section_from_wire(dto, &urls))
            .collect();
        sections.sort_by_key(|section| section.display_order);
        Ok(sections)
    }

    /// Fetch one section.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the tag does not exist.
    #[instrument(skip(self))]
    pub async fn get_section(&self, id: TagId) -> Result<Section, ApiError> {
        let dto: TagDto = self
            .fetch_json(ApiRequest::get(format!("/api/tags/{id}")))
            .await?;
        Ok(section_from_wire(dto, &self.asset_urls()))
    }

    /// Create a section.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` without sending anything if the form does
    /// not validate.
    #[instrument(skip(self, form), fields(title = %form.title, books = form.book_ids.len()))]
    pub async fn create_section(&self, form: &SectionForm) -> Result<Section, ApiError> {
        form.check()?;
        let request = ApiRequest::post("/api/tags").multipart(section_payload(form)?);
        let dto: TagDto = self.fetch_json(request).await?;
        tracing::info!(tag_id = %dto.id, "Section created");
        Ok(section_from_wire(dto, &self.asset_urls()))
    }

    /// Update a section.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` if the form does not validate or has no id.
    #[instrument(skip(self, form), fields(tag_id = ?form.id))]
    pub async fn update_section(&self, form: &SectionForm) -> Result<Section, ApiError> {
        form.check()?;
        let id = require_id(form.id)?;
        let request = ApiRequest::put(format!("/api/tags/{id}")).multipart(section_payload(form)?);
        let dto: TagDto = self.fetch_json(request).await?;
        Ok(section_from_wire(dto, &self.asset_urls()))
    }

    /// Delete a section. Its books are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend refuses.
    #[instrument(skip(self))]
    pub async fn delete_section(&self, id: TagId) -> Result<(), ApiError> {
        self.fetch_empty(ApiRequest::delete(format!("/api/tags/{id}")))
            .await?;
        tracing::info!(tag_id = %id, "Section deleted");
        Ok(())
    }

    /// Add books to a section.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn add_section_books(&self, id: TagId, books: &[BookId]) -> Result<(), ApiError> {
        let request = ApiRequest::post(format!("/api/tags/{id}/books")).json(&books)?;
        self.fetch_empty(request).await
    }

    /// Remove books from a section.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn remove_section_books(
        &self,
        id: TagId,
        books: &[BookId],
    ) -> Result<(), ApiError> {
        let request = ApiRequest::delete(format!("/api/tags/{id}/books")).json(&books)?;
        self.fetch_empty(request).await
    }

    #[must_use]
    pub fn section_image_url(&self, id: TagId) -> String {
        self.asset_urls().section_image(id)
    }
}

fn section_payload(form: &SectionForm) -> Result<MultipartPayload, ApiError> {
    Ok(MultipartPayload::new()
        .json("tag", &TagPayload::from(form))?
        .file_opt("image", form.image.upload()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bookshelf_core::forms::{ImageSelection, Upload};

    use super::*;

    #[test]
    fn test_section_payload_parts() {
        let mut form = SectionForm {
            title: "Nouveautés".to_string(),
            book_ids: vec![BookId::new(1), BookId::new(2)],
            ..SectionForm::default()
        };
        let payload = section_payload(&form).unwrap();
        assert_eq!(payload.part_names().collect::<Vec<_>>(), ["tag"]);

        form.image = ImageSelection::New(Upload::new("banner.jpg", "image/jpeg", vec![0xff]));
        let payload = section_payload(&form).unwrap();
        assert_eq!(payload.part_names().collect::<Vec<_>>(), ["tag", "image"]);

        let json: serde_json::Value =
            serde_json::from_str(payload.json_part("tag").unwrap()).unwrap();
        assert_eq!(json["name"], "Nouveautés");
        assert_eq!(json["mainDisplay"], true);
        assert_eq!(json["bookIds"], serde_json::json!([1, 2]));
    }
}
