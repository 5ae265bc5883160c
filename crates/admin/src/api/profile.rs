//! The signed-in administrator's own profile.

use tracing::instrument;

use bookshelf_core::forms::{PasswordForm, ProfileForm, Validate};

use super::conversions::profile_from_wire;
use super::wire::{AdminProfileDto, PasswordPayload, ProfilePayload};
use super::{ApiClient, ApiError, ApiRequest, MultipartPayload};
use crate::models::AdminProfile;

impl ApiClient {
    /// Fetch the profile and cache it in the session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the session cannot be
    /// written.
    #[instrument(skip(self))]
    pub async fn get_profile(&self) -> Result<AdminProfile, ApiError> {
        let dto: AdminProfileDto = self
            .fetch_json(ApiRequest::get("/api/admin/profile"))
            .await?;
        let profile = profile_from_wire(dto, &self.asset_urls());
        self.session().set_admin_profile(profile.clone())?;
        Ok(profile)
    }

    /// Update the profile, uploading a new picture if one was picked.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` without sending anything if the form does
    /// not validate.
    #[instrument(skip(self, form))]
    pub async fn update_profile(&self, form: &ProfileForm) -> Result<AdminProfile, ApiError> {
        form.check()?;
        let payload = MultipartPayload::new()
            .json("profile", &ProfilePayload::from(form))?
            .file_opt("picture", form.picture.upload());
        let dto: AdminProfileDto = self
            .fetch_json(ApiRequest::put("/api/admin/profile").multipart(payload))
            .await?;
        let profile = profile_from_wire(dto, &self.asset_urls());
        self.session().set_admin_profile(profile.clone())?;
        tracing::info!(username = %profile.username, "Profile updated");
        Ok(profile)
    }

    /// Cache-busted URL of the profile picture.
    #[must_use]
    pub fn profile_picture_url(&self) -> String {
        self.asset_urls().profile_picture()
    }

    /// Change the password. The session stays valid.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` without sending anything if the form does
    /// not validate, or `ApiError::Api` if the current password is wrong.
    #[instrument(skip(self, form))]
    pub async fn change_password(&self, form: &PasswordForm) -> Result<(), ApiError> {
        form.check()?;
        let request =
            ApiRequest::put("/api/admin/profile/password").json(&PasswordPayload::from(form))?;
        self.fetch_empty(request).await?;
        tracing::info!("Password changed");
        Ok(())
    }
}
