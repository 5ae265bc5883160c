//! Public storefront contact form.

use tracing::instrument;

use bookshelf_core::forms::{ContactForm, Validate};

use super::wire::ContactPayload;
use super::{ApiClient, ApiError, ApiRequest};

impl ApiClient {
    /// Send a storefront contact message. Public and CSRF-exempt.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` without sending anything if the form does
    /// not validate.
    #[instrument(skip(self, form), fields(subject = %form.subject))]
    pub async fn submit_contact(&self, form: &ContactForm) -> Result<(), ApiError> {
        form.check()?;
        let request = ApiRequest::post("/api/contact").json(&ContactPayload::from(form))?;
        self.fetch_empty(request).await?;
        tracing::info!("Contact message sent");
        Ok(())
    }
}
