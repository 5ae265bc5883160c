//! Login and logout.

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use super::conversions::profile_from_wire;
use super::wire::{LoginPayload, LoginResponse};
use super::{ApiClient, ApiError, ApiRequest};

impl ApiClient {
    /// Exchange credentials for a bearer token and store it in the session.
    ///
    /// Runs from the login page, so a 401 comes back as `ApiError::Api`
    /// rather than a redirect when the navigator is there.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` on bad credentials, or `ApiError::Session` if
    /// the token cannot be persisted.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), ApiError> {
        let payload = LoginPayload {
            username: username.trim(),
            password: password.expose_secret(),
        };
        let response: LoginResponse = self
            .fetch_json(ApiRequest::post("/api/auth/login").json(&payload)?)
            .await?;

        let session = self.session();
        session.set_token(SecretString::from(response.token))?;
        if let Some(admin) = response.admin {
            session.set_admin_profile(profile_from_wire(admin, &self.asset_urls()))?;
        }
        tracing::info!(%username, "Logged in");
        Ok(())
    }

    /// Forget the token and cached profile. The backend keeps no session to
    /// revoke.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Session` if the session file cannot be cleared.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), ApiError> {
        self.session().clear()?;
        tracing::info!("Logged out");
        Ok(())
    }
}
