//! Authenticated client for the bookstore REST backend.
//!
//! # Architecture
//!
//! - One [`ApiClient`] per backend, shared by every resource module
//!   (`authors`, `books`, `packs`, ...), each of which is an `impl ApiClient`
//!   block. No resource module attaches headers itself.
//! - Requests are built as [`ApiRequest`] values. [`ApiClient::prepare`] is
//!   the request interceptor: it turns the request plus session state into
//!   the header set.
//! - The response interceptor turns 401/403 into a redirect to the login
//!   page (via [`Navigator`]) unless the user is already there.
//! - List endpoints are normalized into [`Listing`].
//! - Any call can be raced against a cancellation token with
//!   [`cancellable`], or made latest-wins with [`Supersede`].
//!
//! # Headers
//!
//! | Header | When |
//! |--------|------|
//! | `Authorization: Bearer <token>` | a token is stored in the session |
//! | `Content-Type: application/json` | the body is not multipart |
//! | `X-XSRF-TOKEN: <cookie>` | mutating method, `XSRF-TOKEN` cookie present, endpoint not exempt |

mod auth;
mod authors;
mod books;
mod cancel;
mod contact;
pub mod conversions;
mod dashboard;
mod listing;
mod orders;
mod packs;
mod profile;
mod request;
mod sections;
pub mod wire;

pub use cancel::{Supersede, cancellable};
pub use listing::{Listing, Page};
pub use orders::DeliveryFeeQuery;
pub use request::{ApiRequest, ListQuery, MultipartPayload, RequestBody};

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use bookshelf_core::FieldErrors;

use crate::config::ApiConfig;
use crate::navigation::{Navigator, is_login_page};
use crate::session::{Session, SessionError};
use conversions::AssetUrls;

/// Cookie the backend issues the CSRF token in.
pub const CSRF_COOKIE: &str = "XSRF-TOKEN";

/// Header the CSRF token is echoed in (`X-XSRF-TOKEN`).
pub const CSRF_HEADER: &str = "x-xsrf-token";

/// Errors returned by [`ApiClient`] operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The caller cancelled the request, or a newer one superseded it.
    #[error("Request cancelled")]
    Cancelled,

    /// The backend rejected the credentials and the user was sent to the
    /// login page.
    #[error("Authentication required, redirected to {0}")]
    Redirected(String),

    /// The backend answered with an error status.
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response had an unexpected shape.
    #[error("Unexpected response: {0}")]
    Parse(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The form failed validation; nothing was sent.
    #[error("Invalid form: {0}")]
    Invalid(FieldErrors),

    /// The session could not be persisted.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Whether the error should be shown to the user. Cancellations and
    /// auth redirects are handled silently.
    #[must_use]
    pub const fn is_user_visible(&self) -> bool {
        !matches!(self, Self::Cancelled | Self::Redirected(_))
    }

    /// HTTP status of a backend error response.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::NotFound(_) => Some(StatusCode::NOT_FOUND),
            _ => None,
        }
    }

    /// Field errors of a rejected form.
    #[must_use]
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self::Invalid(errors)
    }
}

/// Client for the bookstore backend.
///
/// Cloning is cheap: clones share the HTTP connection pool, the cookie jar
/// and the session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    cookies: Arc<Jar>,
    config: ApiConfig,
    session: Arc<Session>,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.config.base_url.as_str())
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(
        config: ApiConfig,
        session: Arc<Session>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let cookies = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .user_agent(concat!("bookshelf-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                cookies,
                config,
                session,
                navigator,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.inner.session
    }

    /// Cookie jar shared by every request of this client.
    #[must_use]
    pub fn cookie_jar(&self) -> &Arc<Jar> {
        &self.inner.cookies
    }

    /// Absolute URL for `path` plus `query`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Parse` if the path does not form a valid URL.
    pub fn endpoint(&self, path: &str, query: &[(String, String)]) -> Result<Url, ApiError> {
        let raw = format!("{}/{}", self.inner.config.origin(), path.trim_start_matches('/'));
        let mut url =
            Url::parse(&raw).map_err(|e| ApiError::Parse(format!("invalid URL {raw}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Current value of the CSRF cookie for `url`.
    #[must_use]
    pub fn csrf_token(&self, url: &Url) -> Option<String> {
        let header = self.inner.cookies.cookies(url)?;
        let header = header.to_str().ok()?;
        find_cookie(header, CSRF_COOKIE).map(str::to_string)
    }

    /// Request interceptor: the headers `request` is sent with.
    #[must_use]
    pub fn prepare(&self, request: &ApiRequest, url: &Url) -> HeaderMap {
        let token = self.inner.session.token();
        let csrf = if request.is_mutating()
            && !self
                .inner
                .config
                .is_csrf_exempt(&request.method, &request.path)
        {
            self.csrf_token(url)
        } else {
            None
        };

        interceptor_headers(request, token.as_ref(), csrf.as_deref())
    }

    /// Asset URL builder stamped with the current time.
    #[must_use]
    pub fn asset_urls(&self) -> AssetUrls<'_> {
        AssetUrls::new(
            self.inner.config.origin(),
            chrono::Utc::now().timestamp_millis(),
        )
    }

    /// Send `request` and run the response interceptor.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Redirected` on 401/403 outside the login page,
    /// after dropping the rejected session,
    /// `ApiError::NotFound` on 404, `ApiError::Api` on other error statuses,
    /// and `ApiError::Http` on transport failures.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: ApiRequest) -> Result<Response, ApiError> {
        let url = self.endpoint(&request.path, &request.query)?;
        let headers = self.prepare(&request, &url);

        let builder = self
            .inner
            .http
            .request(request.method.clone(), url)
            .headers(headers);
        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.body(serde_json::to_vec(&value)?),
            RequestBody::Multipart(payload) => builder.multipart(payload.into_form()?),
        };

        let response = builder.send().await?;
        tracing::debug!(status = %response.status(), "Response received");
        self.intercept(response).await
    }

    /// Response interceptor.
    async fn intercept(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            let login_path = &self.inner.config.login_path;
            let current = self.inner.navigator.current_path();
            if !is_login_page(&current, login_path) {
                tracing::warn!(%status, from = %current, "Authentication rejected, redirecting to login");
                if let Err(e) = self.inner.session.clear() {
                    tracing::warn!(error = %e, "Failed to clear rejected session");
                }
                self.inner.navigator.redirect(login_path);
                return Err(ApiError::Redirected(login_path.clone()));
            }
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(message));
        }

        tracing::debug!(%status, %message, "Backend returned an error");
        Err(ApiError::Api { status, message })
    }

    /// Send and decode a JSON response.
    pub(crate) async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ApiError> {
        let bytes = self.send(request).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send and normalize a list response.
    pub(crate) async fn fetch_listing<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Listing<T>, ApiError> {
        let value: serde_json::Value = self.fetch_json(request).await?;
        Listing::from_value(value)
    }

    /// Send and discard the response body.
    pub(crate) async fn fetch_empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.send(request).await?;
        Ok(())
    }

    /// Send and return the raw response body.
    pub(crate) async fn fetch_bytes(&self, request: ApiRequest) -> Result<Vec<u8>, ApiError> {
        Ok(self.send(request).await?.bytes().await?.to_vec())
    }
}

/// Header rules applied to every outgoing request.
///
/// `csrf` must already be filtered for the exemption list; it is attached
/// only to mutating requests.
#[must_use]
pub fn interceptor_headers(
    request: &ApiRequest,
    token: Option<&SecretString>,
    csrf: Option<&str>,
) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Some(token) = token
        && let Ok(mut value) = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
    {
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    // reqwest sets multipart/form-data with the boundary itself
    if !request.body.is_multipart() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    if request.is_mutating()
        && let Some(csrf) = csrf
        && let Ok(value) = HeaderValue::from_str(csrf)
    {
        headers.insert(HeaderName::from_static(CSRF_HEADER), value);
    }

    headers
}

/// The id an update form must carry.
fn require_id<I>(id: Option<I>) -> Result<I, ApiError> {
    id.ok_or_else(|| {
        let mut errors = FieldErrors::new();
        errors.add("id", "Only an existing record can be updated");
        ApiError::Invalid(errors)
    })
}

/// Value of cookie `name` in a `Cookie` header.
fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// Best human-readable message for an error response: the body's `message`
/// or `error` field, else the raw body, else the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(message) = json.get(key).and_then(serde_json::Value::as_str)
                && !message.trim().is_empty()
            {
                return message.trim().to_string();
            }
        }
    }

    let body = body.trim();
    if !body.is_empty() && body.len() <= 200 && !body.starts_with('<') {
        return body.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::Method;
    use reqwest::header::HeaderValue;

    use super::*;
    use crate::navigation::Location;

    fn client() -> ApiClient {
        ApiClient::new(
            ApiConfig::new("http://localhost:8080").unwrap(),
            Arc::new(Session::in_memory()),
            Arc::new(Location::new("/admin/books")),
        )
        .unwrap()
    }

    fn multipart_request() -> ApiRequest {
        ApiRequest::post("/api/books").multipart(MultipartPayload::new())
    }

    #[test]
    fn test_bearer_iff_token() {
        let token = SecretString::from("tok-1");
        let request = ApiRequest::get("/api/books");

        let headers = interceptor_headers(&request, Some(&token), None);
        assert_eq!(headers[AUTHORIZATION], "Bearer tok-1");
        assert!(headers[AUTHORIZATION].is_sensitive());

        let headers = interceptor_headers(&request, None, None);
        assert!(!headers.contains_key(AUTHORIZATION));
    }

    #[test]
    fn test_content_type_unless_multipart() {
        let headers = interceptor_headers(&ApiRequest::get("/api/books"), None, None);
        assert_eq!(headers[CONTENT_TYPE], "application/json");

        let headers = interceptor_headers(&multipart_request(), None, None);
        assert!(!headers.contains_key(CONTENT_TYPE));
    }

    #[test]
    fn test_csrf_only_on_mutating_requests() {
        let headers = interceptor_headers(&ApiRequest::get("/api/books"), None, Some("c1"));
        assert!(!headers.contains_key(CSRF_HEADER));

        for request in [
            ApiRequest::post("/api/books"),
            ApiRequest::put("/api/books/1"),
            ApiRequest::patch("/api/books/1"),
            ApiRequest::delete("/api/books/1"),
        ] {
            let headers = interceptor_headers(&request, None, Some("c1"));
            assert_eq!(headers[CSRF_HEADER], "c1", "{}", request.method);
        }

        let headers = interceptor_headers(&ApiRequest::post("/api/books"), None, None);
        assert!(!headers.contains_key(CSRF_HEADER));
    }

    #[test]
    fn test_prepare_reads_cookie_and_honours_exemptions() {
        let client = client();
        let url = client.endpoint("/api/books", &[]).unwrap();
        client
            .cookie_jar()
            .add_cookie_str("XSRF-TOKEN=abc123; Path=/", &url);

        let headers = client.prepare(&ApiRequest::post("/api/books"), &url);
        assert_eq!(headers[CSRF_HEADER], HeaderValue::from_static("abc123"));

        let orders = client.endpoint("/api/orders", &[]).unwrap();
        let headers = client.prepare(&ApiRequest::post("/api/orders"), &orders);
        assert!(!headers.contains_key(CSRF_HEADER));

        let headers = client.prepare(&ApiRequest::new(Method::PUT, "/api/orders"), &orders);
        assert!(headers.contains_key(CSRF_HEADER));
    }

    #[test]
    fn test_exemption_holds_for_relative_paths() {
        let client = client();
        let orders = client.endpoint("api/orders", &[]).unwrap();
        assert_eq!(orders.as_str(), "http://localhost:8080/api/orders");
        client
            .cookie_jar()
            .add_cookie_str("XSRF-TOKEN=abc123; Path=/", &orders);

        let headers = client.prepare(&ApiRequest::post("api/orders"), &orders);
        assert!(!headers.contains_key(CSRF_HEADER));

        let headers = client.prepare(&ApiRequest::post("api/books"), &orders);
        assert!(headers.contains_key(CSRF_HEADER));
    }

    #[test]
    fn test_prepare_uses_session_token() {
        let client = client();
        let url = client.endpoint("/api/books", &[]).unwrap();
        assert!(
            !client
                .prepare(&ApiRequest::get("/api/books"), &url)
                .contains_key(AUTHORIZATION)
        );

        client
            .session()
            .set_token(SecretString::from("tok-9"))
            .unwrap();
        let headers = client.prepare(&ApiRequest::get("/api/books"), &url);
        assert_eq!(headers[AUTHORIZATION], "Bearer tok-9");
    }

    #[test]
    fn test_endpoint_builds_query() {
        let client = client();
        let url = client
            .endpoint(
                "/api/books",
                &[
                    ("page".to_string(), "0".to_string()),
                    ("search".to_string(), "le petit prince".to_string()),
                ],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/books?page=0&search=le+petit+prince"
        );
    }

    #[test]
    fn test_asset_urls_are_stamped() {
        use bookshelf_core::{BookId, PackId, TagId};

        let client = client();
        let origin = "http://localhost:8080";
        assert!(
            client
                .book_cover_url(BookId::new(3))
                .starts_with(&format!("{origin}/api/books/3/cover?t="))
        );
        assert!(
            client
                .pack_cover_url(PackId::new(4))
                .starts_with(&format!("{origin}/api/book-packs/4/cover?t="))
        );
        assert!(
            client
                .section_image_url(TagId::new(5))
                .starts_with(&format!("{origin}/api/tags/5/image?t="))
        );
        assert!(
            client
                .profile_picture_url()
                .starts_with(&format!("{origin}/api/admin/profile/picture?t="))
        );
    }

    #[test]
    fn test_find_cookie() {
        assert_eq!(find_cookie("a=1; XSRF-TOKEN=t0k", CSRF_COOKIE), Some("t0k"));
        assert_eq!(find_cookie("XSRF-TOKEN-OLD=x", CSRF_COOKIE), None);
        assert_eq!(find_cookie("", CSRF_COOKIE), None);
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"message":"Title already exists"}"#),
            "Title already exists"
        );
        assert_eq!(
            error_message(StatusCode::CONFLICT, "stock changed"),
            "stock changed"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>oops</html>"),
            "Bad Gateway"
        );
    }

    #[test]
    fn test_visibility() {
        assert!(!ApiError::Cancelled.is_user_visible());
        assert!(!ApiError::Redirected("/admin/login".into()).is_user_visible());
        assert!(ApiError::NotFound("book".into()).is_user_visible());
        assert_eq!(
            ApiError::NotFound("book".into()).status(),
            Some(StatusCode::NOT_FOUND)
        );
    }
}
