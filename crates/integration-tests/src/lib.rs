//! Integration tests for the Bookshelf admin client.
//!
//! The tests run [`bookshelf_admin::ApiClient`] against [`MockBackend`], an
//! axum server bound to `127.0.0.1:0` that answers with canned responses and
//! records every request it receives.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bookshelf-integration-tests
//! ```

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{CONTENT_TYPE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use bookshelf_admin::{ApiClient, ApiConfig, Location, Session};

/// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    /// Header value as text, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON; `Value::Null` when it is not JSON.
    #[must_use]
    pub fn body_json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

/// A canned response.
#[derive(Debug, Clone)]
pub struct Canned {
    status: StatusCode,
    body: String,
    content_type: &'static str,
    delay: Option<Duration>,
    set_cookie: Option<String>,
}

impl Canned {
    /// 200 with a JSON body.
    #[must_use]
    pub fn json(body: &Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
            content_type: "application/json",
            delay: None,
            set_cookie: None,
        }
    }

    /// 200 with a plain body of `content_type`.
    #[must_use]
    pub fn text(content_type: &'static str, body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
            content_type,
            delay: None,
            set_cookie: None,
        }
    }

    /// An empty response with `status`.
    #[must_use]
    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: String::new(),
            content_type: "application/json",
            delay: None,
            set_cookie: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Answer only after `delay`.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a `Set-Cookie` header.
    #[must_use]
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.set_cookie = Some(cookie.into());
        self
    }

    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        let headers = response.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(self.content_type));
        if let Some(cookie) = self.set_cookie
            && let Ok(value) = HeaderValue::from_str(&cookie)
        {
            headers.insert(SET_COOKIE, value);
        }
        response
    }
}

#[derive(Default)]
struct MockState {
    /// Queued responses per route. The last one is reused once the queue is
    /// down to it.
    routes: Mutex<HashMap<(Method, String), VecDeque<Canned>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockState {
    fn next_response(&self, method: &Method, path: &str) -> Option<Canned> {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        let queue = routes.get_mut(&(method.clone(), path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

/// An in-process stand-in for the bookstore backend.
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockBackend {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, state })
    }

    /// Base URL, without a trailing slash.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Queue `response` for `method path`. Unmatched routes answer 404.
    pub fn on(&self, method: Method, path: &str, response: Canned) {
        self.state
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests received for `method path`.
    #[must_use]
    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == *method && r.path == path)
            .collect()
    }

    /// A client for this backend with an in-memory session, currently on
    /// page `current_path`.
    ///
    /// # Errors
    ///
    /// Returns the error if the client cannot be built.
    pub fn client(
        &self,
        current_path: &str,
    ) -> Result<(ApiClient, Arc<Location>), bookshelf_admin::ApiError> {
        let config = ApiConfig::new(&self.url())
            .map_err(|e| bookshelf_admin::ApiError::Parse(e.to_string()))?;
        let location = Arc::new(Location::new(current_path));
        let client = ApiClient::new(
            config,
            Arc::new(Session::in_memory()),
            Arc::clone(&location) as Arc<dyn bookshelf_admin::Navigator>,
        )?;
        Ok((client, location))
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            query: uri.query().map(str::to_string),
            headers,
            body,
        });

    let Some(canned) = state.next_response(&method, &path) else {
        return Canned::status(StatusCode::NOT_FOUND).into_response();
    };
    if let Some(delay) = canned.delay {
        tokio::time::sleep(delay).await;
    }
    canned.into_response()
}
