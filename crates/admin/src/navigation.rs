//! Where the administrator currently is, and how to send them elsewhere.
//!
//! The client never routes by itself. When the backend rejects a request as
//! unauthenticated it asks the [`Navigator`] for the current path and, unless
//! that is already the login page, tells it to go there.

use std::sync::{PoisonError, RwLock};

/// Routing hook used by the client's auth-failure handling.
pub trait Navigator: Send + Sync {
    /// Current route path, e.g. `/admin/books`.
    fn current_path(&self) -> String;

    /// Navigate to `path`.
    fn redirect(&self, path: &str);
}

/// In-memory location, used by the CLI and by tests.
#[derive(Debug)]
pub struct Location {
    path: RwLock<String>,
}

impl Location {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: RwLock::new(path.into()),
        }
    }

    /// Move without going through a redirect.
    pub fn set(&self, path: impl Into<String>) {
        *self.path.write().unwrap_or_else(PoisonError::into_inner) = path.into();
    }
}

impl Navigator for Location {
    fn current_path(&self) -> String {
        self.path
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn redirect(&self, path: &str) {
        tracing::info!(to = %path, "Redirecting");
        self.set(path);
    }
}

/// Whether `current` is the login page, ignoring query, fragment and a
/// trailing slash.
#[must_use]
pub fn is_login_page(current: &str, login_path: &str) -> bool {
    let route = current.split(['?', '#']).next().unwrap_or_default();
    route.trim_end_matches('/') == login_path.trim_end_matches('/')
}
