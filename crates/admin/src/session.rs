//! Authenticated session state.
//!
//! Holds the bearer token and the cached administrator profile. Both are
//! written at login, read on every request and cleared at logout or when the
//! backend rejects the token. A session may be backed by a JSON file (the
//! CLI's persistent storage) or live only in memory.
//!
//! The persisted file uses fixed keys: `token` for the bearer token and
//! `adminProfile` for the cached profile.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::AdminProfile;

/// Session persistence errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the session file failed.
    #[error("Session storage error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The session file is not valid JSON.
    #[error("Corrupt session file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Default)]
struct SessionState {
    token: Option<SecretString>,
    admin_profile: Option<AdminProfile>,
}

/// On-disk layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(
        rename = "adminProfile",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    admin_profile: Option<AdminProfile>,
}

/// Shared session, passed to the client as `Arc<Session>`.
///
/// Locks are held only for the duration of a read or write, never across an
/// `.await`.
pub struct Session {
    state: RwLock<SessionState>,
    storage: Option<PathBuf>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// A session that is never written to disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
            storage: None,
        }
    }

    /// Open a file-backed session. A missing file yields an empty session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Io` if the file exists but cannot be read, or
    /// `SessionError::Json` if it is not a valid session document.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();

        let stored = match std::fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => StoredSession::default(),
            Ok(bytes) => serde_json::from_slice::<StoredSession>(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => StoredSession::default(),
            Err(source) => return Err(SessionError::Io { path, source }),
        };

        tracing::debug!(
            path = %path.display(),
            has_token = stored.token.is_some(),
            "Loaded session"
        );

        Ok(Self {
            state: RwLock::new(SessionState {
                token: stored.token.map(SecretString::from),
                admin_profile: stored.admin_profile,
            }),
            storage: Some(path),
        })
    }

    /// Path of the backing file, if any.
    #[must_use]
    pub fn storage_path(&self) -> Option<&Path> {
        self.storage.as_deref()
    }

    /// The bearer token, if logged in.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.read(|state| state.token.clone())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read(|state| state.token.is_some())
    }

    /// The cached administrator profile.
    #[must_use]
    pub fn admin_profile(&self) -> Option<AdminProfile> {
        self.read(|state| state.admin_profile.clone())
    }

    /// Store a fresh token after login.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session file cannot be written.
    pub fn set_token(&self, token: SecretString) -> Result<(), SessionError> {
        self.write(|state| state.token = Some(token))
    }

    /// Replace the cached administrator profile.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session file cannot be written.
    pub fn set_admin_profile(&self, profile: AdminProfile) -> Result<(), SessionError> {
        self.write(|state| state.admin_profile = Some(profile))
    }

    /// Forget the token and the cached profile.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session file cannot be written.
    pub fn clear(&self) -> Result<(), SessionError> {
        self.write(|state| *state = SessionState::default())
    }

    fn read<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn write(&self, f: impl FnOnce(&mut SessionState)) -> Result<(), SessionError> {
        let snapshot = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut state);
            StoredSession {
                token: state
                    .token
                    .as_ref()
                    .map(|t| t.expose_secret().to_string()),
                admin_profile: state.admin_profile.clone(),
            }
        };

        self.persist(&snapshot)
    }

    fn persist(&self, snapshot: &StoredSession) -> Result<(), SessionError> {
        let Some(path) = &self.storage else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let io_error = |source| SessionError::Io {
            path: path.clone(),
            source,
        };

        // Write beside the target and rename over it, so a crash never
        // leaves a half-written file behind.
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o600))
                .map_err(io_error)?;
        }
        file.write_all(&bytes).map_err(io_error)?;
        file.as_file().sync_all().map_err(io_error)?;
        file.persist(path).map_err(|e| io_error(e.error))?;
        Ok(())
    }
}
