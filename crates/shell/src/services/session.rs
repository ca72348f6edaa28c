//! Persisted login state.
//!
//! The bearer token lives in a plain file between runs. Restoring a session
//! means reading that token and asking the server who it belongs to; the
//! result is published through a watch channel so the rest of the shell can
//! observe `user` and `is_logged_in` change.

use std::io;
use std::path::{Path, PathBuf};

use reqwest::StatusCode;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::watch;
use url::Url;

use tienda_core::SessionUser;

use crate::bootstrap::AuthSession;
use crate::config::ShellConfig;

/// Errors reading or writing the session file.
#[derive(Debug, Error)]
pub enum SessionFileError {
    #[error("session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("refusing to persist an empty token")]
    EmptyToken,
}

/// File holding the persisted bearer token.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token. A missing or blank file means no token.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub async fn read_token(&self) -> Result<Option<String>, SessionFileError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_owned()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Store `token`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is blank or the file cannot be written.
    pub async fn write_token(&self, token: &str) -> Result<(), SessionFileError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SessionFileError::EmptyToken);
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        self.write_private(format!("{token}\n").as_bytes())
            .await
            .map_err(|e| self.io_error(e))
    }

    /// Write `contents` readable by the owner only.
    async fn write_private(&self, contents: &[u8]) -> io::Result<()> {
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&self.path).await?;
        // `mode` only applies when the file is created.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .await?;
        }
        file.write_all(contents).await?;
        file.flush().await
    }

    /// Remove the stored token. Removing a missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub async fn clear(&self) -> Result<(), SessionFileError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn io_error(&self, source: io::Error) -> SessionFileError {
        SessionFileError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Login state backed by a [`SessionFile`] and the server's session
/// endpoint.
#[derive(Debug)]
pub struct PersistedSession {
    client: reqwest::Client,
    endpoint: Url,
    file: SessionFile,
    user: watch::Sender<Option<SessionUser>>,
}

impl PersistedSession {
    /// Path of the session endpoint relative to the server URL.
    pub const PATH: &'static str = "api/auth/session";

    /// Create a signed-out session for the server and file in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL cannot be built.
    pub fn new(client: reqwest::Client, config: &ShellConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            endpoint: config.endpoint(Self::PATH)?,
            file: SessionFile::new(&config.session_file),
            user: watch::Sender::new(None),
        })
    }

    /// Observe the signed-in user.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionUser>> {
        self.user.subscribe()
    }

    #[must_use]
    pub const fn file(&self) -> &SessionFile {
        &self.file
    }

    /// Store a freshly issued token for the next [`AuthSession::check_auth`].
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be written.
    pub async fn persist(&self, token: &str) -> Result<(), SessionFileError> {
        self.file.write_token(token).await
    }

    /// Sign out: forget the user and remove the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token file cannot be removed.
    pub async fn clear(&self) -> Result<(), SessionFileError> {
        self.user.send_replace(None);
        self.file.clear().await
    }

    /// Ask the server who `token` belongs to. `None` for any failure.
    async fn fetch_user(&self, token: &str) -> Option<SessionUser> {
        let response = match self
            .client
            .get(self.endpoint.clone())
            .bearer_auth(token)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Session check request failed");
                return None;
            }
        };

        match response.status() {
            status if status.is_success() => match response.json::<SessionUser>().await {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "Session endpoint returned an unreadable user");
                    None
                }
            },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                tracing::debug!("Stored token rejected, removing it");
                if let Err(e) = self.file.clear().await {
                    tracing::warn!(error = %e, "Failed to remove rejected token");
                }
                None
            }
            status => {
                tracing::warn!(%status, "Session endpoint returned an unexpected status");
                None
            }
        }
    }
}

impl AuthSession for PersistedSession {
    async fn check_auth(&self) -> bool {
        let token = match self.file.read_token().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::debug!(path = %self.file.path().display(), "No stored token");
                self.user.send_replace(None);
                return false;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored token");
                self.user.send_replace(None);
                return false;
            }
        };

        let user = self.fetch_user(&token).await;
        let restored = user.is_some();
        self.user.send_replace(user);
        restored
    }

    fn user(&self) -> Option<SessionUser> {
        self.user.borrow().clone()
    }
}
