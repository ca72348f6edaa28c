//! Shell configuration.

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Errors building a [`ShellConfig`].
#[derive(Debug, Error)]
pub enum ShellConfigError {
    #[error("invalid server URL: {0}")]
    InvalidServerUrl(#[from] url::ParseError),
    #[error("server URL must be http or https, got {0}")]
    UnsupportedScheme(String),
    #[error("unknown execution context: {0} (expected client or server)")]
    UnknownContext(String),
}

/// Where the shell is running.
///
/// Startup hooks only act in the interactive client. A server-side render
/// of the same application constructs the shell with `Server` and every
/// hook becomes a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Interactive client (the user's device).
    Client,
    /// Server-side rendering.
    Server,
}

impl ExecutionContext {
    /// Whether hooks should run.
    #[must_use]
    pub const fn is_client(self) -> bool {
        matches!(self, Self::Client)
    }
}

impl std::fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client => f.write_str("client"),
            Self::Server => f.write_str("server"),
        }
    }
}

impl std::str::FromStr for ExecutionContext {
    type Err = ShellConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "client" => Ok(Self::Client),
            "server" => Ok(Self::Server),
            _ => Err(ShellConfigError::UnknownContext(s.to_owned())),
        }
    }
}

/// Shell configuration.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Base URL of the Tienda server, always ending in `/`.
    pub server_url: Url,
    /// File holding the persisted bearer token.
    pub session_file: PathBuf,
    /// Execution context hooks are run in.
    pub context: ExecutionContext,
}

impl ShellConfig {
    /// Build a configuration, normalising `server_url` to end in `/` so
    /// endpoint paths join onto it instead of replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or is not http(s).
    pub fn new(
        server_url: &str,
        session_file: impl Into<PathBuf>,
        context: ExecutionContext,
    ) -> Result<Self, ShellConfigError> {
        let mut server_url = Url::parse(server_url)?;
        if !matches!(server_url.scheme(), "http" | "https") {
            return Err(ShellConfigError::UnsupportedScheme(
                server_url.scheme().to_owned(),
            ));
        }
        if !server_url.path().ends_with('/') {
            let path = format!("{}/", server_url.path());
            server_url.set_path(&path);
        }

        Ok(Self {
            server_url,
            session_file: session_file.into(),
            context,
        })
    }

    /// Resolve an API path against the server URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be joined.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.server_url.join(path.trim_start_matches('/'))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_server_url_gets_trailing_slash() {
        let config = ShellConfig::new(
            "https://tienda.example/app",
            "session",
            ExecutionContext::Client,
        )
        .unwrap();

        assert_eq!(config.server_url.as_str(), "https://tienda.example/app/");
        assert_eq!(
            config.endpoint("/api/auth/session").unwrap().as_str(),
            "https://tienda.example/app/api/auth/session"
        );
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = ShellConfig::new("ftp://tienda", "session", ExecutionContext::Client)
            .unwrap_err();
        assert!(matches!(err, ShellConfigError::UnsupportedScheme(_)));
    }

    #[test]
    fn test_execution_context_parse() {
        assert_eq!("client".parse::<ExecutionContext>().unwrap(), ExecutionContext::Client);
        assert_eq!("SERVER".parse::<ExecutionContext>().unwrap(), ExecutionContext::Server);
        assert!("browser".parse::<ExecutionContext>().is_err());
        assert!(ExecutionContext::Client.is_client());
        assert!(!ExecutionContext::Server.is_client());
    }
}
