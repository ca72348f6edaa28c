//! Tienda Shell - client application shell.
//!
//! When the client starts it runs a set of one-shot startup hooks:
//!
//! - [`bootstrap::ConfigBootstrap`] loads the storefront configuration into
//!   the shared [`EcommerceConfigStore`]. Failures are logged and swallowed.
//! - [`bootstrap::AuthRestoreBootstrap`] restores a persisted login through
//!   the shared [`PersistedSession`].
//!
//! Hooks only act in [`ExecutionContext::Client`]. Shared stores are passed
//! into hooks as `Arc` handles so tests can substitute fakes.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bootstrap;
pub mod config;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use thiserror::Error;

pub use bootstrap::{BootstrapReport, Bootstrapper, HookOutcome, StartupHook};
pub use config::{ExecutionContext, ShellConfig, ShellConfigError};
pub use services::{EcommerceConfigStore, PersistedSession};

/// Errors assembling a [`Shell`].
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// The client shell: its configuration and the shared stores its startup
/// hooks populate.
#[derive(Debug, Clone)]
pub struct Shell {
    config: ShellConfig,
    ecommerce: Arc<EcommerceConfigStore>,
    session: Arc<PersistedSession>,
}

impl Shell {
    /// Build the shell's HTTP client and shared stores. Nothing is fetched
    /// until [`Shell::bootstrap`] runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or an endpoint
    /// URL cannot be derived from the server URL.
    pub fn connect(config: ShellConfig) -> Result<Self, ShellError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tienda-shell/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let ecommerce = Arc::new(EcommerceConfigStore::new(client.clone(), &config)?);
        let session = Arc::new(PersistedSession::new(client, &config)?);

        Ok(Self {
            config,
            ecommerce,
            session,
        })
    }

    /// Bootstrapper with the standard startup hooks registered.
    #[must_use]
    pub fn bootstrapper(&self) -> Bootstrapper {
        Bootstrapper::new(self.config.context)
            .with_hook(bootstrap::ConfigBootstrap::new(Arc::clone(&self.ecommerce)))
            .with_hook(bootstrap::AuthRestoreBootstrap::new(Arc::clone(
                &self.session,
            )))
    }

    /// Run the standard startup hooks.
    pub async fn bootstrap(&self) -> BootstrapReport {
        self.bootstrapper().run().await
    }

    #[must_use]
    pub const fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Shared storefront configuration store.
    #[must_use]
    pub const fn ecommerce(&self) -> &Arc<EcommerceConfigStore> {
        &self.ecommerce
    }

    /// Shared login state.
    #[must_use]
    pub const fn session(&self) -> &Arc<PersistedSession> {
        &self.session
    }
}
