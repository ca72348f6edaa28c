//! Loads the storefront configuration when the client starts.
//!
//! Loading is best effort: a failure is logged and reported as
//! [`HookOutcome::Degraded`] so a missing configuration never stops the
//! shell from starting.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use super::{HookOutcome, StartupHook};
use crate::config::ExecutionContext;

/// Shared store that can fetch the storefront configuration.
pub trait ConfigStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch and cache the configuration.
    fn load_configuration(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Startup hook that populates a [`ConfigStore`].
pub struct ConfigBootstrap<S> {
    store: Arc<S>,
}

impl<S: ConfigStore> ConfigBootstrap<S> {
    pub const NAME: &'static str = "ecommerce-config";

    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    async fn load(&self, context: ExecutionContext) -> HookOutcome {
        if !context.is_client() {
            return HookOutcome::Skipped;
        }

        match self.store.load_configuration().await {
            Ok(()) => {
                tracing::debug!("E-commerce configuration loaded");
                HookOutcome::completed()
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load e-commerce configuration");
                HookOutcome::Degraded {
                    reason: e.to_string(),
                }
            }
        }
    }
}

impl<S: ConfigStore + 'static> StartupHook for ConfigBootstrap<S> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run(&self, context: ExecutionContext) -> BoxFuture<'_, HookOutcome> {
        Box::pin(self.load(context))
    }
}
