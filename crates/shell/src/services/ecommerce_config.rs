//! Storefront configuration fetched from the Tienda server.

use reqwest::StatusCode;
use thiserror::Error;
use tokio::sync::OnceCell;
use url::Url;

use tienda_core::EcommerceConfig;

use crate::bootstrap::ConfigStore;
use crate::config::ShellConfig;

/// Errors loading the storefront configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration endpoint returned {status}")]
    Status { status: StatusCode },
}

/// Loads the storefront configuration once and keeps it for the rest of
/// the session.
#[derive(Debug)]
pub struct EcommerceConfigStore {
    client: reqwest::Client,
    endpoint: Url,
    config: OnceCell<EcommerceConfig>,
}

impl EcommerceConfigStore {
    /// Path of the configuration endpoint relative to the server URL.
    pub const PATH: &'static str = "api/config/ecommerce";

    /// Create a store pointed at the server in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL cannot be built.
    pub fn new(client: reqwest::Client, config: &ShellConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            endpoint: config.endpoint(Self::PATH)?,
            config: OnceCell::new(),
        })
    }

    /// The loaded configuration, if loading has succeeded.
    #[must_use]
    pub fn config(&self) -> Option<&EcommerceConfig> {
        self.config.get()
    }

    /// Fetch the configuration unless it is already loaded.
    ///
    /// Concurrent callers share one request. A failed fetch leaves the store
    /// empty so a later call tries again.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server does not answer
    /// with a configuration.
    pub async fn load(&self) -> Result<&EcommerceConfig, ConfigLoadError> {
        self.config.get_or_try_init(|| self.fetch()).await
    }

    async fn fetch(&self) -> Result<EcommerceConfig, ConfigLoadError> {
        tracing::debug!(endpoint = %self.endpoint, "Fetching e-commerce configuration");

        let response = self.client.get(self.endpoint.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ConfigLoadError::Status { status });
        }

        let config: EcommerceConfig = response.json().await?;
        tracing::debug!(
            store = %config.store_name,
            currency = %config.currency,
            "E-commerce configuration received"
        );
        Ok(config)
    }
}

impl ConfigStore for EcommerceConfigStore {
    type Error = ConfigLoadError;

    async fn load_configuration(&self) -> Result<(), ConfigLoadError> {
        self.load().await.map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

    use super::*;
    use crate::config::ExecutionContext;
    use crate::test_support::{ecommerce, serve};

    /// Config endpoint that fails the first `failures` requests.
    fn config_server(hits: Arc<AtomicUsize>, failures: usize) -> Router {
        Router::new()
            .route(
                "/api/config/ecommerce",
                get(
                    move |State(hits): State<Arc<AtomicUsize>>| async move {
                        let hit = hits.fetch_add(1, Ordering::SeqCst);
                        if hit < failures {
                            Err(StatusCode::SERVICE_UNAVAILABLE)
                        } else {
                            Ok(Json(ecommerce()))
                        }
                    },
                ),
            )
            .with_state(hits)
    }

    async fn store_for(app: Router) -> EcommerceConfigStore {
        let base = serve(app).await;
        let config = ShellConfig::new(&base, "unused", ExecutionContext::Client).unwrap();
        EcommerceConfigStore::new(reqwest::Client::new(), &config).unwrap()
    }

    #[tokio::test]
    async fn test_loads_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let store = store_for(config_server(Arc::clone(&hits), 0)).await;

        assert!(store.config().is_none());
        store.load_configuration().await.unwrap();
        store.load_configuration().await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(store.config().unwrap(), &ecommerce());
    }

    #[tokio::test]
    async fn test_failure_is_retried_on_next_load() {
        let hits = Arc::new(AtomicUsize::new(0));
        let store = store_for(config_server(Arc::clone(&hits), 1)).await;

        let err = store.load_configuration().await.unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::Status { status } if status == StatusCode::SERVICE_UNAVAILABLE
        ));
        assert!(store.config().is_none());

        store.load_configuration().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(store.config().unwrap().store_name, "La Tienda");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_http_error() {
        // Port 1 on loopback refuses connections.
        let config =
            ShellConfig::new("http://127.0.0.1:1", "unused", ExecutionContext::Client).unwrap();
        let store = EcommerceConfigStore::new(reqwest::Client::new(), &config).unwrap();

        let err = store.load_configuration().await.unwrap_err();
        assert!(matches!(err, ConfigLoadError::Http(_)));
    }
}
