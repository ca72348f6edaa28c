//! HTTP-backed shared stores the startup hooks populate.

pub mod ecommerce_config;
pub mod session;

pub use ecommerce_config::{ConfigLoadError, EcommerceConfigStore};
pub use session::{PersistedSession, SessionFile, SessionFileError};
