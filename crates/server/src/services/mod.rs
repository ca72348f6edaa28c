//! Business services for the server.

pub mod token;

pub use token::{HmacTokenSigner, TokenError, TokenVerifier};
