//! CLI command implementations.

pub mod migrate;
pub mod shell;
pub mod token;
