//! Client shell commands.
//!
//! # Usage
//!
//! ```bash
//! # Store a token issued with `tienda token issue`
//! tienda shell login --token "$TOKEN"
//!
//! # Run the client startup hooks against a server
//! tienda shell bootstrap --server-url http://127.0.0.1:3000
//!
//! # Forget the stored token
//! tienda shell logout
//! ```

use std::path::PathBuf;

use thiserror::Error;

use tienda_shell::bootstrap::AuthSession;
use tienda_shell::services::SessionFileError;
use tienda_shell::{ExecutionContext, HookOutcome, Shell, ShellConfig, ShellConfigError, ShellError};

/// Default location of the stored bearer token.
pub const DEFAULT_SESSION_FILE: &str = ".tienda/session";

/// Errors from shell commands.
#[derive(Debug, Error)]
pub enum ShellCommandError {
    #[error(transparent)]
    Config(#[from] ShellConfigError),

    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error(transparent)]
    SessionFile(#[from] SessionFileError),
}

/// Run the startup hooks and print one line per hook.
///
/// Hook failures are reported, never returned as errors.
///
/// # Errors
///
/// Returns an error if the shell cannot be assembled.
pub async fn bootstrap(
    server_url: &str,
    session_file: PathBuf,
    context: ExecutionContext,
) -> Result<(), ShellCommandError> {
    let shell = Shell::connect(ShellConfig::new(server_url, session_file, context)?)?;

    tracing::info!(server = %shell.config().server_url, %context, "Bootstrapping client shell");
    let report = shell.bootstrap().await;

    #[allow(clippy::print_stdout)]
    {
        for (name, outcome) in &report.outcomes {
            match outcome {
                HookOutcome::Skipped => println!("{name}: skipped ({context} context)"),
                HookOutcome::Completed { detail: None } => println!("{name}: ok"),
                HookOutcome::Completed {
                    detail: Some(detail),
                } => println!("{name}: ok ({detail})"),
                HookOutcome::Degraded { reason } => println!("{name}: degraded ({reason})"),
            }
        }
    }

    if let Some(config) = shell.ecommerce().config() {
        tracing::info!(
            store = %config.store_name,
            currency = %config.currency,
            locale = %config.locale,
            "Storefront configuration available"
        );
    }
    if shell.session().is_logged_in() {
        tracing::info!("Signed in");
    }

    Ok(())
}

/// Store `token` for later bootstrap runs.
///
/// # Errors
///
/// Returns an error if the token is blank or cannot be written.
pub async fn login(
    server_url: &str,
    session_file: PathBuf,
    token: &str,
) -> Result<(), ShellCommandError> {
    let shell = Shell::connect(ShellConfig::new(
        server_url,
        session_file,
        ExecutionContext::Client,
    )?)?;

    shell.session().persist(token).await?;
    tracing::info!(
        path = %shell.session().file().path().display(),
        "Token stored"
    );
    Ok(())
}

/// Remove the stored token.
///
/// # Errors
///
/// Returns an error if the token file cannot be removed.
pub async fn logout(
    server_url: &str,
    session_file: PathBuf,
) -> Result<(), ShellCommandError> {
    let shell = Shell::connect(ShellConfig::new(
        server_url,
        session_file,
        ExecutionContext::Client,
    )?)?;

    shell.session().clear().await?;
    tracing::info!("Token removed");
    Ok(())
}
