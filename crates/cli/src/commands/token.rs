//! Bearer token commands.
//!
//! # Usage
//!
//! ```bash
//! # Generate a value for TIENDA_TOKEN_SECRET
//! tienda token secret
//!
//! # Issue an admin token valid for 8 hours
//! tienda token issue -u 3f1c0d7e-5b8a-4c2e-9d61-0a7b4e2f9c13 \
//!     -e lucia@tienda.es -n "Lucía" -r admin --ttl-hours 8
//! ```
//!
//! # Environment Variables
//!
//! - `TIENDA_TOKEN_SECRET` - Signing secret shared with the server

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Duration;
use rand::RngCore;
use thiserror::Error;

use tienda_core::{Email, EmailError, Role, RoleParseError, SessionUser, UserId};
use tienda_server::config::{ConfigError, token_secret_from_env, validate_token_secret};
use tienda_server::services::{HmacTokenSigner, TokenError};

const SECRET_BYTES: usize = 48;

/// Errors that can occur while issuing tokens.
#[derive(Debug, Error)]
pub enum TokenCommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid user ID: {0}")]
    InvalidUserId(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error(transparent)]
    InvalidRole(#[from] RoleParseError),

    #[error("TTL must be between 1 and {max} hours, got {got}")]
    InvalidTtl { got: i64, max: i64 },

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

/// Longest lifetime a token may be issued for (30 days).
pub const MAX_TTL_HOURS: i64 = 24 * 30;

/// Issue a signed bearer token and print it to stdout.
///
/// # Errors
///
/// Returns an error if an argument is invalid or the secret is missing or
/// insecure.
pub fn issue(
    user_id: &str,
    email: &str,
    name: &str,
    role: &str,
    ttl_hours: i64,
) -> Result<(), TokenCommandError> {
    let user = session_user(user_id, email, name, role)?;
    let ttl = ttl(ttl_hours)?;

    let signer = HmacTokenSigner::new(token_secret_from_env()?);
    let token = signer.issue(&user, ttl)?;

    tracing::info!(
        email = %user.email,
        role = %user.role,
        ttl_hours,
        "Issued bearer token"
    );

    #[allow(clippy::print_stdout)]
    {
        println!("{token}");
    }
    Ok(())
}

/// Print a freshly generated signing secret.
pub fn secret() {
    let secret = generate_secret();

    #[allow(clippy::print_stdout)]
    {
        println!("{secret}");
    }
}

fn session_user(
    user_id: &str,
    email: &str,
    name: &str,
    role: &str,
) -> Result<SessionUser, TokenCommandError> {
    let id: UserId = user_id
        .parse()
        .map_err(|_| TokenCommandError::InvalidUserId(user_id.to_owned()))?;

    Ok(SessionUser {
        id,
        email: Email::parse(email)?,
        name: name.trim().to_owned(),
        role: role.parse::<Role>()?,
    })
}

fn ttl(hours: i64) -> Result<Duration, TokenCommandError> {
    if !(1..=MAX_TTL_HOURS).contains(&hours) {
        return Err(TokenCommandError::InvalidTtl {
            got: hours,
            max: MAX_TTL_HOURS,
        });
    }
    Ok(Duration::hours(hours))
}

/// Random URL-safe secret that passes the server's secret checks.
fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    loop {
        rand::rng().fill_bytes(&mut bytes);
        let secret = URL_SAFE_NO_PAD.encode(bytes);
        // Random output can still spell a blocklisted word
        if validate_token_secret(&secret).is_ok() {
            return secret;
        }
    }
}
