//! Bearer token issuing and verification.
//!
//! Tokens have the shape `<payload>.<signature>` where `payload` is the
//! base64url (unpadded) JSON encoding of [`Claims`] and `signature` is the
//! hex HMAC-SHA256 of the payload under the server's token secret.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use tienda_core::{Email, Role, SessionUser, UserId};

type HmacSha256 = Hmac<Sha256>;

/// Errors from token issuing or verification.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Token is not `<payload>.<signature>` or the payload does not decode.
    #[error("malformed token")]
    Malformed,

    /// Signature does not match the payload.
    #[error("invalid token signature")]
    BadSignature,

    /// Token expiry is in the past.
    #[error("token expired at {0}")]
    Expired(DateTime<Utc>),

    /// The signing key was rejected by the MAC implementation.
    #[error("invalid signing key: {0}")]
    Key(String),

    /// Claims could not be encoded.
    #[error("claims encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Verifies a bearer token and resolves the caller it identifies.
///
/// The authentication gate only depends on this trait, so tests can swap in
/// a fake that accepts fixed strings.
pub trait TokenVerifier: Send + Sync {
    /// Resolve the caller identified by `token`.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] when the token cannot be trusted.
    fn verify(&self, token: &str) -> Result<SessionUser, TokenError>;
}

/// Signed token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: UserId,
    email: Email,
    name: String,
    role: Role,
    /// Expiry as a Unix timestamp (seconds).
    exp: i64,
}

/// Issues and verifies HMAC-SHA256 signed bearer tokens.
#[derive(Clone)]
pub struct HmacTokenSigner {
    secret: SecretString,
}

impl std::fmt::Debug for HmacTokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacTokenSigner")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl HmacTokenSigner {
    /// Create a signer from the shared token secret.
    #[must_use]
    pub const fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Issue a token for `user` valid for `ttl` from now.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be encoded or signed.
    pub fn issue(&self, user: &SessionUser, ttl: Duration) -> Result<String, TokenError> {
        self.issue_until(user, Utc::now() + ttl)
    }

    /// Issue a token for `user` that expires at `expires_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be encoded or signed.
    pub fn issue_until(
        &self,
        user: &SessionUser,
        expires_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            exp: expires_at.timestamp(),
        };

        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signature = hex::encode(self.mac(&payload)?.finalize().into_bytes());

        Ok(format!("{payload}.{signature}"))
    }

    fn mac(&self, payload: &str) -> Result<HmacSha256, TokenError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| TokenError::Key(e.to_string()))?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }
}

impl TokenVerifier for HmacTokenSigner {
    fn verify(&self, token: &str) -> Result<SessionUser, TokenError> {
        let (payload, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let signature = hex::decode(signature).map_err(|_| TokenError::Malformed)?;

        // verify_slice compares in constant time
        self.mac(payload)?
            .verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)?;

        let expires_at =
            DateTime::<Utc>::from_timestamp(claims.exp, 0).ok_or(TokenError::Malformed)?;
        if expires_at <= Utc::now() {
            return Err(TokenError::Expired(expires_at));
        }

        Ok(SessionUser {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        })
    }
}
