//! Port for verifying bearer tokens presented by clients.
//!
//! Adapters check the signature, expiry, and any configured issuer or
//! audience before yielding the subject. Every failure is terminal: callers
//! treat it as an unauthenticated request.

use crate::domain::AuthSubject;

/// Reasons a bearer token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenVerificationError {
    /// The token is not a well-formed JWT.
    #[error("token is malformed")]
    Malformed,
    /// The signature does not match the configured key.
    #[error("token signature is invalid")]
    InvalidSignature,
    /// The token has expired.
    #[error("token has expired")]
    Expired,
    /// A required claim is missing or does not match.
    #[error("token claims are invalid: {message}")]
    InvalidClaims {
        /// Which claim failed and how.
        message: String,
    },
}

/// Verifies a raw bearer token and extracts its subject.
#[cfg_attr(test, mockall::automock)]
pub trait TokenVerifier: Send + Sync {
    /// Return the subject of `token` when it passes every check.
    fn verify(&self, token: &str) -> Result<AuthSubject, TokenVerificationError>;
}
