//! `TokenVerifier` backed by `jsonwebtoken`.
//!
//! Supports HS256 shared secrets and RS256 PEM public keys. Expiry is always
//! enforced; issuer and audience only when configured.

use std::fmt;

use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use tracing::debug;

use crate::domain::AuthSubject;
use crate::domain::ports::{TokenVerificationError, TokenVerifier};

/// Key material used to check token signatures.
#[derive(Clone)]
pub enum JwtKey {
    /// Shared HMAC secret.
    Hs256 {
        /// Raw secret bytes as configured.
        secret: String,
    },
    /// RSA public key.
    Rs256 {
        /// PEM-encoded public key.
        public_key_pem: String,
    },
}

impl fmt::Debug for JwtKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hs256 { .. } => f.write_str("JwtKey::Hs256(<redacted>)"),
            Self::Rs256 { .. } => f.write_str("JwtKey::Rs256(<public key>)"),
        }
    }
}

/// Verification settings assembled from configuration.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    /// Signature verification key.
    pub key: JwtKey,
    /// Required `iss` claim, when set.
    pub issuer: Option<String>,
    /// Required `aud` claim, when set.
    pub audience: Option<String>,
    /// Clock skew tolerated for `exp`.
    pub leeway_secs: u64,
}

/// Raised when the configured key cannot be loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JwtSetupError {
    /// The HS256 secret is blank.
    #[error("HS256 secret must not be empty")]
    EmptySecret,
    /// The RS256 PEM could not be parsed.
    #[error("invalid RS256 public key: {message}")]
    InvalidPublicKey {
        /// Parser detail.
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
}

/// Verifies bearer tokens against a single configured key.
pub struct JwtTokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    /// Build a verifier from settings.
    ///
    /// # Errors
    ///
    /// Returns [`JwtSetupError`] for an empty secret or an unreadable PEM key.
    pub fn new(settings: JwtSettings) -> Result<Self, JwtSetupError> {
        let (key, algorithm) = match &settings.key {
            JwtKey::Hs256 { secret } => {
                if secret.trim().is_empty() {
                    return Err(JwtSetupError::EmptySecret);
                }
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
            JwtKey::Rs256 { public_key_pem } => {
                let key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes()).map_err(|err| {
                    JwtSetupError::InvalidPublicKey {
                        message: err.to_string(),
                    }
                })?;
                (key, Algorithm::RS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = settings.leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &settings.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &settings.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self { key, validation })
    }
}

fn map_jwt_error(error: &JwtError) -> TokenVerificationError {
    match error.kind() {
        ErrorKind::ExpiredSignature => TokenVerificationError::Expired,
        ErrorKind::InvalidSignature => TokenVerificationError::InvalidSignature,
        ErrorKind::InvalidIssuer => TokenVerificationError::InvalidClaims {
            message: "issuer mismatch".to_owned(),
        },
        ErrorKind::InvalidAudience => TokenVerificationError::InvalidClaims {
            message: "audience mismatch".to_owned(),
        },
        ErrorKind::ImmatureSignature => TokenVerificationError::InvalidClaims {
            message: "token not yet valid".to_owned(),
        },
        ErrorKind::MissingRequiredClaim(claim) => TokenVerificationError::InvalidClaims {
            message: format!("missing claim {claim}"),
        },
        ErrorKind::InvalidAlgorithm => TokenVerificationError::InvalidClaims {
            message: "unexpected signing algorithm".to_owned(),
        },
        _ => TokenVerificationError::Malformed,
    }
}

impl TokenVerifier for JwtTokenVerifier {
    fn verify(&self, token: &str) -> Result<AuthSubject, TokenVerificationError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|err| {
            debug!(kind = ?err.kind(), "bearer token rejected");
            map_jwt_error(&err)
        })?;

        let subject = data.claims.sub.unwrap_or_default();
        AuthSubject::new(&subject).map_err(|err| TokenVerificationError::InvalidClaims {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "jwt_tests.rs"]
mod tests;
