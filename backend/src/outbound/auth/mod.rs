//! Bearer token verification adapters.

mod jwt;

pub use jwt::{JwtKey, JwtSettings, JwtSetupError, JwtTokenVerifier};
