//! Bearer token extraction for authenticated endpoints.
//!
//! Verification is delegated to the [`TokenVerifier`] held in [`HttpState`];
//! handlers only ever see the verified subject.
//!
//! [`TokenVerifier`]: crate::domain::ports::TokenVerifier

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::{debug, error};

use crate::domain::{AuthSubject, Error};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Subject of a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated(pub AuthSubject);

fn unauthorized() -> Error {
    Error::unauthorized("Unauthorized")
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(unauthorized)?
        .to_str()
        .map_err(|_| unauthorized())?;
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(unauthorized)?;
    Ok(token)
}

fn authenticate(req: &HttpRequest) -> Result<Authenticated, Error> {
    let state = req.app_data::<web::Data<HttpState>>().ok_or_else(|| {
        error!("HttpState missing from app data");
        Error::internal("HTTP state is not configured")
    })?;
    let verifier = state.token_verifier.as_ref().ok_or_else(|| {
        Error::service_unavailable("Token verification is not configured")
    })?;
    let token = bearer_token(req)?;
    verifier.verify(token).map(Authenticated).map_err(|err| {
        debug!(error = %err, "bearer token verification failed");
        unauthorized()
    })
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
