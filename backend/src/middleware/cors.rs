//! Cross-origin policy for the browser frontends.
//!
//! Origins come from configuration as a comma-separated list. An empty
//! setting or a `*` entry admits any origin. Bearer tokens travel in the
//! `Authorization` header, so credentials mode is never enabled.

use actix_cors::Cors;
use actix_web::http::{Uri, header};
use tracing::warn;

use crate::domain::TRACE_ID_HEADER;

const PREFLIGHT_MAX_AGE_SECS: usize = 3600;

/// Origins allowed to call the API from a browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsOrigins {
    /// Any origin; the request origin is echoed back.
    #[default]
    Any,
    /// Exact `scheme://host[:port]` origins.
    List(Vec<String>),
}

impl CorsOrigins {
    /// Parse a comma-separated origin list.
    ///
    /// Entries that are not absolute origins are skipped with a warning. A
    /// list left empty after filtering falls back to [`CorsOrigins::Any`].
    ///
    /// # Examples
    /// ```
    /// use backend::middleware::CorsOrigins;
    ///
    /// let origins = CorsOrigins::parse(Some("http://localhost:3000, https://karte.example/"));
    /// assert_eq!(
    ///     origins,
    ///     CorsOrigins::List(vec![
    ///         "http://localhost:3000".to_owned(),
    ///         "https://karte.example".to_owned(),
    ///     ])
    /// );
    /// assert_eq!(CorsOrigins::parse(Some("*")), CorsOrigins::Any);
    /// ```
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Any;
        };
        let mut origins = Vec::new();
        for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            if entry == "*" {
                return Self::Any;
            }
            let origin = entry.trim_end_matches('/');
            if is_origin(origin) {
                origins.push(origin.to_owned());
            } else {
                warn!(origin = entry, "ignoring malformed CORS origin");
            }
        }
        if origins.is_empty() {
            Self::Any
        } else {
            Self::List(origins)
        }
    }
}

fn is_origin(candidate: &str) -> bool {
    candidate.parse::<Uri>().is_ok_and(|uri| {
        matches!(uri.scheme_str(), Some("http" | "https"))
            && uri.host().is_some()
            && uri
                .path_and_query()
                .is_none_or(|path| matches!(path.as_str(), "" | "/"))
    })
}

/// Build the actix CORS middleware for `origins`.
pub fn cors(origins: &CorsOrigins) -> Cors {
    let base = match origins {
        CorsOrigins::Any => Cors::default().allow_any_origin(),
        CorsOrigins::List(list) => list
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin)),
    };
    base.allowed_methods(["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([TRACE_ID_HEADER])
        .max_age(PREFLIGHT_MAX_AGE_SECS)
}
