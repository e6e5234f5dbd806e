//! Domain errors as HTTP responses.
//!
//! `Error` implements [`ResponseError`] so handlers can return it directly.
//! Extractor failures (bad JSON, query strings, or path segments) are routed
//! through the same envelope by the handlers in this module.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use serde_json::json;
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    let redacted = Error::internal("Internal server error");
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if self.code() == ErrorCode::InternalError {
            error!(message = self.message(), trace_id = ?self.trace_id(), "internal error");
        }
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// Map body deserialisation failures to `invalid_request`.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!(path = req.path(), error = %err, "rejected JSON body");
    let error = match &err {
        JsonPayloadError::ContentType => {
            Error::invalid_request("Content-Type must be application/json")
                .with_details(json!({ "code": "unsupported_content_type" }))
        }
        JsonPayloadError::Deserialize(inner) => Error::invalid_request(inner.to_string())
            .with_details(json!({
                "code": "invalid_json",
                "line": inner.line(),
                "column": inner.column(),
            })),
        other => Error::invalid_request(other.to_string())
            .with_details(json!({ "code": "invalid_json" })),
    };
    error.into()
}

/// Map query string failures to `invalid_request`.
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!(path = req.path(), error = %err, "rejected query string");
    Error::invalid_request(err.to_string())
        .with_details(json!({ "code": "invalid_query" }))
        .into()
}

/// Map path segment failures to `invalid_request`.
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    warn!(path = req.path(), error = %err, "rejected path parameters");
    Error::invalid_request(err.to_string())
        .with_details(json!({ "code": "invalid_path" }))
        .into()
}

/// Extractor configuration that sends every failure through [`Error`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use backend::inbound::http::error::configure_extractors;
///
/// let app = App::new().configure(configure_extractors);
/// ```
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));
}
