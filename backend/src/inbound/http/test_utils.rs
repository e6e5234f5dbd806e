//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::DefaultClock;

use crate::outbound::memory::MemoryStore;

use super::error::configure_extractors;
use super::state::{HttpState, HttpStatePorts};

/// Handler state backed by a fresh in-memory store.
pub(crate) fn memory_state() -> HttpState {
    let store = Arc::new(MemoryStore::new());
    HttpState::new(HttpStatePorts::from_repositories(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store,
        Arc::new(DefaultClock),
    ))
}

/// App with the given state and the shared extractor error handlers.
pub(crate) fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .configure(configure_extractors)
}
