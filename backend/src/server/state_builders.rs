//! Builders wiring repositories into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::MemoryStore;
use backend::outbound::persistence::{
    DbPool, DieselBenchmarkRepository, DieselTrainingRepository, DieselTrainingResultRepository,
    DieselUserRepository, DieselUserResultRepository,
};

use super::ServerConfig;

/// Use `with_pool` when a pool is configured, otherwise a fresh in-memory store.
fn select_ports<Pool>(
    pool: &Option<Pool>,
    clock: Arc<dyn Clock>,
    with_pool: impl FnOnce(&Pool, Arc<dyn Clock>) -> HttpStatePorts,
) -> HttpStatePorts {
    match pool {
        Some(pool) => with_pool(pool, clock),
        None => memory_ports(clock),
    }
}

fn memory_ports(clock: Arc<dyn Clock>) -> HttpStatePorts {
    info!("serving from the in-memory store");
    let store = Arc::new(MemoryStore::new());
    HttpStatePorts::from_repositories(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store,
        clock,
    )
}

fn diesel_ports(pool: &DbPool, clock: Arc<dyn Clock>) -> HttpStatePorts {
    info!("serving from PostgreSQL");
    HttpStatePorts::from_repositories(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselUserResultRepository::new(pool.clone())),
        Arc::new(DieselBenchmarkRepository::new(pool.clone())),
        Arc::new(DieselTrainingRepository::new(pool.clone())),
        Arc::new(DieselTrainingResultRepository::new(pool.clone())),
        clock,
    )
}

/// Build the shared handler state from the server configuration.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = select_ports(&config.db_pool, Arc::new(DefaultClock), diesel_ports);
    let state = HttpState::new(ports);
    let state = match &config.token_verifier {
        Some(verifier) => state.with_token_verifier(verifier.clone()),
        None => state,
    };
    web::Data::new(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use backend::domain::{Grade, PageRequest, UserDraft, UserName};
    use rstest::rstest;

    fn seeded_ports(clock: Arc<dyn Clock>) -> HttpStatePorts {
        let store = Arc::new(MemoryStore::new());
        HttpStatePorts::from_repositories(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            clock,
        )
    }

    #[rstest]
    #[tokio::test]
    async fn pool_present_uses_pool_builder() {
        let called = Cell::new(false);
        let ports = select_ports(&Some(()), Arc::new(DefaultClock), |_, clock| {
            called.set(true);
            seeded_ports(clock)
        });
        assert!(called.get());

        ports
            .users
            .create_user(UserDraft {
                name: UserName::new("Aoi").expect("valid name"),
                grade: Grade::default(),
                birthday: None,
                auth_subject: None,
            })
            .await
            .expect("user created");
        let listed = ports
            .users
            .list_users(PageRequest::default())
            .await
            .expect("users listed");
        assert_eq!(listed.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn pool_absent_falls_back_to_memory() {
        let ports = select_ports::<()>(&None, Arc::new(DefaultClock), |_, _| {
            panic!("no pool configured")
        });
        let listed = ports
            .users
            .list_users(PageRequest::default())
            .await
            .expect("users listed");
        assert!(listed.is_empty());
    }
}
