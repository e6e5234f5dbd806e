//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use backend::domain::ports::TokenVerifier;
use backend::middleware::CorsOrigins;
use backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) token_verifier: Option<Arc<dyn TokenVerifier>>,
    pub(crate) cors_origins: CorsOrigins,
}

impl ServerConfig {
    /// Configuration serving the in-memory store with no token verifier and
    /// any browser origin admitted.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            token_verifier: None,
            cors_origins: CorsOrigins::Any,
        }
    }

    /// Attach a database connection pool.
    ///
    /// When provided, every repository port is served by its Diesel adapter.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach the bearer token verifier used by `/me`.
    #[must_use]
    pub fn with_token_verifier(mut self, verifier: Arc<dyn TokenVerifier>) -> Self {
        self.token_verifier = Some(verifier);
        self
    }

    /// Restrict browser access to the given origins.
    #[must_use]
    pub fn with_cors_origins(mut self, origins: CorsOrigins) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
