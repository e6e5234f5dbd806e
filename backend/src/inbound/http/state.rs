//! Shared HTTP adapter state.
//!
//! Handlers receive [`HttpState`] through `web::Data` and only see driving
//! ports, so they stay testable without a database.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    BenchmarkRepository, CohortBenchmarks, PhysicalTestResults, TokenVerifier, TrainingCatalogue,
    TrainingProgress, TrainingRepository, TrainingResultRepository, UserAccounts,
    UserRepository, UserResultRepository,
};
use crate::domain::{
    BenchmarkService, PhysicalTestService, TrainingCatalogueService, TrainingProgressService,
    UserAccountService,
};

/// Parameter object bundling the driving ports used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// User account operations.
    pub users: Arc<dyn UserAccounts>,
    /// Physical test result operations.
    pub physical_tests: Arc<dyn PhysicalTestResults>,
    /// Cohort benchmark operations.
    pub benchmarks: Arc<dyn CohortBenchmarks>,
    /// Training catalogue operations.
    pub trainings: Arc<dyn TrainingCatalogue>,
    /// Training result and summary operations.
    pub training_progress: Arc<dyn TrainingProgress>,
}

impl HttpStatePorts {
    /// Wire the domain services over a set of repositories.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::inbound::http::state::HttpStatePorts;
    /// use backend::outbound::memory::MemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(MemoryStore::default());
    /// let ports = HttpStatePorts::from_repositories(
    ///     store.clone(),
    ///     store.clone(),
    ///     store.clone(),
    ///     store.clone(),
    ///     store,
    ///     Arc::new(DefaultClock),
    /// );
    /// let _users = ports.users.clone();
    /// ```
    pub fn from_repositories<U, R, B, T, P>(
        users: Arc<U>,
        user_results: Arc<R>,
        benchmarks: Arc<B>,
        trainings: Arc<T>,
        training_results: Arc<P>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        U: UserRepository + 'static,
        R: UserResultRepository + 'static,
        B: BenchmarkRepository + 'static,
        T: TrainingRepository + 'static,
        P: TrainingResultRepository + 'static,
    {
        Self {
            users: Arc::new(UserAccountService::new(
                users.clone(),
                user_results.clone(),
                clock.clone(),
            )),
            physical_tests: Arc::new(PhysicalTestService::new(users.clone(), user_results)),
            benchmarks: Arc::new(BenchmarkService::new(benchmarks)),
            trainings: Arc::new(TrainingCatalogueService::new(trainings.clone(), clock.clone())),
            training_progress: Arc::new(TrainingProgressService::new(
                users,
                trainings,
                training_results,
                clock,
            )),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// User account operations.
    pub users: Arc<dyn UserAccounts>,
    /// Physical test result operations.
    pub physical_tests: Arc<dyn PhysicalTestResults>,
    /// Cohort benchmark operations.
    pub benchmarks: Arc<dyn CohortBenchmarks>,
    /// Training catalogue operations.
    pub trainings: Arc<dyn TrainingCatalogue>,
    /// Training result and summary operations.
    pub training_progress: Arc<dyn TrainingProgress>,
    /// Absent when no signing key is configured; `/me` then answers 503.
    pub token_verifier: Option<Arc<dyn TokenVerifier>>,
}

impl HttpState {
    /// Build state from the port bundle, without a token verifier.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users,
            physical_tests,
            benchmarks,
            trainings,
            training_progress,
        } = ports;
        Self {
            users,
            physical_tests,
            benchmarks,
            trainings,
            training_progress,
            token_verifier: None,
        }
    }

    /// Enable bearer token verification.
    #[must_use]
    pub fn with_token_verifier(mut self, verifier: Arc<dyn TokenVerifier>) -> Self {
        self.token_verifier = Some(verifier);
        self
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
