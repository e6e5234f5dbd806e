//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`TokenVerifier`]) are implemented by
//! outbound adapters. Driving ports are implemented by the domain services
//! and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod benchmark_repository;
mod cohort_benchmarks;
mod physical_test_results;
mod token_verifier;
mod training_catalogue;
mod training_progress;
mod training_repository;
mod training_result_repository;
mod user_accounts;
mod user_repository;
mod user_result_repository;

#[cfg(test)]
pub use benchmark_repository::MockBenchmarkRepository;
pub use benchmark_repository::{BenchmarkRepository, BenchmarkRepositoryError};
#[cfg(test)]
pub use cohort_benchmarks::MockCohortBenchmarks;
pub use cohort_benchmarks::CohortBenchmarks;
#[cfg(test)]
pub use physical_test_results::MockPhysicalTestResults;
pub use physical_test_results::PhysicalTestResults;
#[cfg(test)]
pub use token_verifier::MockTokenVerifier;
pub use token_verifier::{TokenVerificationError, TokenVerifier};
#[cfg(test)]
pub use training_catalogue::MockTrainingCatalogue;
pub use training_catalogue::TrainingCatalogue;
#[cfg(test)]
pub use training_progress::MockTrainingProgress;
pub use training_progress::TrainingProgress;
#[cfg(test)]
pub use training_repository::MockTrainingRepository;
pub use training_repository::{TrainingRepository, TrainingRepositoryError};
#[cfg(test)]
pub use training_result_repository::MockTrainingResultRepository;
pub use training_result_repository::{TrainingResultRepository, TrainingResultRepositoryError};
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::UserAccounts;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
#[cfg(test)]
pub use user_result_repository::MockUserResultRepository;
pub use user_result_repository::{UserResultRepository, UserResultRepositoryError};
