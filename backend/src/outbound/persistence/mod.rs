//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay private;
//! repositories only translate between rows and domain types, and every
//! database failure is classified once in `error_mapping.rs`.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/karte")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_benchmark_repository;
mod diesel_training_repository;
mod diesel_training_result_repository;
mod diesel_user_repository;
mod diesel_user_result_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_benchmark_repository::DieselBenchmarkRepository;
pub use diesel_training_repository::DieselTrainingRepository;
pub use diesel_training_result_repository::DieselTrainingResultRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_user_result_repository::DieselUserResultRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
