//! Port for cohort benchmark persistence.
use async_trait::async_trait;

use crate::domain::{Benchmark, BenchmarkKind, CohortGrade, NewBenchmark};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by benchmark adapters.
    pub enum BenchmarkRepositoryError ("benchmark repository") {
        /// A benchmark of the same kind already exists for the grade.
        DuplicateGrade { kind: String, grade: String } =>
            "{kind} benchmark already exists for grade {grade}",
    }
}

/// Storage for cohort benchmark rows, unique per kind and grade.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BenchmarkRepository: Send + Sync {
    /// Insert a benchmark and return it with its issued identifier.
    async fn insert(&self, benchmark: &NewBenchmark) -> Result<Benchmark, BenchmarkRepositoryError>;

    /// Every benchmark of `kind`, by grade ascending.
    async fn list(&self, kind: BenchmarkKind) -> Result<Vec<Benchmark>, BenchmarkRepositoryError>;

    /// The benchmark of `kind` for `grade`, if any.
    async fn find_by_grade(
        &self,
        kind: BenchmarkKind,
        grade: &CohortGrade,
    ) -> Result<Option<Benchmark>, BenchmarkRepositoryError>;
}
