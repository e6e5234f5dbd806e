//! Driving port for average and maximum benchmarks.

use async_trait::async_trait;

use crate::domain::{Benchmark, BenchmarkKind, CohortGrade, Error, NewBenchmark};

/// Driving port for `/average_data/` and `/max_data/`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CohortBenchmarks: Send + Sync {
    /// Store a benchmark. A second one for the same kind and grade conflicts.
    async fn create(&self, benchmark: NewBenchmark) -> Result<Benchmark, Error>;

    /// Every benchmark of `kind`.
    async fn list(&self, kind: BenchmarkKind) -> Result<Vec<Benchmark>, Error>;

    /// The benchmark of `kind` for `grade`.
    async fn get_by_grade(&self, kind: BenchmarkKind, grade: CohortGrade)
    -> Result<Benchmark, Error>;
}
