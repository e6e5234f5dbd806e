//! PostgreSQL-backed `BenchmarkRepository` for both benchmark kinds.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{BenchmarkRepository, BenchmarkRepositoryError};
use crate::domain::{Benchmark, BenchmarkKind, CohortGrade, NewBenchmark};

use super::error_mapping::{StoreFailure, warn_unrecognised};
use super::models::{BenchmarkRow, NewBenchmarkRow};
use super::pool::DbPool;
use super::schema::cohort_benchmarks;

const KIND_GRADE_CONSTRAINT: &str = "cohort_benchmarks_kind_grade_key";

/// Diesel implementation of the cohort benchmark store.
#[derive(Clone)]
pub struct DieselBenchmarkRepository {
    pool: DbPool,
}

impl DieselBenchmarkRepository {
    /// Repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StoreFailure>) -> BenchmarkRepositoryError {
    match failure.into() {
        StoreFailure::Connection(message) => BenchmarkRepositoryError::connection(message),
        StoreFailure::Query(message) => BenchmarkRepositoryError::query(message),
        other => {
            warn_unrecognised("cohort_benchmarks", &other);
            BenchmarkRepositoryError::query(other.message())
        }
    }
}

fn into_benchmark(row: BenchmarkRow) -> Result<Benchmark, BenchmarkRepositoryError> {
    Benchmark::try_from(row).map_err(|err| BenchmarkRepositoryError::query(err.to_string()))
}

#[async_trait]
impl BenchmarkRepository for DieselBenchmarkRepository {
    async fn insert(
        &self,
        benchmark: &NewBenchmark,
    ) -> Result<Benchmark, BenchmarkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let inserted = diesel::insert_into(cohort_benchmarks::table)
            .values(&NewBenchmarkRow::from(benchmark))
            .returning(BenchmarkRow::as_returning())
            .get_result(&mut conn)
            .await;

        match inserted.map_err(StoreFailure::from) {
            Ok(row) => into_benchmark(row),
            Err(failure) if failure.violates(KIND_GRADE_CONSTRAINT) => {
                Err(BenchmarkRepositoryError::duplicate_grade(
                    benchmark.kind.as_str(),
                    benchmark.grade.as_ref(),
                ))
            }
            Err(failure) => Err(map_failure(failure)),
        }
    }

    async fn list(&self, kind: BenchmarkKind) -> Result<Vec<Benchmark>, BenchmarkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<BenchmarkRow> = cohort_benchmarks::table
            .filter(cohort_benchmarks::kind.eq(kind.as_str()))
            .order(cohort_benchmarks::grade.asc())
            .select(BenchmarkRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;

        rows.into_iter().map(into_benchmark).collect()
    }

    async fn find_by_grade(
        &self,
        kind: BenchmarkKind,
        grade: &CohortGrade,
    ) -> Result<Option<Benchmark>, BenchmarkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<BenchmarkRow> = cohort_benchmarks::table
            .filter(cohort_benchmarks::kind.eq(kind.as_str()))
            .filter(cohort_benchmarks::grade.eq(grade.as_ref()))
            .select(BenchmarkRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;

        row.map(into_benchmark).transpose()
    }
}
