//! Cohort benchmark service implementing [`CohortBenchmarks`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{BenchmarkRepository, BenchmarkRepositoryError, CohortBenchmarks};
use crate::domain::{Benchmark, BenchmarkKind, CohortGrade, Error, NewBenchmark};

fn map_benchmark_repository_error(error: BenchmarkRepositoryError) -> Error {
    match error {
        BenchmarkRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("benchmark repository unavailable: {message}"))
        }
        BenchmarkRepositoryError::Query { message } => {
            Error::internal(format!("benchmark repository error: {message}"))
        }
        BenchmarkRepositoryError::DuplicateGrade { kind, grade } => Error::conflict(format!(
            "{kind} benchmark already exists for grade {grade}"
        ))
        .with_details(json!({
            "field": "grade",
            "value": grade,
            "code": "duplicate_grade",
        })),
    }
}

/// Benchmark service delegating to a [`BenchmarkRepository`].
#[derive(Clone)]
pub struct BenchmarkService<B> {
    benchmarks: Arc<B>,
}

impl<B> BenchmarkService<B> {
    /// Create a new service.
    pub fn new(benchmarks: Arc<B>) -> Self {
        Self { benchmarks }
    }
}

#[async_trait]
impl<B> CohortBenchmarks for BenchmarkService<B>
where
    B: BenchmarkRepository,
{
    async fn create(&self, benchmark: NewBenchmark) -> Result<Benchmark, Error> {
        self.benchmarks
            .insert(&benchmark)
            .await
            .map_err(map_benchmark_repository_error)
    }

    async fn list(&self, kind: BenchmarkKind) -> Result<Vec<Benchmark>, Error> {
        self.benchmarks
            .list(kind)
            .await
            .map_err(map_benchmark_repository_error)
    }

    async fn get_by_grade(
        &self,
        kind: BenchmarkKind,
        grade: CohortGrade,
    ) -> Result<Benchmark, Error> {
        self.benchmarks
            .find_by_grade(kind, &grade)
            .await
            .map_err(map_benchmark_repository_error)?
            .ok_or_else(|| Error::not_found(format!("{} not found", kind.noun())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockBenchmarkRepository;
    use crate::domain::{ErrorCode, MeasurementDraft, MeasurementSet};
    use rstest::rstest;

    fn new_benchmark(kind: BenchmarkKind) -> NewBenchmark {
        NewBenchmark {
            kind,
            grade: CohortGrade::new("5").expect("grade"),
            measurements: MeasurementSet::new(MeasurementDraft {
                long_jump_cm: 170.0,
                fifty_meter_run_ms: 8_800.0,
                spider_ms: 12_000.0,
                eight_shape_run_count: 18.0,
                ball_throw_cm: 1_900.0,
            })
            .expect("measurements"),
            total_score: Some(42.0),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_grade_is_a_conflict() {
        let mut repo = MockBenchmarkRepository::new();
        repo.expect_insert().return_once(|benchmark| {
            Err(BenchmarkRepositoryError::duplicate_grade(
                benchmark.kind.as_str(),
                benchmark.grade.as_ref(),
            ))
        });
        let service = BenchmarkService::new(Arc::new(repo));

        let err = service
            .create(new_benchmark(BenchmarkKind::Average))
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), "average benchmark already exists for grade 5");
    }

    #[rstest]
    #[case(BenchmarkKind::Average, "Average data not found")]
    #[case(BenchmarkKind::Max, "Max data not found")]
    #[tokio::test]
    async fn missing_grade_names_the_resource(
        #[case] kind: BenchmarkKind,
        #[case] message: &str,
    ) {
        let mut repo = MockBenchmarkRepository::new();
        repo.expect_find_by_grade()
            .withf(move |requested, grade| *requested == kind && grade.as_ref() == "9")
            .return_once(|_, _| Ok(None));
        let service = BenchmarkService::new(Arc::new(repo));

        let err = service
            .get_by_grade(kind, CohortGrade::new("9").expect("grade"))
            .await
            .expect_err("absent");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), message);
    }

    #[rstest]
    #[tokio::test]
    async fn list_passes_kind_through() {
        let mut repo = MockBenchmarkRepository::new();
        repo.expect_list()
            .withf(|kind| *kind == BenchmarkKind::Max)
            .return_once(|_| Ok(Vec::new()));
        let service = BenchmarkService::new(Arc::new(repo));

        let listed = service.list(BenchmarkKind::Max).await.expect("listed");
        assert!(listed.is_empty());
    }
}
