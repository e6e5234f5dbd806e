use async_trait::async_trait;

use crate::domain::ports::{BenchmarkRepository, BenchmarkRepositoryError};
use crate::domain::{Benchmark, BenchmarkId, BenchmarkKind, CohortGrade, NewBenchmark};

use super::{MemoryStore, next};

#[async_trait]
impl BenchmarkRepository for MemoryStore {
    async fn insert(
        &self,
        benchmark: &NewBenchmark,
    ) -> Result<Benchmark, BenchmarkRepositoryError> {
        let mut tables = self.tables().await;
        if tables
            .benchmarks
            .iter()
            .any(|existing| existing.kind == benchmark.kind && existing.grade == benchmark.grade)
        {
            return Err(BenchmarkRepositoryError::duplicate_grade(
                benchmark.kind.as_str(),
                benchmark.grade.as_ref(),
            ));
        }
        let id = BenchmarkId::new(next(&mut tables.sequences.benchmark));
        let stored = Benchmark::from_new(id, benchmark.clone());
        tables.benchmarks.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self, kind: BenchmarkKind) -> Result<Vec<Benchmark>, BenchmarkRepositoryError> {
        let tables = self.tables().await;
        let mut benchmarks: Vec<Benchmark> = tables
            .benchmarks
            .iter()
            .filter(|benchmark| benchmark.kind == kind)
            .cloned()
            .collect();
        benchmarks.sort_by(|a, b| a.grade.cmp(&b.grade).then_with(|| a.id.cmp(&b.id)));
        Ok(benchmarks)
    }

    async fn find_by_grade(
        &self,
        kind: BenchmarkKind,
        grade: &CohortGrade,
    ) -> Result<Option<Benchmark>, BenchmarkRepositoryError> {
        let tables = self.tables().await;
        Ok(tables
            .benchmarks
            .iter()
            .find(|benchmark| benchmark.kind == kind && &benchmark.grade == grade)
            .cloned())
    }
}
