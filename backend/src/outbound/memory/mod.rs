//! In-memory repositories implementing every persistence port.
//!
//! One [`MemoryStore`] holds all tables so cross-table rules behave like the
//! relational store: foreign keys are checked on insert and deleting a user
//! or training cascades to dependent results. Used when the server runs
//! without a database and by the HTTP test suites.

mod benchmarks;
mod training_results;
mod trainings;
mod user_results;
mod users;

use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{Benchmark, Training, TrainingResult, User, UserResult};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    user_results: Vec<UserResult>,
    benchmarks: Vec<Benchmark>,
    trainings: Vec<Training>,
    training_results: Vec<TrainingResult>,
    sequences: Sequences,
}

#[derive(Debug, Default)]
struct Sequences {
    user_result: i64,
    benchmark: i64,
    training: i64,
    training_result: i64,
}

fn next(sequence: &mut i64) -> i64 {
    *sequence += 1;
    *sequence
}

/// Shared in-process tables.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    async fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().await
    }
}
