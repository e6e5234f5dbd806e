//! Port for user training result persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    TrainingId, TrainingResult, TrainingResultEntry, TrainingResultId, TrainingResultWithTraining,
    TrainingStatusRow, TrainingType, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by training result adapters.
    pub enum TrainingResultRepositoryError ("training result repository") {
        /// The referenced user or training vanished before the write.
        MissingReference { message: String } => "referenced row not found: {message}",
    }
}

/// Storage for user training results.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrainingResultRepository: Send + Sync {
    /// Insert a result stamped with `now`.
    async fn insert(
        &self,
        entry: &TrainingResultEntry,
        now: DateTime<Utc>,
    ) -> Result<TrainingResult, TrainingResultRepositoryError>;

    /// Replace every field of a result. Returns `None` when it is absent.
    async fn replace(
        &self,
        id: TrainingResultId,
        entry: &TrainingResultEntry,
        now: DateTime<Utc>,
    ) -> Result<Option<TrainingResult>, TrainingResultRepositoryError>;

    /// Delete a result. Returns `false` when absent.
    async fn delete(&self, id: TrainingResultId) -> Result<bool, TrainingResultRepositoryError>;

    /// A user's results joined with their trainings, newest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        training_type: Option<TrainingType>,
    ) -> Result<Vec<TrainingResultWithTraining>, TrainingResultRepositoryError>;

    /// A user's results for one training, newest first.
    async fn list_for_user_training(
        &self,
        user_id: &UserId,
        training_id: TrainingId,
    ) -> Result<Vec<TrainingResult>, TrainingResultRepositoryError>;

    /// Every result of a user reduced to the columns the summary needs.
    async fn status_rows(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<TrainingStatusRow>, TrainingResultRepositoryError>;
}
