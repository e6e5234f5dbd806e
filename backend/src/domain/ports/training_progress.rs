//! Driving port for user training results and their summary.
//!
//! Writes validate the achievement level and both references before anything
//! is stored.

use async_trait::async_trait;

use crate::domain::{
    Error, TrainingId, TrainingResult, TrainingResultEntry, TrainingResultId,
    TrainingResultWithTraining, TrainingSummary, TrainingType, UserId,
};

/// Driving port for training results, history, and the per-user summary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrainingProgress: Send + Sync {
    /// Record a result.
    async fn record(&self, entry: TrainingResultEntry) -> Result<TrainingResult, Error>;

    /// Replace every field of a result.
    async fn replace(
        &self,
        id: TrainingResultId,
        entry: TrainingResultEntry,
    ) -> Result<TrainingResult, Error>;

    /// Delete a result.
    async fn delete(&self, id: TrainingResultId) -> Result<(), Error>;

    /// A user's history with embedded trainings, newest first.
    async fn history(
        &self,
        user_id: UserId,
        training_type: Option<TrainingType>,
    ) -> Result<Vec<TrainingResultWithTraining>, Error>;

    /// A user's history for one training, newest first.
    async fn history_for_training(
        &self,
        user_id: UserId,
        training_id: TrainingId,
    ) -> Result<Vec<TrainingResult>, Error>;

    /// Per-category counts over the latest result of each training.
    async fn summary(&self, user_id: UserId) -> Result<TrainingSummary, Error>;
}
