//! Training progress service implementing [`TrainingProgress`].
//!
//! Writes check the user and the training before inserting, so a rejected
//! request never reaches the result store.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    TrainingProgress, TrainingRepository, TrainingResultRepository, TrainingResultRepositoryError,
    UserRepository,
};
use crate::domain::training_catalogue_service::{
    map_training_repository_error, training_not_found,
};
use crate::domain::user_service::map_user_repository_error;
use crate::domain::{
    Error, TrainingId, TrainingResult, TrainingResultEntry, TrainingResultId,
    TrainingResultWithTraining, TrainingSummary, TrainingType, UserId, summarise,
};

fn map_training_result_repository_error(error: TrainingResultRepositoryError) -> Error {
    match error {
        TrainingResultRepositoryError::Connection { message } => Error::service_unavailable(
            format!("training result repository unavailable: {message}"),
        ),
        TrainingResultRepositoryError::Query { message } => {
            Error::internal(format!("training result repository error: {message}"))
        }
        TrainingResultRepositoryError::MissingReference { message } => Error::not_found(message),
    }
}

fn result_not_found() -> Error {
    Error::not_found("User training result not found")
}

/// Service coordinating users, the catalog, and training results.
#[derive(Clone)]
pub struct TrainingProgressService<U, T, R> {
    users: Arc<U>,
    trainings: Arc<T>,
    results: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<U, T, R> TrainingProgressService<U, T, R> {
    /// Create a new service.
    pub fn new(users: Arc<U>, trainings: Arc<T>, results: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            trainings,
            results,
            clock,
        }
    }
}

impl<U, T, R> TrainingProgressService<U, T, R>
where
    U: UserRepository,
    T: TrainingRepository,
    R: TrainingResultRepository,
{
    async fn ensure_user(&self, user_id: &UserId) -> Result<(), Error> {
        match self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_repository_error)?
        {
            Some(_) => Ok(()),
            None => Err(Error::not_found("User not found")),
        }
    }

    async fn ensure_references(&self, entry: &TrainingResultEntry) -> Result<(), Error> {
        self.ensure_user(&entry.user_id).await?;
        match self
            .trainings
            .find_by_id(entry.training_id)
            .await
            .map_err(map_training_repository_error)?
        {
            Some(_) => Ok(()),
            None => Err(training_not_found()),
        }
    }
}

#[async_trait]
impl<U, T, R> TrainingProgress for TrainingProgressService<U, T, R>
where
    U: UserRepository,
    T: TrainingRepository,
    R: TrainingResultRepository,
{
    async fn record(&self, entry: TrainingResultEntry) -> Result<TrainingResult, Error> {
        self.ensure_references(&entry).await?;
        self.results
            .insert(&entry, self.clock.utc())
            .await
            .map_err(map_training_result_repository_error)
    }

    async fn replace(
        &self,
        id: TrainingResultId,
        entry: TrainingResultEntry,
    ) -> Result<TrainingResult, Error> {
        self.ensure_references(&entry).await?;
        self.results
            .replace(id, &entry, self.clock.utc())
            .await
            .map_err(map_training_result_repository_error)?
            .ok_or_else(result_not_found)
    }

    async fn delete(&self, id: TrainingResultId) -> Result<(), Error> {
        let deleted = self
            .results
            .delete(id)
            .await
            .map_err(map_training_result_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(result_not_found())
        }
    }

    async fn history(
        &self,
        user_id: UserId,
        training_type: Option<TrainingType>,
    ) -> Result<Vec<TrainingResultWithTraining>, Error> {
        self.results
            .list_for_user(&user_id, training_type)
            .await
            .map_err(map_training_result_repository_error)
    }

    async fn history_for_training(
        &self,
        user_id: UserId,
        training_id: TrainingId,
    ) -> Result<Vec<TrainingResult>, Error> {
        self.results
            .list_for_user_training(&user_id, training_id)
            .await
            .map_err(map_training_result_repository_error)
    }

    async fn summary(&self, user_id: UserId) -> Result<TrainingSummary, Error> {
        self.ensure_user(&user_id).await?;
        let rows = self
            .results
            .status_rows(&user_id)
            .await
            .map_err(map_training_result_repository_error)?;
        Ok(summarise(user_id, rows))
    }
}

#[cfg(test)]
#[path = "training_progress_service_tests.rs"]
mod tests;
