use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{TrainingRepository, TrainingRepositoryError};
use crate::domain::{Training, TrainingContent, TrainingId, TrainingType};

use super::{MemoryStore, next};

#[async_trait]
impl TrainingRepository for MemoryStore {
    async fn list(
        &self,
        training_type: Option<TrainingType>,
    ) -> Result<Vec<Training>, TrainingRepositoryError> {
        let tables = self.tables().await;
        let mut trainings: Vec<Training> = tables
            .trainings
            .iter()
            .filter(|training| {
                training_type.is_none_or(|kind| training.content.training_type == kind)
            })
            .cloned()
            .collect();
        trainings.sort_by(Training::catalog_order);
        Ok(trainings)
    }

    async fn find_by_id(
        &self,
        id: TrainingId,
    ) -> Result<Option<Training>, TrainingRepositoryError> {
        let tables = self.tables().await;
        Ok(tables
            .trainings
            .iter()
            .find(|training| training.id == id)
            .cloned())
    }

    async fn insert(
        &self,
        content: &TrainingContent,
        now: DateTime<Utc>,
    ) -> Result<Training, TrainingRepositoryError> {
        let mut tables = self.tables().await;
        let training = Training {
            id: TrainingId::new(next(&mut tables.sequences.training)),
            content: content.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.trainings.push(training.clone());
        Ok(training)
    }

    async fn replace(
        &self,
        id: TrainingId,
        content: &TrainingContent,
        now: DateTime<Utc>,
    ) -> Result<Option<Training>, TrainingRepositoryError> {
        let mut tables = self.tables().await;
        Ok(tables
            .trainings
            .iter_mut()
            .find(|training| training.id == id)
            .map(|training| {
                training.content = content.clone();
                training.updated_at = now;
                training.clone()
            }))
    }

    async fn delete(&self, id: TrainingId) -> Result<bool, TrainingRepositoryError> {
        let mut tables = self.tables().await;
        let before = tables.trainings.len();
        tables.trainings.retain(|training| training.id != id);
        if tables.trainings.len() == before {
            return Ok(false);
        }
        tables
            .training_results
            .retain(|result| result.training_id != id);
        Ok(true)
    }
}
