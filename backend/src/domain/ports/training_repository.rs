//! Port for the training catalog store.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Training, TrainingContent, TrainingId, TrainingType};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by catalog adapters.
    pub enum TrainingRepositoryError ("training repository") {}
}

/// Storage for training catalogue entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrainingRepository: Send + Sync {
    /// Catalog entries in catalog order, optionally limited to one type.
    async fn list(
        &self,
        training_type: Option<TrainingType>,
    ) -> Result<Vec<Training>, TrainingRepositoryError>;

    /// Fetch one entry.
    async fn find_by_id(&self, id: TrainingId) -> Result<Option<Training>, TrainingRepositoryError>;

    /// Insert an entry stamped with `now`.
    async fn insert(
        &self,
        content: &TrainingContent,
        now: DateTime<Utc>,
    ) -> Result<Training, TrainingRepositoryError>;

    /// Replace every field of an entry. Returns `None` when it is absent.
    async fn replace(
        &self,
        id: TrainingId,
        content: &TrainingContent,
        now: DateTime<Utc>,
    ) -> Result<Option<Training>, TrainingRepositoryError>;

    /// Delete an entry together with its results. Returns `false` when absent.
    async fn delete(&self, id: TrainingId) -> Result<bool, TrainingRepositoryError>;
}
