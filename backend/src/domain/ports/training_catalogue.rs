//! Driving port for the training catalog.

use async_trait::async_trait;

use crate::domain::{Error, Training, TrainingContent, TrainingId, TrainingType};

/// Driving port for the training catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrainingCatalogue: Send + Sync {
    /// Catalog entries, optionally of one type.
    async fn list(&self, training_type: Option<TrainingType>) -> Result<Vec<Training>, Error>;

    /// One catalog entry.
    async fn get(&self, id: TrainingId) -> Result<Training, Error>;

    /// Add an entry.
    async fn create(&self, content: TrainingContent) -> Result<Training, Error>;

    /// Replace every field of an entry.
    async fn replace(&self, id: TrainingId, content: TrainingContent) -> Result<Training, Error>;

    /// Remove an entry and the results recorded against it.
    async fn delete(&self, id: TrainingId) -> Result<(), Error>;
}
