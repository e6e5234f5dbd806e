//! PostgreSQL-backed `TrainingRepository`.
//!
//! Deleting a training relies on `ON DELETE CASCADE` to drop the results
//! recorded against it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TrainingRepository, TrainingRepositoryError};
use crate::domain::{Training, TrainingContent, TrainingId, TrainingType};

use super::error_mapping::{StoreFailure, warn_unrecognised};
use super::models::{TrainingRow, TrainingWriteRow};
use super::pool::DbPool;
use super::schema::trainings;

/// Diesel implementation of the training catalog.
#[derive(Clone)]
pub struct DieselTrainingRepository {
    pool: DbPool,
}

impl DieselTrainingRepository {
    /// Repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StoreFailure>) -> TrainingRepositoryError {
    match failure.into() {
        StoreFailure::Connection(message) => TrainingRepositoryError::connection(message),
        StoreFailure::Query(message) => TrainingRepositoryError::query(message),
        other => {
            warn_unrecognised("trainings", &other);
            TrainingRepositoryError::query(other.message())
        }
    }
}

fn into_training(row: TrainingRow) -> Result<Training, TrainingRepositoryError> {
    Training::try_from(row).map_err(|err| TrainingRepositoryError::query(err.to_string()))
}

#[async_trait]
impl TrainingRepository for DieselTrainingRepository {
    async fn list(
        &self,
        training_type: Option<TrainingType>,
    ) -> Result<Vec<Training>, TrainingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let mut query = trainings::table
            .select(TrainingRow::as_select())
            .order((
                trainings::series_name.asc().nulls_last(),
                trainings::series_number.asc().nulls_last(),
                trainings::page_number.asc().nulls_last(),
                trainings::id.asc(),
            ))
            .into_boxed();
        if let Some(kind) = training_type {
            query = query.filter(trainings::training_type.eq(kind.code()));
        }
        let rows: Vec<TrainingRow> = query.load(&mut conn).await.map_err(map_failure)?;

        rows.into_iter().map(into_training).collect()
    }

    async fn find_by_id(
        &self,
        id: TrainingId,
    ) -> Result<Option<Training>, TrainingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<TrainingRow> = trainings::table
            .find(id.get())
            .select(TrainingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;

        row.map(into_training).transpose()
    }

    async fn insert(
        &self,
        content: &TrainingContent,
        now: DateTime<Utc>,
    ) -> Result<Training, TrainingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: TrainingRow = diesel::insert_into(trainings::table)
            .values(&TrainingWriteRow::new(content, now))
            .returning(TrainingRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_failure)?;

        into_training(row)
    }

    async fn replace(
        &self,
        id: TrainingId,
        content: &TrainingContent,
        now: DateTime<Utc>,
    ) -> Result<Option<Training>, TrainingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<TrainingRow> = diesel::update(trainings::table.find(id.get()))
            .set(&TrainingWriteRow::new(content, now))
            .returning(TrainingRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;

        row.map(into_training).transpose()
    }

    async fn delete(&self, id: TrainingId) -> Result<bool, TrainingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let deleted = diesel::delete(trainings::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(deleted > 0)
    }
}
