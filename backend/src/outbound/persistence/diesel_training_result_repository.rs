//! PostgreSQL-backed `TrainingResultRepository`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TrainingResultRepository, TrainingResultRepositoryError};
use crate::domain::{
    Training, TrainingId, TrainingResult, TrainingResultEntry, TrainingResultId,
    TrainingResultWithTraining, TrainingStatusRow, TrainingType, UserId,
};

use super::error_mapping::{StoreFailure, warn_unrecognised};
use super::models::{TrainingResultRow, TrainingResultWriteRow, TrainingRow};
use super::pool::DbPool;
use super::schema::{trainings, user_training_results};

const USER_CONSTRAINT: &str = "user_training_results_user_id_fkey";
const TRAINING_CONSTRAINT: &str = "user_training_results_training_id_fkey";

/// Diesel implementation of the training result store.
#[derive(Clone)]
pub struct DieselTrainingResultRepository {
    pool: DbPool,
}

impl DieselTrainingResultRepository {
    /// Repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StoreFailure>) -> TrainingResultRepositoryError {
    match failure.into() {
        StoreFailure::Connection(message) => TrainingResultRepositoryError::connection(message),
        StoreFailure::Query(message) => TrainingResultRepositoryError::query(message),
        failure if failure.violates(USER_CONSTRAINT) => {
            TrainingResultRepositoryError::missing_reference("User not found")
        }
        failure if failure.violates(TRAINING_CONSTRAINT) => {
            TrainingResultRepositoryError::missing_reference("Training not found")
        }
        other => {
            warn_unrecognised("user_training_results", &other);
            TrainingResultRepositoryError::query(other.message())
        }
    }
}

fn with_training(
    (result, training): (TrainingResultRow, TrainingRow),
) -> Result<TrainingResultWithTraining, TrainingResultRepositoryError> {
    let training = Training::try_from(training)
        .map_err(|err| TrainingResultRepositoryError::query(err.to_string()))?;
    Ok(TrainingResultWithTraining {
        result: result.into(),
        training,
    })
}

#[async_trait]
impl TrainingResultRepository for DieselTrainingResultRepository {
    async fn insert(
        &self,
        entry: &TrainingResultEntry,
        now: DateTime<Utc>,
    ) -> Result<TrainingResult, TrainingResultRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: TrainingResultRow = diesel::insert_into(user_training_results::table)
            .values(&TrainingResultWriteRow::new(entry, now))
            .returning(TrainingResultRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(row.into())
    }

    async fn replace(
        &self,
        id: TrainingResultId,
        entry: &TrainingResultEntry,
        now: DateTime<Utc>,
    ) -> Result<Option<TrainingResult>, TrainingResultRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<TrainingResultRow> =
            diesel::update(user_training_results::table.find(id.get()))
                .set(&TrainingResultWriteRow::new(entry, now))
                .returning(TrainingResultRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_failure)?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: TrainingResultId) -> Result<bool, TrainingResultRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let deleted = diesel::delete(user_training_results::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(deleted > 0)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        training_type: Option<TrainingType>,
    ) -> Result<Vec<TrainingResultWithTraining>, TrainingResultRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let mut query = user_training_results::table
            .inner_join(trainings::table)
            .filter(user_training_results::user_id.eq(*user_id.as_uuid()))
            .order((
                user_training_results::date.desc(),
                user_training_results::id.desc(),
            ))
            .select((TrainingResultRow::as_select(), TrainingRow::as_select()))
            .into_boxed();
        if let Some(kind) = training_type {
            query = query.filter(trainings::training_type.eq(kind.code()));
        }
        let rows: Vec<(TrainingResultRow, TrainingRow)> =
            query.load(&mut conn).await.map_err(map_failure)?;

        rows.into_iter().map(with_training).collect()
    }

    async fn list_for_user_training(
        &self,
        user_id: &UserId,
        training_id: TrainingId,
    ) -> Result<Vec<TrainingResult>, TrainingResultRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<TrainingResultRow> = user_training_results::table
            .filter(user_training_results::user_id.eq(*user_id.as_uuid()))
            .filter(user_training_results::training_id.eq(training_id.get()))
            .order((
                user_training_results::date.desc(),
                user_training_results::id.desc(),
            ))
            .select(TrainingResultRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn status_rows(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<TrainingStatusRow>, TrainingResultRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<(i64, i64, i16, NaiveDate, i16)> = user_training_results::table
            .inner_join(trainings::table)
            .filter(user_training_results::user_id.eq(*user_id.as_uuid()))
            .select((
                user_training_results::id,
                user_training_results::training_id,
                trainings::training_type,
                user_training_results::date,
                user_training_results::achievement_level,
            ))
            .load(&mut conn)
            .await
            .map_err(map_failure)?;

        Ok(rows
            .into_iter()
            .map(
                |(result_id, training_id, training_type, date, level_code)| TrainingStatusRow {
                    result_id: TrainingResultId::new(result_id),
                    training_id: TrainingId::new(training_id),
                    training_type,
                    date,
                    level_code,
                },
            )
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(USER_CONSTRAINT, "User not found")]
    #[case(TRAINING_CONSTRAINT, "Training not found")]
    fn foreign_keys_name_the_missing_row(#[case] constraint: &str, #[case] expected: &str) {
        let error = map_failure(StoreFailure::ForeignKeyViolation {
            constraint: Some(constraint.to_owned()),
        });
        assert!(matches!(
            error,
            TrainingResultRepositoryError::MissingReference { message } if message == expected
        ));
    }
}
