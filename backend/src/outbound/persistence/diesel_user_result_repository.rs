//! PostgreSQL-backed `UserResultRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserResultRepository, UserResultRepositoryError};
use crate::domain::{NewUserResult, UserId, UserResult, UserResultId};

use super::error_mapping::{StoreFailure, warn_unrecognised};
use super::models::{NewUserResultRow, UserResultRow};
use super::pool::DbPool;
use super::schema::user_results;

const USER_CONSTRAINT: &str = "user_results_user_id_fkey";

/// Diesel implementation of the physical test result store.
#[derive(Clone)]
pub struct DieselUserResultRepository {
    pool: DbPool,
}

impl DieselUserResultRepository {
    /// Repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StoreFailure>) -> UserResultRepositoryError {
    match failure.into() {
        StoreFailure::Connection(message) => UserResultRepositoryError::connection(message),
        StoreFailure::Query(message) => UserResultRepositoryError::query(message),
        other => {
            warn_unrecognised("user_results", &other);
            UserResultRepositoryError::query(other.message())
        }
    }
}

fn into_result(row: UserResultRow) -> Result<UserResult, UserResultRepositoryError> {
    UserResult::try_from(row).map_err(|err| UserResultRepositoryError::query(err.to_string()))
}

#[async_trait]
impl UserResultRepository for DieselUserResultRepository {
    async fn insert(
        &self,
        result: &NewUserResult,
    ) -> Result<UserResult, UserResultRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let inserted = diesel::insert_into(user_results::table)
            .values(&NewUserResultRow::from(result))
            .returning(UserResultRow::as_returning())
            .get_result(&mut conn)
            .await;

        match inserted.map_err(StoreFailure::from) {
            Ok(row) => into_result(row),
            Err(failure) if failure.violates(USER_CONSTRAINT) => Err(
                UserResultRepositoryError::missing_user(result.user_id.to_string()),
            ),
            Err(failure) => Err(map_failure(failure)),
        }
    }

    async fn list_for_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<UserResult>, UserResultRepositoryError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<uuid::Uuid> = user_ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<UserResultRow> = user_results::table
            .filter(user_results::user_id.eq_any(ids))
            .order((
                user_results::user_id.asc(),
                user_results::date.asc(),
                user_results::id.asc(),
            ))
            .select(UserResultRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;

        rows.into_iter().map(into_result).collect()
    }

    async fn delete(&self, id: UserResultId) -> Result<bool, UserResultRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let deleted = diesel::delete(user_results::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_failure)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn foreign_key_on_other_constraint_is_a_query_error() {
        let error = map_failure(StoreFailure::ForeignKeyViolation {
            constraint: Some("something_else_fkey".to_owned()),
        });
        assert!(matches!(error, UserResultRepositoryError::Query { .. }));
    }
}
