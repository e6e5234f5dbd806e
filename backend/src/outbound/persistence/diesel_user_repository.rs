//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{AuthSubject, PageRequest, User, UserId, UserPatch};

use super::error_mapping::{StoreFailure, warn_unrecognised};
use super::models::{RowConversionError, UserChangeset, UserRow};
use super::pool::DbPool;
use super::schema::users;

const AUTH_SUBJECT_CONSTRAINT: &str = "users_auth_subject_key";

/// Diesel implementation of the user store.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StoreFailure>) -> UserRepositoryError {
    match failure.into() {
        StoreFailure::Connection(message) => UserRepositoryError::connection(message),
        StoreFailure::Query(message) => UserRepositoryError::query(message),
        other => {
            warn_unrecognised("users", &other);
            UserRepositoryError::query(other.message())
        }
    }
}

fn map_row(error: RowConversionError) -> UserRepositoryError {
    UserRepositoryError::query(error.to_string())
}

fn into_users(rows: Vec<UserRow>) -> Result<Vec<User>, UserRepositoryError> {
    rows.into_iter()
        .map(|row| User::try_from(row).map_err(map_row))
        .collect()
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = UserRow::from(user);
        let result = diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await;

        match result.map_err(StoreFailure::from) {
            Ok(_) => Ok(()),
            Err(failure) if failure.violates(AUTH_SUBJECT_CONSTRAINT) => {
                let subject = row.auth_subject.unwrap_or_default();
                Err(UserRepositoryError::duplicate_auth_subject(subject))
            }
            Err(failure) => Err(map_failure(failure)),
        }
    }

    async fn update(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserRepositoryError> {
        // Diesel rejects an empty changeset, so a no-op patch is a plain read.
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let changes = UserChangeset {
            name: patch.name.as_ref().map(AsRef::as_ref),
            grade: patch.grade.as_ref().map(AsRef::as_ref),
            birthday: patch.birthday,
        };
        let row: Option<UserRow> = diesel::update(users::table.find(*id.as_uuid()))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;

        row.map(|row| User::try_from(row).map_err(map_row))
            .transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;

        row.map(|row| User::try_from(row).map_err(map_row))
            .transpose()
    }

    async fn find_by_auth_subject(
        &self,
        subject: &AuthSubject,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<UserRow> = users::table
            .filter(users::auth_subject.eq(subject.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;

        row.map(|row| User::try_from(row).map_err(map_row))
            .transpose()
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<UserRow> = users::table
            .order((users::created_at.asc(), users::id.asc()))
            .offset(i64::from(page.skip()))
            .limit(i64::from(page.limit()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;

        into_users(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::persistence::pool::PoolError;
    use rstest::rstest;

    #[rstest]
    fn pool_failures_map_to_connection_errors() {
        let error = map_failure(PoolError::checkout("timed out"));
        assert!(matches!(
            error,
            UserRepositoryError::Connection { message } if message == "timed out"
        ));
    }

    #[rstest]
    fn unknown_constraints_surface_as_query_errors() {
        let error = map_failure(StoreFailure::UniqueViolation {
            constraint: Some("users_pkey".to_owned()),
        });
        assert!(matches!(error, UserRepositoryError::Query { .. }));
    }
}
