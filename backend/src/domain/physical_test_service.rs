//! Physical test result service implementing [`PhysicalTestResults`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{PhysicalTestResults, UserRepository, UserResultRepository};
use crate::domain::user_service::{map_user_repository_error, map_user_result_repository_error};
use crate::domain::{Error, NewUserResult, UserId, UserResult, UserResultId};

/// Result service checking user existence before touching results.
#[derive(Clone)]
pub struct PhysicalTestService<U, R> {
    users: Arc<U>,
    results: Arc<R>,
}

impl<U, R> PhysicalTestService<U, R> {
    /// Create a new service.
    pub fn new(users: Arc<U>, results: Arc<R>) -> Self {
        Self { users, results }
    }
}

impl<U, R> PhysicalTestService<U, R>
where
    U: UserRepository,
    R: UserResultRepository,
{
    async fn ensure_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_repository_error)?
            .map(|_| ())
            .ok_or_else(|| Error::not_found("User not found"))
    }
}

#[async_trait]
impl<U, R> PhysicalTestResults for PhysicalTestService<U, R>
where
    U: UserRepository,
    R: UserResultRepository,
{
    async fn record(&self, result: NewUserResult) -> Result<UserResult, Error> {
        self.ensure_user(&result.user_id).await?;
        self.results
            .insert(&result)
            .await
            .map_err(map_user_result_repository_error)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<UserResult>, Error> {
        self.ensure_user(&user_id).await?;
        self.results
            .list_for_users(std::slice::from_ref(&user_id))
            .await
            .map_err(map_user_result_repository_error)
    }

    async fn delete(&self, id: UserResultId) -> Result<(), Error> {
        let deleted = self
            .results
            .delete(id)
            .await
            .map_err(map_user_result_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found("Result not found"))
        }
    }
}
