//! Port for physical test result persistence.
use async_trait::async_trait;

use crate::domain::{NewUserResult, UserId, UserResult, UserResultId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by physical test result adapters.
    pub enum UserResultRepositoryError ("user result repository") {
        /// The referenced user does not exist.
        MissingUser { user_id: String } => "user not found: {user_id}",
    }
}

/// Storage for physical test results.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserResultRepository: Send + Sync {
    /// Insert a result and return it with its issued identifier.
    async fn insert(&self, result: &NewUserResult) -> Result<UserResult, UserResultRepositoryError>;

    /// Results for the given users, ordered by user, date, then identifier.
    async fn list_for_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<UserResult>, UserResultRepositoryError>;

    /// Delete a result. Returns `false` when it did not exist.
    async fn delete(&self, id: UserResultId) -> Result<bool, UserResultRepositoryError>;
}
