//! Driving port for physical test results.

use async_trait::async_trait;

use crate::domain::{Error, NewUserResult, UserId, UserResult, UserResultId};

/// Driving port for recording and listing physical test results.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhysicalTestResults: Send + Sync {
    /// Record a result for an existing user.
    async fn record(&self, result: NewUserResult) -> Result<UserResult, Error>;

    /// Results of an existing user, oldest first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<UserResult>, Error>;

    /// Delete a result.
    async fn delete(&self, id: UserResultId) -> Result<(), Error>;
}
