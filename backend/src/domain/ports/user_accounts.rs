//! Driving port for user management.
//!
//! Inbound adapters use this port to create, update, and read users along
//! with their physical test results, and to resolve the caller of `/me`.

use async_trait::async_trait;

use crate::domain::{AuthSubject, Error, PageRequest, UserDraft, UserId, UserPatch, UserWithResults};

/// Driving port for user management and bearer-subject provisioning.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Create a user.
    async fn create_user(&self, draft: UserDraft) -> Result<UserWithResults, Error>;

    /// Apply a partial update.
    async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<UserWithResults, Error>;

    /// Fetch one user with results.
    async fn get_user(&self, id: UserId) -> Result<UserWithResults, Error>;

    /// List a page of users with results.
    async fn list_users(&self, page: PageRequest) -> Result<Vec<UserWithResults>, Error>;

    /// Return the user bound to `subject`, provisioning one on first sight.
    async fn resolve_subject(&self, subject: AuthSubject) -> Result<UserWithResults, Error>;
}
