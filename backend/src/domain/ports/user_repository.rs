//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{AuthSubject, PageRequest, User, UserId, UserPatch};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError ("user repository") {
        /// Another user is already bound to the auth subject.
        DuplicateAuthSubject { subject: String } =>
            "auth subject is already bound to a user: {subject}",
    }
}

/// Storage for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Apply `patch` to the stored user, returning the updated row.
    ///
    /// Returns `None` when no user has the identifier.
    async fn update(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch the user bound to an auth subject.
    async fn find_by_auth_subject(
        &self,
        subject: &AuthSubject,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// List users by creation order, then identifier.
    async fn list(&self, page: PageRequest) -> Result<Vec<User>, UserRepositoryError>;
}
