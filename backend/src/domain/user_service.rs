//! User account service implementing the [`UserAccounts`] driving port.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    UserAccounts, UserRepository, UserRepositoryError, UserResultRepository,
    UserResultRepositoryError,
};
use crate::domain::{
    AuthSubject, Error, PageRequest, User, UserDraft, UserId, UserPatch, UserResult,
    UserWithResults,
};

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateAuthSubject { .. } => {
            Error::conflict("auth subject is already bound to another user")
        }
    }
}

pub(crate) fn map_user_result_repository_error(error: UserResultRepositoryError) -> Error {
    match error {
        UserResultRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user result repository unavailable: {message}"))
        }
        UserResultRepositoryError::Query { message } => {
            Error::internal(format!("user result repository error: {message}"))
        }
        UserResultRepositoryError::MissingUser { .. } => Error::not_found("User not found"),
    }
}

/// User service backed by the user and physical test result repositories.
#[derive(Clone)]
pub struct UserAccountService<U, R> {
    users: Arc<U>,
    results: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<U, R> UserAccountService<U, R> {
    /// Create a new service.
    pub fn new(users: Arc<U>, results: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            results,
            clock,
        }
    }
}

impl<U, R> UserAccountService<U, R>
where
    U: UserRepository,
    R: UserResultRepository,
{
    async fn with_results(&self, user: User) -> Result<UserWithResults, Error> {
        let results = self
            .results
            .list_for_users(std::slice::from_ref(&user.id))
            .await
            .map_err(map_user_result_repository_error)?;
        Ok(UserWithResults { user, results })
    }

    async fn insert(&self, draft: UserDraft) -> Result<User, UserRepositoryError> {
        let user = User::from_draft(UserId::random(), draft, self.clock.utc());
        self.users.insert(&user).await?;
        Ok(user)
    }

    async fn find_by_subject(&self, subject: &AuthSubject) -> Result<Option<User>, Error> {
        self.users
            .find_by_auth_subject(subject)
            .await
            .map_err(map_user_repository_error)
    }
}

fn not_found() -> Error {
    Error::not_found("User not found")
}

#[async_trait]
impl<U, R> UserAccounts for UserAccountService<U, R>
where
    U: UserRepository,
    R: UserResultRepository,
{
    async fn create_user(&self, draft: UserDraft) -> Result<UserWithResults, Error> {
        let user = self
            .insert(draft)
            .await
            .map_err(map_user_repository_error)?;
        Ok(UserWithResults {
            user,
            results: Vec::new(),
        })
    }

    async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<UserWithResults, Error> {
        let user = self
            .users
            .update(&id, &patch)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(not_found)?;
        self.with_results(user).await
    }

    async fn get_user(&self, id: UserId) -> Result<UserWithResults, Error> {
        let user = self
            .users
            .find_by_id(&id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(not_found)?;
        self.with_results(user).await
    }

    async fn list_users(&self, page: PageRequest) -> Result<Vec<UserWithResults>, Error> {
        let users = self
            .users
            .list(page)
            .await
            .map_err(map_user_repository_error)?;
        if users.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<UserId> = users.iter().map(|user| user.id).collect();
        let mut grouped: HashMap<UserId, Vec<UserResult>> = HashMap::new();
        for result in self
            .results
            .list_for_users(&ids)
            .await
            .map_err(map_user_result_repository_error)?
        {
            grouped.entry(result.user_id).or_default().push(result);
        }
        Ok(users
            .into_iter()
            .map(|user| {
                let results = grouped.remove(&user.id).unwrap_or_default();
                UserWithResults { user, results }
            })
            .collect())
    }

    async fn resolve_subject(&self, subject: AuthSubject) -> Result<UserWithResults, Error> {
        if let Some(user) = self.find_by_subject(&subject).await? {
            return self.with_results(user).await;
        }

        match self.insert(UserDraft::provisioned(subject.clone())).await {
            Ok(user) => Ok(UserWithResults {
                user,
                results: Vec::new(),
            }),
            // A concurrent first request provisioned the same subject.
            Err(UserRepositoryError::DuplicateAuthSubject { .. }) => {
                let user = self.find_by_subject(&subject).await?.ok_or_else(|| {
                    Error::internal("provisioned user vanished after unique violation")
                })?;
                self.with_results(user).await
            }
            Err(other) => Err(map_user_repository_error(other)),
        }
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
