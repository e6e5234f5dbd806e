use async_trait::async_trait;

use crate::domain::ports::{UserResultRepository, UserResultRepositoryError};
use crate::domain::{NewUserResult, UserId, UserResult, UserResultId};

use super::{MemoryStore, next};

#[async_trait]
impl UserResultRepository for MemoryStore {
    async fn insert(
        &self,
        result: &NewUserResult,
    ) -> Result<UserResult, UserResultRepositoryError> {
        let mut tables = self.tables().await;
        if !tables.users.iter().any(|user| user.id == result.user_id) {
            return Err(UserResultRepositoryError::missing_user(
                result.user_id.to_string(),
            ));
        }
        let id = UserResultId::new(next(&mut tables.sequences.user_result));
        let stored = UserResult::from_new(id, result.clone());
        tables.user_results.push(stored.clone());
        Ok(stored)
    }

    async fn list_for_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<UserResult>, UserResultRepositoryError> {
        let tables = self.tables().await;
        let mut results: Vec<UserResult> = tables
            .user_results
            .iter()
            .filter(|result| user_ids.contains(&result.user_id))
            .cloned()
            .collect();
        results.sort_by(|a, b| {
            a.user_id
                .cmp(&b.user_id)
                .then_with(|| a.date.cmp(&b.date))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(results)
    }

    async fn delete(&self, id: UserResultId) -> Result<bool, UserResultRepositoryError> {
        let mut tables = self.tables().await;
        let before = tables.user_results.len();
        tables.user_results.retain(|result| result.id != id);
        Ok(tables.user_results.len() != before)
    }
}
