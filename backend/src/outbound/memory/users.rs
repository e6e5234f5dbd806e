use async_trait::async_trait;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{AuthSubject, PageRequest, User, UserId, UserPatch};

use super::MemoryStore;

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut tables = self.tables().await;
        if let Some(subject) = &user.auth_subject {
            let taken = tables
                .users
                .iter()
                .any(|existing| existing.auth_subject.as_ref() == Some(subject));
            if taken {
                return Err(UserRepositoryError::duplicate_auth_subject(subject.as_ref()));
            }
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut tables = self.tables().await;
        Ok(tables
            .users
            .iter_mut()
            .find(|user| &user.id == id)
            .map(|user| {
                user.apply(patch.clone());
                user.clone()
            }))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.tables().await;
        Ok(tables.users.iter().find(|user| &user.id == id).cloned())
    }

    async fn find_by_auth_subject(
        &self,
        subject: &AuthSubject,
    ) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.tables().await;
        Ok(tables
            .users
            .iter()
            .find(|user| user.auth_subject.as_ref() == Some(subject))
            .cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, UserRepositoryError> {
        let tables = self.tables().await;
        let mut users = tables.users.clone();
        // Stable sort: rows created in the same instant keep insertion order.
        users.sort_by_key(|user| user.created_at);
        Ok(users
            .into_iter()
            .skip(page.skip() as usize)
            .take(page.limit() as usize)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Grade, UserDraft, UserName};
    use chrono::Utc;
    use rstest::rstest;

    fn user(subject: Option<&str>) -> User {
        let draft = UserDraft {
            name: UserName::new("Ada").expect("name"),
            grade: Grade::default(),
            birthday: None,
            auth_subject: subject.map(|s| AuthSubject::new(s).expect("subject")),
        };
        User::from_draft(UserId::random(), draft, Utc::now())
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_subjects_are_rejected() {
        let store = MemoryStore::new();
        store.insert(&user(Some("sub"))).await.expect("first insert");

        let err = store
            .insert(&user(Some("sub")))
            .await
            .expect_err("duplicate subject");
        assert_eq!(err, UserRepositoryError::duplicate_auth_subject("sub"));
    }

    #[rstest]
    #[tokio::test]
    async fn users_without_subject_never_collide() {
        let store = MemoryStore::new();
        store.insert(&user(None)).await.expect("first");
        store.insert(&user(None)).await.expect("second");
        let listed = store.list(PageRequest::default()).await.expect("list");
        assert_eq!(listed.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn list_honours_skip_and_limit() {
        let store = MemoryStore::new();
        for _ in 0..5 {
            store.insert(&user(None)).await.expect("insert");
        }
        let page = PageRequest::new(Some(3), Some(10)).expect("page");
        assert_eq!(store.list(page).await.expect("list").len(), 2);
    }
}
