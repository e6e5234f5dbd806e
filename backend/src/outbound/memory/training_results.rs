use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{TrainingResultRepository, TrainingResultRepositoryError};
use crate::domain::{
    TrainingId, TrainingResult, TrainingResultEntry, TrainingResultId, TrainingResultWithTraining,
    TrainingStatusRow, TrainingType, UserId,
};

use super::{MemoryStore, Tables, next};

fn check_references(
    tables: &Tables,
    entry: &TrainingResultEntry,
) -> Result<(), TrainingResultRepositoryError> {
    if !tables.users.iter().any(|user| user.id == entry.user_id) {
        return Err(TrainingResultRepositoryError::missing_reference(
            "User not found",
        ));
    }
    if !tables
        .trainings
        .iter()
        .any(|training| training.id == entry.training_id)
    {
        return Err(TrainingResultRepositoryError::missing_reference(
            "Training not found",
        ));
    }
    Ok(())
}

#[async_trait]
impl TrainingResultRepository for MemoryStore {
    async fn insert(
        &self,
        entry: &TrainingResultEntry,
        now: DateTime<Utc>,
    ) -> Result<TrainingResult, TrainingResultRepositoryError> {
        let mut tables = self.tables().await;
        check_references(&tables, entry)?;
        let result = TrainingResult {
            id: TrainingResultId::new(next(&mut tables.sequences.training_result)),
            user_id: entry.user_id,
            training_id: entry.training_id,
            date: entry.date,
            level_code: entry.achievement_level.code(),
            comment: entry.comment.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.training_results.push(result.clone());
        Ok(result)
    }

    async fn replace(
        &self,
        id: TrainingResultId,
        entry: &TrainingResultEntry,
        now: DateTime<Utc>,
    ) -> Result<Option<TrainingResult>, TrainingResultRepositoryError> {
        let mut tables = self.tables().await;
        if !tables.training_results.iter().any(|result| result.id == id) {
            return Ok(None);
        }
        check_references(&tables, entry)?;
        Ok(tables
            .training_results
            .iter_mut()
            .find(|result| result.id == id)
            .map(|result| {
                result.user_id = entry.user_id;
                result.training_id = entry.training_id;
                result.date = entry.date;
                result.level_code = entry.achievement_level.code();
                result.comment = entry.comment.clone();
                result.updated_at = now;
                result.clone()
            }))
    }

    async fn delete(&self, id: TrainingResultId) -> Result<bool, TrainingResultRepositoryError> {
        let mut tables = self.tables().await;
        let before = tables.training_results.len();
        tables.training_results.retain(|result| result.id != id);
        Ok(tables.training_results.len() != before)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        training_type: Option<TrainingType>,
    ) -> Result<Vec<TrainingResultWithTraining>, TrainingResultRepositoryError> {
        let tables = self.tables().await;
        let mut rows: Vec<TrainingResultWithTraining> = tables
            .training_results
            .iter()
            .filter(|result| &result.user_id == user_id)
            .filter_map(|result| {
                tables
                    .trainings
                    .iter()
                    .find(|training| training.id == result.training_id)
                    .filter(|training| {
                        training_type.is_none_or(|kind| training.content.training_type == kind)
                    })
                    .map(|training| TrainingResultWithTraining {
                        result: result.clone(),
                        training: training.clone(),
                    })
            })
            .collect();
        rows.sort_by(|a, b| TrainingResult::history_order(&a.result, &b.result));
        Ok(rows)
    }

    async fn list_for_user_training(
        &self,
        user_id: &UserId,
        training_id: TrainingId,
    ) -> Result<Vec<TrainingResult>, TrainingResultRepositoryError> {
        let tables = self.tables().await;
        let mut rows: Vec<TrainingResult> = tables
            .training_results
            .iter()
            .filter(|result| &result.user_id == user_id && result.training_id == training_id)
            .cloned()
            .collect();
        rows.sort_by(TrainingResult::history_order);
        Ok(rows)
    }

    async fn status_rows(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<TrainingStatusRow>, TrainingResultRepositoryError> {
        let tables = self.tables().await;
        Ok(tables
            .training_results
            .iter()
            .filter(|result| &result.user_id == user_id)
            .filter_map(|result| {
                tables
                    .trainings
                    .iter()
                    .find(|training| training.id == result.training_id)
                    .map(|training| TrainingStatusRow {
                        result_id: result.id,
                        training_id: result.training_id,
                        training_type: training.content.training_type.code(),
                        date: result.date,
                        level_code: result.level_code,
                    })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{TrainingRepository, UserRepository};
    use crate::domain::{
        Grade, TrainingContent, TrainingDraft, TrainingResultDraft, User, UserDraft, UserName,
    };
    use chrono::NaiveDate;
    use rstest::rstest;

    async fn seed(store: &MemoryStore) -> (UserId, TrainingId) {
        let draft = UserDraft {
            name: UserName::new("Ada").expect("name"),
            grade: Grade::default(),
            birthday: None,
            auth_subject: None,
        };
        let user = User::from_draft(UserId::random(), draft, Utc::now());
        UserRepository::insert(store, &user).await.expect("user");
        let content = TrainingContent::new(TrainingDraft {
            training_type: 3,
            title: "Push-up".to_owned(),
            ..TrainingDraft::default()
        })
        .expect("content");
        let training = TrainingRepository::insert(store, &content, Utc::now())
            .await
            .expect("training");
        (user.id, training.id)
    }

    fn entry(user_id: UserId, training_id: TrainingId, day: u32) -> TrainingResultEntry {
        TrainingResultEntry::new(TrainingResultDraft {
            user_id,
            training_id,
            date: NaiveDate::from_ymd_opt(2024, 3, day).expect("date"),
            achievement_level: 2,
            comment: None,
        })
        .expect("entry")
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_a_training_cascades_to_results() {
        let store = MemoryStore::new();
        let (user_id, training_id) = seed(&store).await;
        TrainingResultRepository::insert(&store, &entry(user_id, training_id, 1), Utc::now())
            .await
            .expect("result");

        assert!(TrainingRepository::delete(&store, training_id).await.expect("delete"));
        let rows = store.status_rows(&user_id).await.expect("rows");
        assert!(rows.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn dangling_training_reference_is_rejected() {
        let store = MemoryStore::new();
        let (user_id, _) = seed(&store).await;

        let err = TrainingResultRepository::insert(
            &store,
            &entry(user_id, TrainingId::new(999), 1),
            Utc::now(),
        )
        .await
        .expect_err("missing training");
        assert_eq!(
            err,
            TrainingResultRepositoryError::missing_reference("Training not found")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn history_is_newest_first_with_embedded_training() {
        let store = MemoryStore::new();
        let (user_id, training_id) = seed(&store).await;
        for day in [1, 5, 3] {
            TrainingResultRepository::insert(&store, &entry(user_id, training_id, day), Utc::now())
                .await
                .expect("result");
        }

        let rows = store
            .list_for_user(&user_id, Some(TrainingType::Strength))
            .await
            .expect("history");
        let days: Vec<u32> = rows
            .iter()
            .map(|row| chrono::Datelike::day(&row.result.date))
            .collect();
        assert_eq!(days, vec![5, 3, 1]);
        assert_eq!(rows[0].training.content.title, "Push-up");

        let other = store
            .list_for_user(&user_id, Some(TrainingType::Core))
            .await
            .expect("filtered");
        assert!(other.is_empty());
    }
}
