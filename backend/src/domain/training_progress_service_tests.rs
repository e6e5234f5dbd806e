//! Tests for the training progress service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    MockTrainingRepository, MockTrainingResultRepository, MockUserRepository,
};
use crate::domain::{
    AchievementLevel, ErrorCode, Grade, Training, TrainingContent, TrainingDraft,
    TrainingResultDraft, TrainingStatusRow, User, UserDraft, UserName,
};
use chrono::{NaiveDate, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

struct Mocks {
    users: MockUserRepository,
    trainings: MockTrainingRepository,
    results: MockTrainingResultRepository,
}

impl Mocks {
    fn into_service(
        self,
    ) -> TrainingProgressService<
        MockUserRepository,
        MockTrainingRepository,
        MockTrainingResultRepository,
    > {
        TrainingProgressService::new(
            Arc::new(self.users),
            Arc::new(self.trainings),
            Arc::new(self.results),
            Arc::new(DefaultClock),
        )
    }

    fn with_user(mut self, present: bool) -> Self {
        self.users.expect_find_by_id().return_once(move |id| {
            Ok(present.then(|| {
                let draft = UserDraft {
                    name: UserName::new("Ada").expect("name"),
                    grade: Grade::new("5").expect("grade"),
                    birthday: None,
                    auth_subject: None,
                };
                User::from_draft(*id, draft, Utc::now())
            }))
        });
        self
    }

    fn with_training(mut self, present: bool) -> Self {
        self.trainings.expect_find_by_id().return_once(move |id| {
            Ok(present.then(|| {
                let now = Utc::now();
                Training {
                    id,
                    content: TrainingContent::new(TrainingDraft {
                        training_type: 2,
                        title: "Plank".to_owned(),
                        ..TrainingDraft::default()
                    })
                    .expect("content"),
                    created_at: now,
                    updated_at: now,
                }
            }))
        });
        self
    }
}

#[fixture]
fn mocks() -> Mocks {
    Mocks {
        users: MockUserRepository::new(),
        trainings: MockTrainingRepository::new(),
        results: MockTrainingResultRepository::new(),
    }
}

#[fixture]
fn entry() -> TrainingResultEntry {
    TrainingResultEntry::new(TrainingResultDraft {
        user_id: UserId::random(),
        training_id: TrainingId::new(3),
        date: NaiveDate::from_ymd_opt(2024, 2, 1).expect("date"),
        achievement_level: 3,
        comment: Some("steady".to_owned()),
    })
    .expect("valid entry")
}

fn stored(entry: &TrainingResultEntry, id: i64) -> TrainingResult {
    let now = Utc::now();
    TrainingResult {
        id: TrainingResultId::new(id),
        user_id: entry.user_id,
        training_id: entry.training_id,
        date: entry.date,
        level_code: entry.achievement_level.code(),
        comment: entry.comment.clone(),
        created_at: now,
        updated_at: now,
    }
}

#[rstest]
#[tokio::test]
async fn record_inserts_after_both_references_resolve(mocks: Mocks, entry: TrainingResultEntry) {
    let mut mocks = mocks.with_user(true).with_training(true);
    mocks
        .results
        .expect_insert()
        .times(1)
        .return_once(|entry, _| Ok(stored(entry, 10)));

    let result = mocks.into_service().record(entry).await.expect("recorded");
    assert_eq!(result.achievement_level(), Some(AchievementLevel::Excellent));
}

#[rstest]
#[case::missing_user(false, true, "User not found")]
#[case::missing_training(true, false, "Training not found")]
#[tokio::test]
async fn record_rejects_missing_references_before_writing(
    mocks: Mocks,
    entry: TrainingResultEntry,
    #[case] user: bool,
    #[case] training: bool,
    #[case] message: &str,
) {
    let mut mocks = mocks.with_user(user);
    if user {
        mocks = mocks.with_training(training);
    }
    mocks.results.expect_insert().never();

    let err = mocks.into_service().record(entry).await.expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), message);
}

#[rstest]
#[tokio::test]
async fn replace_missing_result_is_not_found(mocks: Mocks, entry: TrainingResultEntry) {
    let mut mocks = mocks.with_user(true).with_training(true);
    mocks
        .results
        .expect_replace()
        .return_once(|_, _, _| Ok(None));

    let err = mocks
        .into_service()
        .replace(TrainingResultId::new(77), entry)
        .await
        .expect_err("absent");
    assert_eq!(err.message(), "User training result not found");
}

#[rstest]
#[tokio::test]
async fn delete_missing_result_is_not_found(mut mocks: Mocks) {
    mocks.results.expect_delete().return_once(|_| Ok(false));

    let err = mocks
        .into_service()
        .delete(TrainingResultId::new(77))
        .await
        .expect_err("absent");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn summary_requires_existing_user(mocks: Mocks) {
    let mut mocks = mocks.with_user(false);
    mocks.results.expect_status_rows().never();

    let err = mocks
        .into_service()
        .summary(UserId::random())
        .await
        .expect_err("missing user");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn summary_aggregates_repository_rows(mocks: Mocks) {
    let mut mocks = mocks.with_user(true);
    mocks.results.expect_status_rows().return_once(|_| {
        Ok(vec![TrainingStatusRow {
            result_id: TrainingResultId::new(1),
            training_id: TrainingId::new(1),
            training_type: TrainingType::Core.code(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
            level_code: AchievementLevel::Achieved.code(),
        }])
    });

    let summary = mocks
        .into_service()
        .summary(UserId::random())
        .await
        .expect("summary");
    assert_eq!(summary.total_trainings_with_status, 1);
    assert_eq!(summary.categories[0].achieved, 1);
}

#[rstest]
#[tokio::test]
async fn insert_reference_race_maps_to_not_found(mocks: Mocks, entry: TrainingResultEntry) {
    let mut mocks = mocks.with_user(true).with_training(true);
    mocks.results.expect_insert().return_once(|_, _| {
        Err(TrainingResultRepositoryError::missing_reference(
            "Training not found",
        ))
    });

    let err = mocks.into_service().record(entry).await.expect_err("race");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
