//! Training catalog service implementing [`TrainingCatalogue`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{TrainingCatalogue, TrainingRepository, TrainingRepositoryError};
use crate::domain::{Error, Training, TrainingContent, TrainingId, TrainingType};

pub(crate) fn map_training_repository_error(error: TrainingRepositoryError) -> Error {
    match error {
        TrainingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("training repository unavailable: {message}"))
        }
        TrainingRepositoryError::Query { message } => {
            Error::internal(format!("training repository error: {message}"))
        }
    }
}

pub(crate) fn training_not_found() -> Error {
    Error::not_found("Training not found")
}

/// Catalog service stamping writes with the injected clock.
#[derive(Clone)]
pub struct TrainingCatalogueService<T> {
    trainings: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<T> TrainingCatalogueService<T> {
    /// Create a new service.
    pub fn new(trainings: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self { trainings, clock }
    }
}

#[async_trait]
impl<T> TrainingCatalogue for TrainingCatalogueService<T>
where
    T: TrainingRepository,
{
    async fn list(&self, training_type: Option<TrainingType>) -> Result<Vec<Training>, Error> {
        self.trainings
            .list(training_type)
            .await
            .map_err(map_training_repository_error)
    }

    async fn get(&self, id: TrainingId) -> Result<Training, Error> {
        self.trainings
            .find_by_id(id)
            .await
            .map_err(map_training_repository_error)?
            .ok_or_else(training_not_found)
    }

    async fn create(&self, content: TrainingContent) -> Result<Training, Error> {
        self.trainings
            .insert(&content, self.clock.utc())
            .await
            .map_err(map_training_repository_error)
    }

    async fn replace(&self, id: TrainingId, content: TrainingContent) -> Result<Training, Error> {
        self.trainings
            .replace(id, &content, self.clock.utc())
            .await
            .map_err(map_training_repository_error)?
            .ok_or_else(training_not_found)
    }

    async fn delete(&self, id: TrainingId) -> Result<(), Error> {
        let deleted = self
            .trainings
            .delete(id)
            .await
            .map_err(map_training_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(training_not_found())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockTrainingRepository;
    use crate::domain::{ErrorCode, TrainingDraft};
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::{fixture, rstest};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn fixed_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    #[fixture]
    fn content() -> TrainingContent {
        TrainingContent::new(TrainingDraft {
            training_type: 1,
            title: "Hamstring stretch".to_owned(),
            ..TrainingDraft::default()
        })
        .expect("valid content")
    }

    fn service(repo: MockTrainingRepository) -> TrainingCatalogueService<MockTrainingRepository> {
        TrainingCatalogueService::new(Arc::new(repo), Arc::new(FixedClock(fixed_instant())))
    }

    #[rstest]
    #[tokio::test]
    async fn create_stamps_with_clock(content: TrainingContent) {
        let mut repo = MockTrainingRepository::new();
        repo.expect_insert()
            .withf(|_, now| *now == fixed_instant())
            .times(1)
            .return_once(|content, now| {
                Ok(Training {
                    id: TrainingId::new(1),
                    content: content.clone(),
                    created_at: now,
                    updated_at: now,
                })
            });

        let training = service(repo).create(content).await.expect("created");
        assert_eq!(training.created_at, fixed_instant());
    }

    #[rstest]
    #[tokio::test]
    async fn replace_missing_training_is_not_found(content: TrainingContent) {
        let mut repo = MockTrainingRepository::new();
        repo.expect_replace().return_once(|_, _, _| Ok(None));

        let err = service(repo)
            .replace(TrainingId::new(5), content)
            .await
            .expect_err("absent");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "Training not found");
    }

    #[rstest]
    #[tokio::test]
    async fn delete_missing_training_is_not_found() {
        let mut repo = MockTrainingRepository::new();
        repo.expect_delete().return_once(|_| Ok(false));

        let err = service(repo)
            .delete(TrainingId::new(5))
            .await
            .expect_err("absent");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn list_forwards_type_filter() {
        let mut repo = MockTrainingRepository::new();
        repo.expect_list()
            .withf(|filter| *filter == Some(TrainingType::Ladder))
            .return_once(|_| Ok(Vec::new()));

        let listed = service(repo)
            .list(Some(TrainingType::Ladder))
            .await
            .expect("listed");
        assert!(listed.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn connection_failures_are_service_unavailable() {
        let mut repo = MockTrainingRepository::new();
        repo.expect_find_by_id()
            .return_once(|_| Err(TrainingRepositoryError::connection("pool exhausted")));

        let err = service(repo)
            .get(TrainingId::new(1))
            .await
            .expect_err("down");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
