//! Tests for the user account service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockUserRepository, MockUserResultRepository};
use crate::domain::{
    ErrorCode, Grade, MeasurementDraft, MeasurementSet, UserName, UserResultId,
};
use chrono::{NaiveDate, Utc};
use mockable::DefaultClock;
use rstest::rstest;

fn make_service(
    users: MockUserRepository,
    results: MockUserResultRepository,
) -> UserAccountService<MockUserRepository, MockUserResultRepository> {
    UserAccountService::new(Arc::new(users), Arc::new(results), Arc::new(DefaultClock))
}

fn draft(name: &str) -> UserDraft {
    UserDraft {
        name: UserName::new(name).expect("name"),
        grade: Grade::new("5").expect("grade"),
        birthday: None,
        auth_subject: None,
    }
}

fn stored_user(name: &str) -> User {
    User::from_draft(UserId::random(), draft(name), Utc::now())
}

fn result_for(user_id: UserId, id: i64) -> UserResult {
    UserResult {
        id: UserResultId::new(id),
        user_id,
        date: NaiveDate::from_ymd_opt(2024, 4, 1).expect("date"),
        measurements: MeasurementSet::new(MeasurementDraft {
            long_jump_cm: 180.0,
            fifty_meter_run_ms: 8_000.0,
            spider_ms: 11_000.0,
            eight_shape_run_count: 20.0,
            ball_throw_cm: 2_000.0,
        })
        .expect("measurements"),
        twenty_five_meter_run: None,
        surface: None,
        test_format: None,
    }
}

#[rstest]
#[tokio::test]
async fn create_user_inserts_and_returns_without_results() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .withf(|user| user.name.as_ref() == "Ada")
        .times(1)
        .return_once(|_| Ok(()));
    let service = make_service(users, MockUserResultRepository::new());

    let created = service.create_user(draft("Ada")).await.expect("created");
    assert_eq!(created.user.name.as_ref(), "Ada");
    assert!(created.results.is_empty());
}

#[rstest]
#[tokio::test]
async fn get_user_reports_missing_user() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(|_| Ok(None));
    let service = make_service(users, MockUserResultRepository::new());

    let err = service.get_user(UserId::random()).await.expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_user_reports_missing_user() {
    let mut users = MockUserRepository::new();
    users.expect_update().return_once(|_, _| Ok(None));
    let service = make_service(users, MockUserResultRepository::new());

    let err = service
        .update_user(UserId::random(), UserPatch::default())
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn list_users_attaches_results_to_their_owner() {
    let first = stored_user("Ada");
    let second = stored_user("Grace");
    let (first_id, second_id) = (first.id, second.id);
    let mut users = MockUserRepository::new();
    users
        .expect_list()
        .return_once(move |_| Ok(vec![first, second]));
    let mut results = MockUserResultRepository::new();
    results
        .expect_list_for_users()
        .withf(move |ids| ids == [first_id, second_id])
        .return_once(move |_| Ok(vec![result_for(second_id, 1), result_for(second_id, 2)]));
    let service = make_service(users, results);

    let listed = service
        .list_users(PageRequest::default())
        .await
        .expect("listed");
    assert_eq!(listed.len(), 2);
    assert!(listed[0].results.is_empty());
    assert_eq!(listed[1].results.len(), 2);
}

#[rstest]
#[tokio::test]
async fn resolve_subject_returns_existing_user() {
    let existing = stored_user("Ada");
    let expected_id = existing.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_auth_subject()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    users.expect_insert().never();
    let mut results = MockUserResultRepository::new();
    results
        .expect_list_for_users()
        .return_once(|_| Ok(Vec::new()));
    let service = make_service(users, results);

    let resolved = service
        .resolve_subject(AuthSubject::new("sub-1").expect("subject"))
        .await
        .expect("resolved");
    assert_eq!(resolved.user.id, expected_id);
}

#[rstest]
#[tokio::test]
async fn resolve_subject_provisions_placeholder_user() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_auth_subject()
        .times(1)
        .return_once(|_| Ok(None));
    users
        .expect_insert()
        .withf(|user| {
            user.name.as_ref() == "User"
                && user.grade.as_ref().is_empty()
                && user.auth_subject.as_ref().map(AsRef::as_ref) == Some("sub-1")
        })
        .times(1)
        .return_once(|_| Ok(()));
    let service = make_service(users, MockUserResultRepository::new());

    let resolved = service
        .resolve_subject(AuthSubject::new("sub-1").expect("subject"))
        .await
        .expect("provisioned");
    assert_eq!(resolved.user.name.as_ref(), "User");
}

#[rstest]
#[tokio::test]
async fn resolve_subject_rereads_after_concurrent_provisioning() {
    let winner = stored_user("User");
    let winner_id = winner.id;
    let mut users = MockUserRepository::new();
    let mut lookups = mockall::Sequence::new();
    users
        .expect_find_by_auth_subject()
        .times(1)
        .in_sequence(&mut lookups)
        .return_once(|_| Ok(None));
    users
        .expect_insert()
        .times(1)
        .return_once(|_| Err(UserRepositoryError::duplicate_auth_subject("sub-1")));
    users
        .expect_find_by_auth_subject()
        .times(1)
        .in_sequence(&mut lookups)
        .return_once(move |_| Ok(Some(winner)));
    let mut results = MockUserResultRepository::new();
    results
        .expect_list_for_users()
        .return_once(|_| Ok(Vec::new()));
    let service = make_service(users, results);

    let resolved = service
        .resolve_subject(AuthSubject::new("sub-1").expect("subject"))
        .await
        .expect("resolved after race");
    assert_eq!(resolved.user.id, winner_id);
}

#[rstest]
#[case(UserRepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
#[case(UserRepositoryError::query("boom"), ErrorCode::InternalError)]
#[case(UserRepositoryError::duplicate_auth_subject("s"), ErrorCode::Conflict)]
fn repository_errors_map_to_domain_codes(
    #[case] error: UserRepositoryError,
    #[case] expected: ErrorCode,
) {
    assert_eq!(map_user_repository_error(error).code(), expected);
}
