//! Tests for user value types.

use super::*;
use crate::domain::ErrorCode;
use rstest::rstest;

#[rstest]
#[case("  Ada  ", "Ada")]
#[case("佐藤 花子", "佐藤 花子")]
fn user_name_is_trimmed(#[case] input: &str, #[case] expected: &str) {
    let name = UserName::new(input).expect("valid name");
    assert_eq!(name.as_ref(), expected);
}

#[rstest]
#[case("", UserValidationError::EmptyName)]
#[case("   ", UserValidationError::EmptyName)]
fn user_name_rejects_blank(#[case] input: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserName::new(input), Err(expected));
}

#[rstest]
fn user_name_rejects_overlong_values() {
    let long = "a".repeat(USER_NAME_MAX + 1);
    assert_eq!(
        UserName::new(long),
        Err(UserValidationError::NameTooLong {
            max: USER_NAME_MAX
        })
    );
}

#[rstest]
fn grade_may_be_empty() {
    let grade = Grade::new("").expect("empty grade");
    assert_eq!(grade.as_ref(), "");
}

#[rstest]
fn user_id_rejects_non_uuid_text() {
    let err = UserId::new("42").expect_err("not a uuid");
    let error: Error = err.into();
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details().and_then(|d| d.get("field")),
        Some(&json!("user_id"))
    );
}

#[rstest]
fn user_id_round_trips_through_text() {
    let id = UserId::random();
    let parsed = UserId::new(id.to_string()).expect("parse");
    assert_eq!(parsed, id);
}

#[rstest]
fn provisioned_draft_uses_placeholder_profile() {
    let subject = AuthSubject::new("firebase|abc").expect("subject");
    let draft = UserDraft::provisioned(subject.clone());
    assert_eq!(draft.name.as_ref(), "User");
    assert_eq!(draft.grade.as_ref(), "");
    assert_eq!(draft.auth_subject, Some(subject));
}

#[rstest]
fn patch_only_touches_present_fields() {
    let draft = UserDraft {
        name: UserName::new("Ada").expect("name"),
        grade: Grade::new("5").expect("grade"),
        birthday: None,
        auth_subject: None,
    };
    let mut user = User::from_draft(UserId::random(), draft, Utc::now());
    user.apply(UserPatch {
        grade: Some(Grade::new("6").expect("grade")),
        ..UserPatch::default()
    });
    assert_eq!(user.name.as_ref(), "Ada");
    assert_eq!(user.grade.as_ref(), "6");
}

#[rstest]
#[case(None, None, 0, 100)]
#[case(Some(20), Some(1000), 20, 1000)]
fn page_request_applies_defaults(
    #[case] skip: Option<i64>,
    #[case] limit: Option<i64>,
    #[case] expected_skip: u32,
    #[case] expected_limit: u32,
) {
    let page = PageRequest::new(skip, limit).expect("valid page");
    assert_eq!(page.skip(), expected_skip);
    assert_eq!(page.limit(), expected_limit);
}

#[rstest]
#[case(Some(-1), None, "skip")]
#[case(None, Some(0), "limit")]
#[case(None, Some(1001), "limit")]
fn page_request_rejects_out_of_range(
    #[case] skip: Option<i64>,
    #[case] limit: Option<i64>,
    #[case] field: &str,
) {
    let err = PageRequest::new(skip, limit).expect_err("out of range");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details().and_then(|d| d.get("field")), Some(&json!(field)));
}
