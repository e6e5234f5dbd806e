//! Internal Diesel row structs and their conversions to domain types.
//!
//! Rows never leave the persistence layer. Conversions re-validate stored
//! values; a row that fails is reported as a query error because the
//! migrations' CHECK constraints should have prevented it.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    AuthSubject, Benchmark, BenchmarkId, BenchmarkKind, CohortGrade, Grade, MeasurementDraft,
    MeasurementSet, NewBenchmark, NewUserResult, SurfaceType, TestFormat, Training,
    TrainingContent, TrainingId, TrainingResult, TrainingResultEntry, TrainingResultId,
    TrainingType, User, UserId, UserName, UserResult, UserResultId,
};

use super::schema::{cohort_benchmarks, trainings, user_results, user_training_results, users};

/// Stored row that no longer satisfies the domain invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {table} row {id}: {message}")]
pub(crate) struct RowConversionError {
    table: &'static str,
    id: String,
    message: String,
}

impl RowConversionError {
    fn new(table: &'static str, id: impl ToString, message: impl ToString) -> Self {
        Self {
            table,
            id: id.to_string(),
            message: message.to_string(),
        }
    }
}

fn measurements(
    table: &'static str,
    id: impl ToString,
    draft: MeasurementDraft,
) -> Result<MeasurementSet, RowConversionError> {
    MeasurementSet::new(draft).map_err(|err| RowConversionError::new(table, id, err))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    /// Primary key.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Grade or cohort label.
    pub grade: String,
    /// Date of birth.
    pub birthday: Option<NaiveDate>,
    /// Identity-provider subject bound to this user.
    pub auth_subject: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            name: user.name.as_ref().to_owned(),
            grade: user.grade.as_ref().to_owned(),
            birthday: user.birthday,
            auth_subject: user.auth_subject.as_ref().map(|s| s.as_ref().to_owned()),
            created_at: user.created_at,
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = RowConversionError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let invalid = |err| RowConversionError::new("users", row.id, err);
        Ok(Self {
            id: UserId::from_uuid(row.id),
            name: UserName::new(&row.name).map_err(invalid)?,
            grade: Grade::new(&row.grade).map_err(invalid)?,
            birthday: row.birthday,
            auth_subject: row
                .auth_subject
                .as_deref()
                .map(AuthSubject::new)
                .transpose()
                .map_err(invalid)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    /// Display name.
    pub name: Option<&'a str>,
    /// Grade or cohort label.
    pub grade: Option<&'a str>,
    /// Date of birth.
    pub birthday: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Physical test results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_results)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserResultRow {
    /// Primary key.
    pub id: i64,
    /// User the record belongs to.
    pub user_id: Uuid,
    /// Day the test was taken.
    pub date: NaiveDate,
    /// Standing long jump in centimetres.
    pub long_jump_cm: f64,
    /// 50 m sprint in milliseconds.
    pub fifty_meter_run_ms: f64,
    /// Spider agility drill in milliseconds.
    pub spider_ms: f64,
    /// Figure-eight run count.
    pub eight_shape_run_count: f64,
    /// Ball throw in centimetres.
    pub ball_throw_cm: f64,
    /// Optional 25 m run time in seconds.
    pub twenty_five_meter_run: Option<f64>,
    /// Surface type code.
    pub surface: Option<i16>,
    /// Test format code.
    pub test_format: Option<i16>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_results)]
pub(crate) struct NewUserResultRow {
    /// User the record belongs to.
    pub user_id: Uuid,
    /// Day the test was taken.
    pub date: NaiveDate,
    /// Standing long jump in centimetres.
    pub long_jump_cm: f64,
    /// 50 m sprint in milliseconds.
    pub fifty_meter_run_ms: f64,
    /// Spider agility drill in milliseconds.
    pub spider_ms: f64,
    /// Figure-eight run count.
    pub eight_shape_run_count: f64,
    /// Ball throw in centimetres.
    pub ball_throw_cm: f64,
    /// Optional 25 m run time in seconds.
    pub twenty_five_meter_run: Option<f64>,
    /// Surface type code.
    pub surface: Option<i16>,
    /// Test format code.
    pub test_format: Option<i16>,
}

impl From<&NewUserResult> for NewUserResultRow {
    fn from(result: &NewUserResult) -> Self {
        let set = &result.measurements;
        Self {
            user_id: *result.user_id.as_uuid(),
            date: result.date,
            long_jump_cm: set.long_jump_cm(),
            fifty_meter_run_ms: set.fifty_meter_run_ms(),
            spider_ms: set.spider_ms(),
            eight_shape_run_count: set.eight_shape_run_count(),
            ball_throw_cm: set.ball_throw_cm(),
            twenty_five_meter_run: result.twenty_five_meter_run,
            surface: result.surface.map(SurfaceType::code),
            test_format: result.test_format.map(TestFormat::code),
        }
    }
}

impl TryFrom<UserResultRow> for UserResult {
    type Error = RowConversionError;

    fn try_from(row: UserResultRow) -> Result<Self, Self::Error> {
        const TABLE: &str = "user_results";
        let id = row.id;
        let surface = row
            .surface
            .map(|code| SurfaceType::try_from_code(i64::from(code)))
            .transpose()
            .map_err(|err| RowConversionError::new(TABLE, id, err))?;
        let test_format = row
            .test_format
            .map(|code| TestFormat::try_from_code(i64::from(code)))
            .transpose()
            .map_err(|err| RowConversionError::new(TABLE, id, err))?;
        Ok(Self {
            id: UserResultId::new(id),
            user_id: UserId::from_uuid(row.user_id),
            date: row.date,
            measurements: measurements(
                TABLE,
                id,
                MeasurementDraft {
                    long_jump_cm: row.long_jump_cm,
                    fifty_meter_run_ms: row.fifty_meter_run_ms,
                    spider_ms: row.spider_ms,
                    eight_shape_run_count: row.eight_shape_run_count,
                    ball_throw_cm: row.ball_throw_cm,
                },
            )?,
            twenty_five_meter_run: row.twenty_five_meter_run,
            surface,
            test_format,
        })
    }
}

// ---------------------------------------------------------------------------
// Cohort benchmarks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cohort_benchmarks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BenchmarkRow {
    /// Primary key.
    pub id: i64,
    /// `average` or `max`.
    pub kind: String,
    /// Grade or cohort label.
    pub grade: String,
    /// Standing long jump in centimetres.
    pub long_jump_cm: f64,
    /// 50 m sprint in milliseconds.
    pub fifty_meter_run_ms: f64,
    /// Spider agility drill in milliseconds.
    pub spider_ms: f64,
    /// Figure-eight run count.
    pub eight_shape_run_count: f64,
    /// Ball throw in centimetres.
    pub ball_throw_cm: f64,
    /// Optional aggregate score.
    pub total_score: Option<f64>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cohort_benchmarks)]
pub(crate) struct NewBenchmarkRow<'a> {
    /// `average` or `max`.
    pub kind: &'static str,
    /// Grade or cohort label.
    pub grade: &'a str,
    /// Standing long jump in centimetres.
    pub long_jump_cm: f64,
    /// 50 m sprint in milliseconds.
    pub fifty_meter_run_ms: f64,
    /// Spider agility drill in milliseconds.
    pub spider_ms: f64,
    /// Figure-eight run count.
    pub eight_shape_run_count: f64,
    /// Ball throw in centimetres.
    pub ball_throw_cm: f64,
    /// Optional aggregate score.
    pub total_score: Option<f64>,
}

impl<'a> From<&'a NewBenchmark> for NewBenchmarkRow<'a> {
    fn from(benchmark: &'a NewBenchmark) -> Self {
        let set = &benchmark.measurements;
        Self {
            kind: benchmark.kind.as_str(),
            grade: benchmark.grade.as_ref(),
            long_jump_cm: set.long_jump_cm(),
            fifty_meter_run_ms: set.fifty_meter_run_ms(),
            spider_ms: set.spider_ms(),
            eight_shape_run_count: set.eight_shape_run_count(),
            ball_throw_cm: set.ball_throw_cm(),
            total_score: benchmark.total_score,
        }
    }
}

impl TryFrom<BenchmarkRow> for Benchmark {
    type Error = RowConversionError;

    fn try_from(row: BenchmarkRow) -> Result<Self, Self::Error> {
        const TABLE: &str = "cohort_benchmarks";
        let id = row.id;
        let kind = BenchmarkKind::parse(&row.kind).ok_or_else(|| {
            RowConversionError::new(TABLE, id, format!("unknown kind {}", row.kind))
        })?;
        let grade =
            CohortGrade::new(&row.grade).map_err(|err| RowConversionError::new(TABLE, id, err))?;
        Ok(Self {
            id: BenchmarkId::new(id),
            kind,
            grade,
            measurements: measurements(
                TABLE,
                id,
                MeasurementDraft {
                    long_jump_cm: row.long_jump_cm,
                    fifty_meter_run_ms: row.fifty_meter_run_ms,
                    spider_ms: row.spider_ms,
                    eight_shape_run_count: row.eight_shape_run_count,
                    ball_throw_cm: row.ball_throw_cm,
                },
            )?,
            total_score: row.total_score,
        })
    }
}

// ---------------------------------------------------------------------------
// Trainings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trainings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TrainingRow {
    /// Primary key.
    pub id: i64,
    /// Training category code.
    pub training_type: i16,
    /// Exercise title.
    pub title: String,
    /// Optional image reference.
    pub image_path: Option<String>,
    /// Exercise description.
    pub description: String,
    /// Optional step-by-step instructions.
    pub instructions: Option<String>,
    /// Source series the entry belongs to.
    pub series_name: Option<String>,
    /// Position within the series.
    pub series_number: Option<i32>,
    /// Page within the source material.
    pub page_number: Option<i32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Column values written by both insert and full replace.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = trainings)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct TrainingWriteRow<'a> {
    /// Training category code.
    pub training_type: i16,
    /// Exercise title.
    pub title: &'a str,
    /// Optional image reference.
    pub image_path: Option<&'a str>,
    /// Exercise description.
    pub description: &'a str,
    /// Optional step-by-step instructions.
    pub instructions: Option<&'a str>,
    /// Source series the entry belongs to.
    pub series_name: Option<&'a str>,
    /// Position within the series.
    pub series_number: Option<i32>,
    /// Page within the source material.
    pub page_number: Option<i32>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl<'a> TrainingWriteRow<'a> {
    pub(crate) fn new(content: &'a TrainingContent, now: DateTime<Utc>) -> Self {
        Self {
            training_type: content.training_type.code(),
            title: content.title.as_str(),
            image_path: content.image_path.as_deref(),
            description: content.description.as_str(),
            instructions: content.instructions.as_deref(),
            series_name: content.series_name.as_deref(),
            series_number: content.series_number,
            page_number: content.page_number,
            updated_at: now,
        }
    }
}

impl TryFrom<TrainingRow> for Training {
    type Error = RowConversionError;

    fn try_from(row: TrainingRow) -> Result<Self, Self::Error> {
        let training_type = TrainingType::try_from_code(i64::from(row.training_type))
            .map_err(|err| RowConversionError::new("trainings", row.id, err))?;
        Ok(Self {
            id: TrainingId::new(row.id),
            content: TrainingContent {
                training_type,
                title: row.title,
                image_path: row.image_path,
                description: row.description,
                instructions: row.instructions,
                series_name: row.series_name,
                series_number: row.series_number,
                page_number: row.page_number,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// User training results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_training_results)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TrainingResultRow {
    /// Primary key.
    pub id: i64,
    /// User the record belongs to.
    pub user_id: Uuid,
    /// Catalogue entry the result refers to.
    pub training_id: i64,
    /// Day the test was taken.
    pub date: NaiveDate,
    /// Achievement level code.
    pub achievement_level: i16,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<TrainingResultRow> for TrainingResult {
    fn from(row: TrainingResultRow) -> Self {
        Self {
            id: TrainingResultId::new(row.id),
            user_id: UserId::from_uuid(row.user_id),
            training_id: TrainingId::new(row.training_id),
            date: row.date,
            level_code: row.achievement_level,
            comment: row.comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = user_training_results)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct TrainingResultWriteRow<'a> {
    /// User the record belongs to.
    pub user_id: Uuid,
    /// Catalogue entry the result refers to.
    pub training_id: i64,
    /// Day the test was taken.
    pub date: NaiveDate,
    /// Achievement level code.
    pub achievement_level: i16,
    /// Optional free-text comment.
    pub comment: Option<&'a str>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl<'a> TrainingResultWriteRow<'a> {
    pub(crate) fn new(entry: &'a TrainingResultEntry, now: DateTime<Utc>) -> Self {
        Self {
            user_id: *entry.user_id.as_uuid(),
            training_id: entry.training_id.get(),
            date: entry.date,
            achievement_level: entry.achievement_level.code(),
            comment: entry.comment.as_deref(),
            updated_at: now,
        }
    }
}
