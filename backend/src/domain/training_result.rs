//! Achievement records a user earns against catalog trainings.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};

use super::codes::coded_enum;
use super::{Error, Training, TrainingId, TrainingResultId, UserId};

coded_enum! {
    /// How well a user performed a training.
    pub enum AchievementLevel ("achievement_level") {
        NeedsImprovement = 1 => "NEEDS_IMPROVEMENT",
        Achieved = 2 => "ACHIEVED",
        Excellent = 3 => "EXCELLENT",
    }
}

/// Unvalidated training result payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingResultDraft {
    /// User the record belongs to.
    pub user_id: UserId,
    /// Catalogue entry the result refers to.
    pub training_id: TrainingId,
    /// Day the training was performed.
    pub date: NaiveDate,
    /// Achievement level.
    pub achievement_level: i64,
    /// Optional free-text comment.
    pub comment: Option<String>,
}

/// Validated payload shared by create and replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingResultEntry {
    /// User the record belongs to.
    pub user_id: UserId,
    /// Catalogue entry the result refers to.
    pub training_id: TrainingId,
    /// Day the training was performed.
    pub date: NaiveDate,
    /// Achievement level.
    pub achievement_level: AchievementLevel,
    /// Optional free-text comment.
    pub comment: Option<String>,
}

impl TrainingResultEntry {
    /// Validate a draft. Only the level can be checked without the store.
    pub fn new(draft: TrainingResultDraft) -> Result<Self, Error> {
        let achievement_level = AchievementLevel::try_from_code(draft.achievement_level)?;
        Ok(Self {
            user_id: draft.user_id,
            training_id: draft.training_id,
            date: draft.date,
            achievement_level,
            comment: draft.comment,
        })
    }
}

/// Persisted training result.
///
/// The level is kept as its raw code so rows written before validation was
/// enforced can still be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingResult {
    /// Primary key.
    pub id: TrainingResultId,
    /// User the record belongs to.
    pub user_id: UserId,
    /// Catalogue entry the result refers to.
    pub training_id: TrainingId,
    /// Day the training was performed.
    pub date: NaiveDate,
    /// Stored achievement level code.
    pub level_code: i16,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TrainingResult {
    /// Decoded level, or `None` for a legacy code.
    pub fn achievement_level(&self) -> Option<AchievementLevel> {
        AchievementLevel::from_code(i64::from(self.level_code))
    }

    /// History order: newest date first, later writes first on the same date.
    pub fn history_order(a: &Self, b: &Self) -> Ordering {
        b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id))
    }
}

/// A training result with the catalog entry it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingResultWithTraining {
    /// The training result.
    pub result: TrainingResult,
    /// The catalogue entry it refers to.
    pub training: Training,
}
