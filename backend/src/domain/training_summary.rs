//! Per-category achievement counts over a user's latest training results.
//!
//! Only the newest result per training counts. When two results for the same
//! training share a date, the one with the higher id wins. Categories are
//! listed in ascending order of the smallest training id they contain.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::training::training_type_label;
use super::{AchievementLevel, TrainingId, TrainingResultId, UserId};

/// One joined result/training row fed into [`summarise`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingStatusRow {
    /// Result id; the higher id wins a date tie.
    pub result_id: TrainingResultId,
    /// Catalogue entry the result refers to.
    pub training_id: TrainingId,
    /// Training category code.
    pub training_type: i16,
    /// Day the test was taken.
    pub date: NaiveDate,
    /// Stored achievement level code.
    pub level_code: i16,
}

impl TrainingStatusRow {
    fn supersedes(&self, other: &Self) -> bool {
        (self.date, self.result_id) > (other.date, other.result_id)
    }
}

/// Counters for one training category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    /// Training category code.
    pub training_type: i16,
    /// Display label of the category.
    pub training_type_label: String,
    /// Trainings whose latest result needs improvement.
    pub needs_improvement: u32,
    /// Trainings whose latest result is achieved.
    pub achieved: u32,
    /// Trainings whose latest result is excellent.
    pub excellent: u32,
}

impl CategorySummary {
    fn empty(training_type: i16) -> Self {
        Self {
            training_type,
            training_type_label: training_type_label(training_type),
            needs_improvement: 0,
            achieved: 0,
            excellent: 0,
        }
    }

    fn count(&mut self, level_code: i16) {
        // Legacy codes only contribute to the overall total.
        match AchievementLevel::from_code(i64::from(level_code)) {
            Some(AchievementLevel::NeedsImprovement) => self.needs_improvement += 1,
            Some(AchievementLevel::Achieved) => self.achieved += 1,
            Some(AchievementLevel::Excellent) => self.excellent += 1,
            None => {}
        }
    }
}

/// Aggregated view returned for `/user-training-summary`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingSummary {
    /// User the record belongs to.
    pub user_id: UserId,
    /// Distinct trainings with at least one result.
    pub total_trainings_with_status: u32,
    /// Per-category counts, ordered by first catalogue entry.
    pub categories: Vec<CategorySummary>,
}

/// Reduce `rows` to the latest result per training and bucket by category.
///
/// # Examples
/// ```
/// use backend::domain::{UserId, summarise};
///
/// let summary = summarise(UserId::random(), Vec::new());
/// assert_eq!(summary.total_trainings_with_status, 0);
/// assert!(summary.categories.is_empty());
/// ```
pub fn summarise(
    user_id: UserId,
    rows: impl IntoIterator<Item = TrainingStatusRow>,
) -> TrainingSummary {
    let mut latest: BTreeMap<TrainingId, TrainingStatusRow> = BTreeMap::new();
    for row in rows {
        latest
            .entry(row.training_id)
            .and_modify(|kept| {
                if row.supersedes(kept) {
                    *kept = row;
                }
            })
            .or_insert(row);
    }

    let mut categories: Vec<CategorySummary> = Vec::new();
    // `latest` iterates in training id order, so first appearance fixes the
    // category position.
    for row in latest.values() {
        match categories
            .iter_mut()
            .find(|category| category.training_type == row.training_type)
        {
            Some(category) => category.count(row.level_code),
            None => {
                let mut category = CategorySummary::empty(row.training_type);
                category.count(row.level_code);
                categories.push(category);
            }
        }
    }

    TrainingSummary {
        user_id,
        total_trainings_with_status: u32::try_from(latest.len()).unwrap_or(u32::MAX),
        categories,
    }
}
