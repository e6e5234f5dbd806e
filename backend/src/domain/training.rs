//! Training catalog entries.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::json;

use super::codes::coded_enum;
use super::validation::field_error;
use super::{Error, TrainingId};

coded_enum! {
    /// Category a training belongs to.
    pub enum TrainingType ("training_type") {
        Flexibility = 1 => "FLEXIBILITY",
        Core = 2 => "CORE",
        Strength = 3 => "STRENGTH",
        Ladder = 4 => "LADDER",
        Warmup = 5 => "WARMUP",
        Cooldown = 6 => "COOLDOWN",
    }
}

/// Display label for a stored training type code.
///
/// Codes outside the enumeration render as their decimal value.
pub fn training_type_label(code: i16) -> String {
    TrainingType::from_code(i64::from(code))
        .map(|kind| kind.label().to_owned())
        .unwrap_or_else(|| code.to_string())
}

/// Unvalidated catalog payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrainingDraft {
    /// Training category.
    pub training_type: i64,
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
    pub series_number: Option<i64>,
    /// Page within the source material.
    pub page_number: Option<i64>,
}

/// Validated catalog payload, shared by create and replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingContent {
    /// Training category.
    pub training_type: TrainingType,
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
}

impl TrainingContent {
    /// Validate a draft.
    pub fn new(draft: TrainingDraft) -> Result<Self, Error> {
        let training_type = TrainingType::try_from_code(draft.training_type)?;
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(field_error(
                "title",
                "empty",
                json!(draft.title),
                "title must not be empty",
            ));
        }
        Ok(Self {
            training_type,
            title: title.to_owned(),
            image_path: draft.image_path,
            description: draft.description,
            instructions: draft.instructions,
            series_name: draft.series_name,
            series_number: ordinal("series_number", draft.series_number)?,
            page_number: ordinal("page_number", draft.page_number)?,
        })
    }
}

fn ordinal(field: &'static str, value: Option<i64>) -> Result<Option<i32>, Error> {
    value
        .map(|raw| {
            i32::try_from(raw)
                .ok()
                .filter(|number| *number >= 1)
                .ok_or_else(|| {
                    field_error(
                        field,
                        "out_of_range",
                        json!(raw),
                        format!("{field} must be a positive integer"),
                    )
                })
        })
        .transpose()
}

/// Persisted catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Training {
    /// Primary key.
    pub id: TrainingId,
    /// Validated catalogue fields.
    pub content: TrainingContent,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Training {
    /// Catalog listing order: series name, series number, page number, id.
    ///
    /// Absent values sort after present ones.
    pub fn catalog_order(a: &Self, b: &Self) -> Ordering {
        nulls_last(&a.content.series_name, &b.content.series_name)
            .then_with(|| nulls_last(&a.content.series_number, &b.content.series_number))
            .then_with(|| nulls_last(&a.content.page_number, &b.content.page_number))
            .then_with(|| a.id.cmp(&b.id))
    }
}

fn nulls_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
