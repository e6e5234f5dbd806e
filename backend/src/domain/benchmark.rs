//! Per-grade reference values used to compare a user's results.
//!
//! Average and maximum benchmarks share one shape and differ only by
//! [`BenchmarkKind`]. A grade appears at most once per kind.

use std::fmt;

use serde_json::json;

use super::measurements::{MeasurementError, non_negative};
use super::validation::{TextViolation, bounded_text, field_error};
use super::{BenchmarkId, Error, MeasurementSet};

const COHORT_GRADE_MAX: usize = 32;

/// Which reference table a benchmark belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BenchmarkKind {
    /// Cohort averages.
    Average,
    /// Cohort bests.
    Max,
}

impl BenchmarkKind {
    /// Storage discriminator.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Average => "average",
            Self::Max => "max",
        }
    }

    /// Parse the storage discriminator.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "average" => Some(Self::Average),
            "max" => Some(Self::Max),
            _ => None,
        }
    }

    /// Human-readable resource name used in error messages.
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Average => "Average data",
            Self::Max => "Max data",
        }
    }
}

impl fmt::Display for BenchmarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-empty grade key of a benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CohortGrade(String);

impl CohortGrade {
    /// Validate and construct a [`CohortGrade`].
    pub fn new(grade: impl AsRef<str>) -> Result<Self, Error> {
        let raw = grade.as_ref();
        bounded_text(raw, COHORT_GRADE_MAX)
            .map(Self)
            .map_err(|violation| match violation {
                TextViolation::Empty => {
                    field_error("grade", "empty", json!(raw), "grade must not be empty")
                }
                TextViolation::TooLong { max } => field_error(
                    "grade",
                    "too_long",
                    json!(raw),
                    format!("grade must be at most {max} characters"),
                ),
            })
    }
}

impl AsRef<str> for CohortGrade {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Validate an optional total score.
pub fn total_score(value: Option<f64>) -> Result<Option<f64>, MeasurementError> {
    value
        .map(|score| non_negative("total_score", score))
        .transpose()
}

/// Validated input for a new benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBenchmark {
    /// Average or max benchmark.
    pub kind: BenchmarkKind,
    /// Cohort the benchmark applies to.
    pub grade: CohortGrade,
    /// The five test measurements.
    pub measurements: MeasurementSet,
    /// Optional aggregate score.
    pub total_score: Option<f64>,
}

/// Persisted benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct Benchmark {
    /// Primary key.
    pub id: BenchmarkId,
    /// Average or max benchmark.
    pub kind: BenchmarkKind,
    /// Cohort the benchmark applies to.
    pub grade: CohortGrade,
    /// The five test measurements.
    pub measurements: MeasurementSet,
    /// Optional aggregate score.
    pub total_score: Option<f64>,
}

impl Benchmark {
    /// Attach a store-issued identifier to `new`.
    pub fn from_new(id: BenchmarkId, new: NewBenchmark) -> Self {
        Self {
            id,
            kind: new.kind,
            grade: new.grade,
            measurements: new.measurements,
            total_score: new.total_score,
        }
    }
}
