//! Physical test results recorded for a user.

use chrono::NaiveDate;

use super::codes::coded_enum;
use super::measurements::{MeasurementError, positive};
use super::{MeasurementSet, UserId, UserResultId};

coded_enum! {
    /// Court surface the test was taken on.
    pub enum SurfaceType ("surface") {
        ArtificialGrass = 1 => "ARTIFICIAL_GRASS",
        Hard = 2 => "HARD",
        Clay = 3 => "CLAY",
    }
}

coded_enum! {
    /// Competition format the test belonged to.
    pub enum TestFormat ("test_format") {
        National = 1 => "NATIONAL",
        Regional = 2 => "REGIONAL",
    }
}

/// Validate the optional twenty-five metre run time in seconds.
pub fn twenty_five_meter_run(value: Option<f64>) -> Result<Option<f64>, MeasurementError> {
    value
        .map(|seconds| positive("twenty_five_meter_run", seconds))
        .transpose()
}

/// Validated input for a new physical test result.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserResult {
    /// User the record belongs to.
    pub user_id: UserId,
    /// Day the test was taken.
    pub date: NaiveDate,
    /// The five test measurements.
    pub measurements: MeasurementSet,
    /// Optional 25 m run time in seconds.
    pub twenty_five_meter_run: Option<f64>,
    /// Surface the test was taken on.
    pub surface: Option<SurfaceType>,
    /// Test format used.
    pub test_format: Option<TestFormat>,
}

/// Persisted physical test result.
#[derive(Debug, Clone, PartialEq)]
pub struct UserResult {
    /// Primary key.
    pub id: UserResultId,
    /// User the record belongs to.
    pub user_id: UserId,
    /// Day the test was taken.
    pub date: NaiveDate,
    /// The five test measurements.
    pub measurements: MeasurementSet,
    /// Optional 25 m run time in seconds.
    pub twenty_five_meter_run: Option<f64>,
    /// Surface the test was taken on.
    pub surface: Option<SurfaceType>,
    /// Test format used.
    pub test_format: Option<TestFormat>,
}

impl UserResult {
    /// Attach a store-issued identifier to `new`.
    pub fn from_new(id: UserResultId, new: NewUserResult) -> Self {
        Self {
            id,
            user_id: new.user_id,
            date: new.date,
            measurements: new.measurements,
            twenty_five_meter_run: new.twenty_five_meter_run,
            surface: new.surface,
            test_format: new.test_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn surface_codes_are_closed() {
        assert_eq!(SurfaceType::valid_codes(), vec![1, 2, 3]);
        let err = SurfaceType::try_from_code(4).expect_err("4 is not a surface");
        assert_eq!(err.to_string(), "Invalid surface: 4. Valid values: [1, 2, 3]");
    }

    #[rstest]
    #[case(1, Some(TestFormat::National))]
    #[case(2, Some(TestFormat::Regional))]
    #[case(0, None)]
    fn test_format_codes(#[case] code: i64, #[case] expected: Option<TestFormat>) {
        assert_eq!(TestFormat::from_code(code), expected);
    }

    #[rstest]
    fn twenty_five_meter_run_is_optional_but_positive() {
        assert_eq!(twenty_five_meter_run(None), Ok(None));
        assert_eq!(twenty_five_meter_run(Some(4.2)), Ok(Some(4.2)));
        assert!(twenty_five_meter_run(Some(0.0)).is_err());
    }
}
