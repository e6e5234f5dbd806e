//! Physical test measurements in base units.
//!
//! Values are stored as entered (centimetres, milliseconds, counts). Display
//! units are derived on read and never persisted.

use serde_json::json;

use super::Error;
use super::validation::field_error;

/// Rejected measurement value.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum MeasurementError {
    /// The value was zero, negative, or not a finite number.
    #[error("{field} must be a finite number greater than zero")]
    NotPositive {
        /// Wire name of the field.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// The value was negative or not a finite number.
    #[error("{field} must be a finite number of at least zero")]
    Negative {
        /// Wire name of the field.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
}

impl From<MeasurementError> for Error {
    fn from(value: MeasurementError) -> Self {
        let message = value.to_string();
        match value {
            MeasurementError::NotPositive { field, value } => {
                field_error(field, "not_positive", json_number(value), message)
            }
            MeasurementError::Negative { field, value } => {
                field_error(field, "negative", json_number(value), message)
            }
        }
    }
}

fn json_number(value: f64) -> serde_json::Value {
    // NaN and infinities have no JSON form.
    serde_json::Number::from_f64(value)
        .map(serde_json::Value::Number)
        .unwrap_or_else(|| json!(value.to_string()))
}

/// Require a finite value strictly greater than zero.
pub fn positive(field: &'static str, value: f64) -> Result<f64, MeasurementError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MeasurementError::NotPositive { field, value })
    }
}

/// Require a finite value of at least zero.
pub fn non_negative(field: &'static str, value: f64) -> Result<f64, MeasurementError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(MeasurementError::Negative { field, value })
    }
}

/// Unvalidated measurement input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementDraft {
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
}

/// Five validated measurements, all strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementSet {
    long_jump_cm: f64,
    fifty_meter_run_ms: f64,
    spider_ms: f64,
    eight_shape_run_count: f64,
    ball_throw_cm: f64,
}

impl MeasurementSet {
    /// Validate every field, reporting the first offending one.
    pub fn new(draft: MeasurementDraft) -> Result<Self, MeasurementError> {
        Ok(Self {
            long_jump_cm: positive("long_jump_cm", draft.long_jump_cm)?,
            fifty_meter_run_ms: positive("fifty_meter_run_ms", draft.fifty_meter_run_ms)?,
            spider_ms: positive("spider_ms", draft.spider_ms)?,
            eight_shape_run_count: positive("eight_shape_run_count", draft.eight_shape_run_count)?,
            ball_throw_cm: positive("ball_throw_cm", draft.ball_throw_cm)?,
        })
    }

    /// Stored long jump in centimetres.
    pub fn long_jump_cm(&self) -> f64 {
        self.long_jump_cm
    }

    /// Stored sprint time in milliseconds.
    pub fn fifty_meter_run_ms(&self) -> f64 {
        self.fifty_meter_run_ms
    }

    /// Stored spider drill time in milliseconds.
    pub fn spider_ms(&self) -> f64 {
        self.spider_ms
    }

    /// Figure-eight run count.
    pub fn eight_shape_run_count(&self) -> f64 {
        self.eight_shape_run_count
    }

    /// Stored ball throw in centimetres.
    pub fn ball_throw_cm(&self) -> f64 {
        self.ball_throw_cm
    }

    /// Long jump in metres.
    pub fn long_jump(&self) -> f64 {
        self.long_jump_cm / 100.0
    }

    /// Fifty metre run in seconds.
    pub fn fifty_meter_run(&self) -> f64 {
        self.fifty_meter_run_ms / 1000.0
    }

    /// Spider drill in seconds.
    pub fn spider(&self) -> f64 {
        self.spider_ms / 1000.0
    }

    /// Figure-eight run count, unchanged.
    pub fn eight_shape_run(&self) -> f64 {
        self.eight_shape_run_count
    }

    /// Ball throw in metres.
    pub fn ball_throw(&self) -> f64 {
        self.ball_throw_cm / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn draft() -> MeasurementDraft {
        MeasurementDraft {
            long_jump_cm: 180.0,
            fifty_meter_run_ms: 8_500.0,
            spider_ms: 12_340.0,
            eight_shape_run_count: 21.0,
            ball_throw_cm: 2_550.0,
        }
    }

    #[rstest]
    fn derived_units_scale_base_values(draft: MeasurementDraft) {
        let set = MeasurementSet::new(draft).expect("valid measurements");
        assert_eq!(set.long_jump(), 1.8);
        assert_eq!(set.fifty_meter_run(), 8.5);
        assert_eq!(set.spider(), 12.34);
        assert_eq!(set.eight_shape_run(), 21.0);
        assert_eq!(set.ball_throw(), 25.5);
    }

    #[rstest]
    #[case(0.0, false)]
    #[case(-3.0, false)]
    #[case(f64::NAN, false)]
    #[case(f64::INFINITY, false)]
    #[case(1.0, true)]
    fn long_jump_must_be_positive(
        mut draft: MeasurementDraft,
        #[case] value: f64,
        #[case] accepted: bool,
    ) {
        draft.long_jump_cm = value;
        let result = MeasurementSet::new(draft);
        assert_eq!(result.is_ok(), accepted);
        if let Err(MeasurementError::NotPositive { field, .. }) = result {
            assert_eq!(field, "long_jump_cm");
        }
    }

    #[rstest]
    fn first_offending_field_is_reported(mut draft: MeasurementDraft) {
        draft.spider_ms = 0.0;
        draft.ball_throw_cm = -1.0;
        let err: Error = MeasurementSet::new(draft).expect_err("invalid").into();
        assert_eq!(
            err.details().and_then(|d| d.get("field")),
            Some(&json!("spider_ms"))
        );
    }

    #[rstest]
    fn non_negative_accepts_zero() {
        assert_eq!(non_negative("total_score", 0.0), Ok(0.0));
        assert!(non_negative("total_score", -0.5).is_err());
    }
}
