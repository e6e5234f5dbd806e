//! Helpers turning field-level validation failures into domain errors.

use serde_json::{Value, json};

use super::Error;

/// Build an `invalid_request` error describing one offending field.
pub(crate) fn field_error(
    field: &str,
    code: &str,
    value: Value,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "value": value,
        "code": code,
    }))
}

/// Trim `value` and reject it when empty or longer than `max` characters.
pub(crate) fn bounded_text(value: &str, max: usize) -> Result<String, TextViolation> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TextViolation::Empty);
    }
    if trimmed.chars().count() > max {
        return Err(TextViolation::TooLong { max });
    }
    Ok(trimmed.to_owned())
}

/// Reasons a free-text field fails [`bounded_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextViolation {
    Empty,
    TooLong { max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("  Ada  ", Ok("Ada".to_owned()))]
    #[case("   ", Err(TextViolation::Empty))]
    #[case("abcdef", Err(TextViolation::TooLong { max: 5 }))]
    fn bounded_text_trims_and_limits(
        #[case] input: &str,
        #[case] expected: Result<String, TextViolation>,
    ) {
        assert_eq!(bounded_text(input, 5), expected);
    }

    #[rstest]
    fn field_error_carries_details() {
        let error = field_error("title", "empty", json!(""), "title must not be empty");
        assert_eq!(
            error.details(),
            Some(&json!({"field": "title", "value": "", "code": "empty"}))
        );
    }
}
