//! Parsing helpers shared by the HTTP handlers.

use crate::domain::{Error, TrainingType, UserId};

/// Parse a user id taken from a path segment or body field.
pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(Error::from)
}

/// Validate an optional `training_type` query filter.
pub(crate) fn training_type_filter(raw: Option<i64>) -> Result<Option<TrainingType>, Error> {
    raw.map(TrainingType::try_from_code)
        .transpose()
        .map_err(Error::from)
}
