//! User data model.
//!
//! A user is a youth athlete whose physical tests and training results are
//! recorded. Users are created explicitly or provisioned on first sign-in
//! through an external identity subject.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::validation::{TextViolation, bounded_text, field_error};
use super::{Error, UserResult};

/// Maximum length of a user name, in characters.
pub const USER_NAME_MAX: usize = 100;
/// Maximum length of a grade label, in characters.
pub const GRADE_MAX: usize = 32;
/// Maximum length of an external auth subject, in characters.
pub const AUTH_SUBJECT_MAX: usize = 255;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The id is not a valid UUID.
    InvalidId {
        /// Rejected input.
        value: String,
    },
    /// The name is blank.
    EmptyName,
    /// The name exceeds `max` characters.
    NameTooLong {
        /// Limit in characters.
        max: usize,
    },
    /// The grade exceeds `max` characters.
    GradeTooLong {
        /// Limit in characters.
        max: usize,
    },
    /// The auth subject is blank.
    EmptyAuthSubject,
    /// The auth subject exceeds `max` characters.
    AuthSubjectTooLong {
        /// Limit in characters.
        max: usize,
    },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId { .. } => write!(f, "user id must be a valid UUID"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::GradeTooLong { max } => write!(f, "grade must be at most {max} characters"),
            Self::EmptyAuthSubject => write!(f, "auth subject must not be empty"),
            Self::AuthSubjectTooLong { max } => {
                write!(f, "auth subject must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

impl From<UserValidationError> for Error {
    fn from(value: UserValidationError) -> Self {
        let message = value.to_string();
        match value {
            UserValidationError::InvalidId { value } => {
                field_error("user_id", "invalid_uuid", json!(value), message)
            }
            UserValidationError::EmptyName => field_error("name", "empty", json!(""), message),
            UserValidationError::NameTooLong { max } => {
                field_error("name", "too_long", json!(max), message)
            }
            UserValidationError::GradeTooLong { max } => {
                field_error("grade", "too_long", json!(max), message)
            }
            UserValidationError::EmptyAuthSubject => {
                field_error("sub", "empty", json!(""), message)
            }
            UserValidationError::AuthSubjectTooLong { max } => {
                field_error("sub", "too_long", json!(max), message)
            }
        }
    }
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId {
                value: raw.to_owned(),
            })
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

/// Trimmed, non-empty user name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct UserName(String);

impl UserName {
    /// Name given to users provisioned from an auth subject.
    pub const PROVISIONED: &'static str = "User";

    /// Validate and construct a [`UserName`].
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        bounded_text(name.as_ref(), USER_NAME_MAX)
            .map(Self)
            .map_err(|violation| match violation {
                TextViolation::Empty => UserValidationError::EmptyName,
                TextViolation::TooLong { max } => UserValidationError::NameTooLong { max },
            })
    }

    fn provisioned() -> Self {
        Self(Self::PROVISIONED.to_owned())
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

/// School grade label such as `"5"` or `"中1"`. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct Grade(String);

impl Grade {
    /// Validate and construct a [`Grade`].
    pub fn new(grade: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = grade.as_ref().trim();
        if trimmed.chars().count() > GRADE_MAX {
            return Err(UserValidationError::GradeTooLong { max: GRADE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Grade {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Grade> for String {
    fn from(value: Grade) -> Self {
        value.0
    }
}

/// Subject claim of a verified identity token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthSubject(String);

impl AuthSubject {
    /// Validate and construct an [`AuthSubject`].
    pub fn new(subject: impl AsRef<str>) -> Result<Self, UserValidationError> {
        bounded_text(subject.as_ref(), AUTH_SUBJECT_MAX)
            .map(Self)
            .map_err(|violation| match violation {
                TextViolation::Empty => UserValidationError::EmptyAuthSubject,
                TextViolation::TooLong { max } => UserValidationError::AuthSubjectTooLong { max },
            })
    }
}

impl AsRef<str> for AuthSubject {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Fields accepted when creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    /// Display name.
    pub name: UserName,
    /// Grade or cohort label.
    pub grade: Grade,
    /// Date of birth.
    pub birthday: Option<NaiveDate>,
    /// Identity-provider subject bound to this user.
    pub auth_subject: Option<AuthSubject>,
}

impl UserDraft {
    /// Draft for a user created on first sign-in.
    pub fn provisioned(subject: AuthSubject) -> Self {
        Self {
            name: UserName::provisioned(),
            grade: Grade::default(),
            birthday: None,
            auth_subject: Some(subject),
        }
    }
}

/// Partial update applied to an existing user. Absent fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// Display name.
    pub name: Option<UserName>,
    /// Grade or cohort label.
    pub grade: Option<Grade>,
    /// Date of birth.
    pub birthday: Option<NaiveDate>,
}

impl UserPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.grade.is_none() && self.birthday.is_none()
    }
}

/// Persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Primary key.
    pub id: UserId,
    /// Display name.
    pub name: UserName,
    /// Grade or cohort label.
    pub grade: Grade,
    /// Date of birth.
    pub birthday: Option<NaiveDate>,
    /// Identity-provider subject bound to this user.
    pub auth_subject: Option<AuthSubject>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Materialise a draft under a freshly issued identifier.
    pub fn from_draft(id: UserId, draft: UserDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            grade: draft.grade,
            birthday: draft.birthday,
            auth_subject: draft.auth_subject,
            created_at,
        }
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(grade) = patch.grade {
            self.grade = grade;
        }
        if let Some(birthday) = patch.birthday {
            self.birthday = Some(birthday);
        }
    }
}

/// A user together with their physical test results.
#[derive(Debug, Clone, PartialEq)]
pub struct UserWithResults {
    /// The user.
    pub user: User,
    /// Physical test results of the user.
    pub results: Vec<UserResult>,
}

/// Offset pagination for user listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    skip: u32,
    limit: u32,
}

impl PageRequest {
    /// Page size when `limit` is absent.
    pub const DEFAULT_LIMIT: u32 = 100;
    /// Largest accepted page size.
    pub const MAX_LIMIT: u32 = 1000;

    /// Validate `skip` and `limit`, applying defaults for absent values.
    pub fn new(skip: Option<i64>, limit: Option<i64>) -> Result<Self, Error> {
        let skip = skip.unwrap_or(0);
        let limit = limit.unwrap_or(i64::from(Self::DEFAULT_LIMIT));
        let skip = u32::try_from(skip).map_err(|_| {
            field_error(
                "skip",
                "out_of_range",
                json!(skip),
                "skip must be a non-negative integer",
            )
        })?;
        let limit = u32::try_from(limit)
            .ok()
            .filter(|value| (1..=Self::MAX_LIMIT).contains(value))
            .ok_or_else(|| {
                field_error(
                    "limit",
                    "out_of_range",
                    json!(limit),
                    format!("limit must be between 1 and {}", Self::MAX_LIMIT),
                )
            })?;
        Ok(Self { skip, limit })
    }

    /// Rows to skip.
    pub fn skip(&self) -> u32 {
        self.skip
    }

    /// Maximum rows to return.
    pub fn limit(&self) -> u32 {
        self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests;
