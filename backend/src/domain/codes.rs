//! Closed integer-coded enumerations shared by stored records.
//!
//! Codes are persisted as `SMALLINT` and travel over the wire as plain
//! integers. Parsing an unknown code yields an [`UnknownCodeError`] naming the
//! field and the legal codes.

use serde_json::json;

use super::Error;

/// An integer code outside the closed set accepted for a field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {field}: {value}. Valid values: {valid_values:?}")]
pub struct UnknownCodeError {
    field: &'static str,
    value: i64,
    valid_values: Vec<i16>,
}

impl UnknownCodeError {
    /// Describe a rejected `value` for `field`.
    pub fn new(field: &'static str, value: i64, valid_values: Vec<i16>) -> Self {
        Self {
            field,
            value,
            valid_values,
        }
    }

    /// Name of the rejected field.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// The rejected code.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// The codes that would have been accepted.
    pub fn valid_values(&self) -> &[i16] {
        &self.valid_values
    }
}

impl From<UnknownCodeError> for Error {
    fn from(value: UnknownCodeError) -> Self {
        Self::invalid_request(value.to_string()).with_details(json!({
            "field": value.field,
            "value": value.value,
            "code": "invalid_enum_value",
            "validValues": value.valid_values,
        }))
    }
}

macro_rules! coded_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident ($field:literal) {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $code:literal => $label:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[doc = concat!("`", $label, "`, stored as ", stringify!($code), ".")]
                $variant,
            )+
        }

        impl $name {
            /// Every member in code order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire and storage code.
            pub const fn code(self) -> i16 {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Upper-case symbolic name.
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            /// Look up a member by code.
            pub fn from_code(code: i64) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Legal codes in ascending order.
            pub fn valid_codes() -> Vec<i16> {
                Self::ALL.iter().map(|member| member.code()).collect()
            }

            /// Parse `code`, reporting the field and legal codes on failure.
            pub fn try_from_code(code: i64) -> Result<Self, $crate::domain::UnknownCodeError> {
                Self::from_code(code).ok_or_else(|| {
                    $crate::domain::UnknownCodeError::new($field, code, Self::valid_codes())
                })
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

pub(crate) use coded_enum;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    coded_enum! {
        /// Test-only enumeration.
        pub enum Colour ("colour") {
            Red = 1 => "RED",
            Blue = 2 => "BLUE",
        }
    }

    #[rstest]
    #[case(1, Some(Colour::Red))]
    #[case(2, Some(Colour::Blue))]
    #[case(3, None)]
    #[case(-1, None)]
    fn from_code_matches_members(#[case] code: i64, #[case] expected: Option<Colour>) {
        assert_eq!(Colour::from_code(code), expected);
    }

    #[rstest]
    fn unknown_codes_list_valid_values() {
        let err = Colour::try_from_code(99).expect_err("99 is not a colour");
        assert_eq!(err.to_string(), "Invalid colour: 99. Valid values: [1, 2]");
        assert_eq!(err.valid_values(), &[1, 2]);
    }

    #[rstest]
    fn unknown_code_errors_become_invalid_requests() {
        let err: Error = Colour::try_from_code(7).expect_err("7 is unknown").into();
        assert_eq!(err.code(), crate::domain::ErrorCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({
                "field": "colour",
                "value": 7,
                "code": "invalid_enum_value",
                "validValues": [1, 2],
            }))
        );
    }
}
