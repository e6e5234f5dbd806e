//! Store-assigned integer identifiers.

macro_rules! record_id {
    ($(#[$outer:meta])* $name:ident) => {
        $(#[$outer])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw identifier issued by the store.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Raw identifier value.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id! {
    /// Identifier of a physical test result.
    UserResultId
}

record_id! {
    /// Identifier of an average or maximum benchmark row.
    BenchmarkId
}

record_id! {
    /// Identifier of a catalog training.
    TrainingId
}

record_id! {
    /// Identifier of a user training result.
    ///
    /// Ids increase monotonically, so the larger id is the later write.
    TrainingResultId
}
