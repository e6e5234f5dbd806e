//! Domain primitives, aggregates, ports, and services.
//!
//! Nothing here depends on actix or diesel. Inbound adapters call the driving
//! ports in [`ports`]; outbound adapters implement the driven ones.

pub mod benchmark;
mod benchmark_service;
pub(crate) mod codes;
pub mod error;
pub mod measurements;
mod physical_test_service;
pub mod ports;
mod record_id;
pub mod trace_id;
pub mod training;
mod training_catalogue_service;
mod training_progress_service;
pub mod training_result;
pub mod training_summary;
pub mod user;
pub mod user_result;
mod user_service;
pub(crate) mod validation;

pub use self::benchmark::{Benchmark, BenchmarkKind, CohortGrade, NewBenchmark, total_score};
pub use self::benchmark_service::BenchmarkService;
pub use self::codes::UnknownCodeError;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::measurements::{MeasurementDraft, MeasurementError, MeasurementSet};
pub use self::physical_test_service::PhysicalTestService;
pub use self::record_id::{BenchmarkId, TrainingId, TrainingResultId, UserResultId};
pub use self::trace_id::TraceId;
pub use self::training::{
    Training, TrainingContent, TrainingDraft, TrainingType, training_type_label,
};
pub use self::training_catalogue_service::TrainingCatalogueService;
pub use self::training_progress_service::TrainingProgressService;
pub use self::training_result::{
    AchievementLevel, TrainingResult, TrainingResultDraft, TrainingResultEntry,
    TrainingResultWithTraining,
};
pub use self::training_summary::{CategorySummary, TrainingStatusRow, TrainingSummary, summarise};
pub use self::user::{
    AuthSubject, Grade, PageRequest, User, UserDraft, UserId, UserName, UserPatch,
    UserValidationError, UserWithResults,
};
pub use self::user_result::{
    NewUserResult, SurfaceType, TestFormat, UserResult, twenty_five_meter_run,
};
pub use self::user_service::UserAccountService;

