//! User training result and summary handlers.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    CategorySummary, Error, TrainingId, TrainingResult, TrainingResultDraft, TrainingResultEntry,
    TrainingResultId, TrainingResultWithTraining, TrainingSummary,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, MessageResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::trainings::{TrainingResponse, TrainingTypeQuery};
use crate::inbound::http::validation::{parse_user_id, training_type_filter};

/// Body of `POST /user-training-results/` and its replacement.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TrainingResultRequest {
    /// User the record belongs to.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: String,
    /// Catalogue entry the result refers to.
    pub training_id: i64,
    /// Day the training was performed.
    pub date: NaiveDate,
    /// 1 NEEDS_IMPROVEMENT, 2 ACHIEVED, 3 EXCELLENT.
    #[schema(example = 2)]
    pub achievement_level: i64,
    /// Optional free-text comment.
    #[serde(default)]
    pub comment: Option<String>,
}

impl TryFrom<TrainingResultRequest> for TrainingResultEntry {
    type Error = Error;

    fn try_from(value: TrainingResultRequest) -> Result<Self, Self::Error> {
        TrainingResultEntry::new(TrainingResultDraft {
            user_id: parse_user_id(&value.user_id)?,
            training_id: TrainingId::new(value.training_id),
            date: value.date,
            achievement_level: value.achievement_level,
            comment: value.comment,
        })
    }
}

/// A stored training result.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct TrainingResultResponse {
    /// Primary key.
    pub id: i64,
    /// User the record belongs to.
    pub user_id: String,
    /// Catalogue entry the result refers to.
    pub training_id: i64,
    /// Day the training was performed.
    pub date: NaiveDate,
    /// Achievement level code.
    pub achievement_level: i16,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<TrainingResult> for TrainingResultResponse {
    fn from(result: TrainingResult) -> Self {
        Self {
            id: result.id.get(),
            user_id: result.user_id.to_string(),
            training_id: result.training_id.get(),
            date: result.date,
            achievement_level: result.level_code,
            comment: result.comment,
            created_at: result.created_at,
            updated_at: result.updated_at,
        }
    }
}

/// A training result with its catalog entry embedded.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct TrainingResultWithTrainingResponse {
    /// The training result.
    #[serde(flatten)]
    pub result: TrainingResultResponse,
    /// The catalogue entry it refers to.
    pub training: TrainingResponse,
}

impl From<TrainingResultWithTraining> for TrainingResultWithTrainingResponse {
    fn from(value: TrainingResultWithTraining) -> Self {
        Self {
            result: value.result.into(),
            training: value.training.into(),
        }
    }
}

/// Achievement counts for one training category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct CategorySummaryResponse {
    /// Training category code.
    pub training_type: i16,
    /// Display label of the category.
    pub training_type_label: String,
    /// Trainings whose latest result needs improvement.
    pub needs_improvement: u32,
    /// Trainings whose latest result is achieved.
    pub achieved: u32,
    /// Trainings whose latest result is excellent.
    pub excellent: u32,
}

impl From<CategorySummary> for CategorySummaryResponse {
    fn from(value: CategorySummary) -> Self {
        Self {
            training_type: value.training_type,
            training_type_label: value.training_type_label,
            needs_improvement: value.needs_improvement,
            achieved: value.achieved,
            excellent: value.excellent,
        }
    }
}

/// Summary over the latest result of each training.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct TrainingSummaryResponse {
    /// User the record belongs to.
    pub user_id: String,
    /// Distinct trainings with at least one result.
    pub total_trainings_with_status: u32,
    /// Per-category counts, ordered by first catalogue entry.
    pub categories: Vec<CategorySummaryResponse>,
}

impl From<TrainingSummary> for TrainingSummaryResponse {
    fn from(value: TrainingSummary) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            total_trainings_with_status: value.total_trainings_with_status,
            categories: value.categories.into_iter().map(Into::into).collect(),
        }
    }
}

/// Record a training result.
#[utoipa::path(
    post,
    path = "/user-training-results/",
    request_body = TrainingResultRequest,
    responses(
        (status = 201, description = "Result recorded", body = TrainingResultResponse),
        (status = 400, description = "Invalid achievement level", body = ErrorSchema),
        (status = 404, description = "User or training not found", body = ErrorSchema)
    ),
    tags = ["training_results"],
    operation_id = "createUserTrainingResult",
    security([])
)]
#[post("/user-training-results/")]
pub async fn create_training_result(
    state: web::Data<HttpState>,
    payload: web::Json<TrainingResultRequest>,
) -> ApiResult<HttpResponse> {
    let entry = TrainingResultEntry::try_from(payload.into_inner())?;
    let stored = state.training_progress.record(entry).await?;
    Ok(HttpResponse::Created().json(TrainingResultResponse::from(stored)))
}

/// A user's training history, newest first.
#[utoipa::path(
    get,
    path = "/user-training-results/{user_id}",
    params(
        ("user_id" = String, Path, description = "User UUID"),
        TrainingTypeQuery
    ),
    responses(
        (status = 200, description = "History", body = [TrainingResultWithTrainingResponse]),
        (status = 400, description = "Invalid user id or training type", body = ErrorSchema)
    ),
    tags = ["training_results"],
    operation_id = "listUserTrainingResults",
    security([])
)]
#[get("/user-training-results/{user_id}")]
pub async fn list_training_results(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<TrainingTypeQuery>,
) -> ApiResult<web::Json<Vec<TrainingResultWithTrainingResponse>>> {
    let user_id = parse_user_id(&path)?;
    let filter = training_type_filter(query.training_type)?;
    let rows = state.training_progress.history(user_id, filter).await?;
    Ok(web::Json(rows.into_iter().map(Into::into).collect()))
}

/// A user's history for one training, newest first.
#[utoipa::path(
    get,
    path = "/user-training-results/{user_id}/{training_id}",
    params(
        ("user_id" = String, Path, description = "User UUID"),
        ("training_id" = i64, Path, description = "Training id")
    ),
    responses(
        (status = 200, description = "History", body = [TrainingResultResponse]),
        (status = 400, description = "Invalid user id", body = ErrorSchema)
    ),
    tags = ["training_results"],
    operation_id = "listUserTrainingResultsForTraining",
    security([])
)]
#[get("/user-training-results/{user_id}/{training_id}")]
pub async fn list_training_results_for_training(
    state: web::Data<HttpState>,
    path: web::Path<(String, i64)>,
) -> ApiResult<web::Json<Vec<TrainingResultResponse>>> {
    let (raw_user_id, training_id) = path.into_inner();
    let user_id = parse_user_id(&raw_user_id)?;
    let rows = state
        .training_progress
        .history_for_training(user_id, TrainingId::new(training_id))
        .await?;
    Ok(web::Json(rows.into_iter().map(Into::into).collect()))
}

/// Replace a training result.
#[utoipa::path(
    put,
    path = "/user-training-results/{result_id}",
    params(("result_id" = i64, Path, description = "Training result id")),
    request_body = TrainingResultRequest,
    responses(
        (status = 200, description = "Result replaced", body = TrainingResultResponse),
        (status = 400, description = "Invalid achievement level", body = ErrorSchema),
        (status = 404, description = "Result, user or training not found", body = ErrorSchema)
    ),
    tags = ["training_results"],
    operation_id = "replaceUserTrainingResult",
    security([])
)]
#[put("/user-training-results/{result_id}")]
pub async fn replace_training_result(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<TrainingResultRequest>,
) -> ApiResult<web::Json<TrainingResultResponse>> {
    let entry = TrainingResultEntry::try_from(payload.into_inner())?;
    let stored = state
        .training_progress
        .replace(TrainingResultId::new(path.into_inner()), entry)
        .await?;
    Ok(web::Json(stored.into()))
}

/// Delete a training result.
#[utoipa::path(
    delete,
    path = "/user-training-results/{result_id}",
    params(("result_id" = i64, Path, description = "Training result id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "User training result not found", body = ErrorSchema)
    ),
    tags = ["training_results"],
    operation_id = "deleteUserTrainingResult",
    security([])
)]
#[delete("/user-training-results/{result_id}")]
pub async fn delete_training_result(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    state
        .training_progress
        .delete(TrainingResultId::new(path.into_inner()))
        .await?;
    Ok(web::Json(MessageResponse::new(
        "User training result deleted successfully",
    )))
}

/// Per-category achievement summary for a user.
#[utoipa::path(
    get,
    path = "/user-training-summary/{user_id}",
    params(("user_id" = String, Path, description = "User UUID")),
    responses(
        (status = 200, description = "Summary", body = TrainingSummaryResponse),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["training_results"],
    operation_id = "getUserTrainingSummary",
    security([])
)]
#[get("/user-training-summary/{user_id}")]
pub async fn training_summary(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TrainingSummaryResponse>> {
    let user_id = parse_user_id(&path)?;
    let summary = state.training_progress.summary(user_id).await?;
    Ok(web::Json(summary.into()))
}

#[cfg(test)]
#[path = "training_results_tests.rs"]
mod tests;
