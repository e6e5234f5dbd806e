//! Training catalog handlers.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, Training, TrainingContent, TrainingDraft, TrainingId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, MessageResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::training_type_filter;

/// Body of `POST /trainings/` and `PUT /trainings/{training_id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TrainingRequest {
    /// 1 FLEXIBILITY, 2 CORE, 3 STRENGTH, 4 LADDER, 5 WARMUP, 6 COOLDOWN.
    #[schema(example = 2)]
    pub training_type: i64,
    /// Exercise title.
    #[schema(example = "Plank")]
    pub title: String,
    /// Optional image reference.
    #[serde(default)]
    pub image_path: Option<String>,
    /// Exercise description.
    #[serde(default)]
    pub description: String,
    /// Optional step-by-step instructions.
    #[serde(default)]
    pub instructions: Option<String>,
    /// Source series the entry belongs to.
    #[serde(default)]
    pub series_name: Option<String>,
    /// Position within the series.
    #[serde(default)]
    pub series_number: Option<i64>,
    /// Page within the source material.
    #[serde(default)]
    pub page_number: Option<i64>,
}

impl TryFrom<TrainingRequest> for TrainingContent {
    type Error = Error;

    fn try_from(value: TrainingRequest) -> Result<Self, Self::Error> {
        TrainingContent::new(TrainingDraft {
            training_type: value.training_type,
            title: value.title,
            image_path: value.image_path,
            description: value.description,
            instructions: value.instructions,
            series_name: value.series_name,
            series_number: value.series_number,
            page_number: value.page_number,
        })
    }
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct TrainingResponse {
    /// Primary key.
    pub id: i64,
    /// Training category code.
    pub training_type: i16,
    /// Display label of the category.
    #[schema(example = "CORE")]
    pub training_type_label: String,
    /// Exercise title.
    pub title: String,
    /// Optional image reference.
    pub image_path: Option<String>,
    /// Exercise description.
    pub description: String,
    /// Optional step-by-step instructions.
    pub instructions: Option<String>,
    /// Source series the entry belongs to.
    pub series_name: Option<String>,
    /// Position within the series.
    pub series_number: Option<i32>,
    /// Page within the source material.
    pub page_number: Option<i32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Training> for TrainingResponse {
    fn from(training: Training) -> Self {
        let content = training.content;
        Self {
            id: training.id.get(),
            training_type: content.training_type.code(),
            training_type_label: content.training_type.label().to_owned(),
            title: content.title,
            image_path: content.image_path,
            description: content.description,
            instructions: content.instructions,
            series_name: content.series_name,
            series_number: content.series_number,
            page_number: content.page_number,
            created_at: training.created_at,
            updated_at: training.updated_at,
        }
    }
}

/// Optional filter shared by catalog and history listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrainingTypeQuery {
    /// Training type code to filter by.
    pub training_type: Option<i64>,
}

/// List catalog entries.
#[utoipa::path(
    get,
    path = "/trainings/",
    params(TrainingTypeQuery),
    responses(
        (status = 200, description = "Catalog", body = [TrainingResponse]),
        (status = 400, description = "Unknown training type", body = ErrorSchema)
    ),
    tags = ["trainings"],
    operation_id = "listTrainings",
    security([])
)]
#[get("/trainings/")]
pub async fn list_trainings(
    state: web::Data<HttpState>,
    query: web::Query<TrainingTypeQuery>,
) -> ApiResult<web::Json<Vec<TrainingResponse>>> {
    let filter = training_type_filter(query.training_type)?;
    let rows = state.trainings.list(filter).await?;
    Ok(web::Json(rows.into_iter().map(Into::into).collect()))
}

/// Add a catalog entry.
#[utoipa::path(
    post,
    path = "/trainings/",
    request_body = TrainingRequest,
    responses(
        (status = 201, description = "Training created", body = TrainingResponse),
        (status = 400, description = "Invalid training", body = ErrorSchema)
    ),
    tags = ["trainings"],
    operation_id = "createTraining",
    security([])
)]
#[post("/trainings/")]
pub async fn create_training(
    state: web::Data<HttpState>,
    payload: web::Json<TrainingRequest>,
) -> ApiResult<HttpResponse> {
    let content = TrainingContent::try_from(payload.into_inner())?;
    let training = state.trainings.create(content).await?;
    Ok(HttpResponse::Created().json(TrainingResponse::from(training)))
}

/// Fetch one catalog entry.
#[utoipa::path(
    get,
    path = "/trainings/{training_id}",
    params(("training_id" = i64, Path, description = "Training id")),
    responses(
        (status = 200, description = "Training", body = TrainingResponse),
        (status = 404, description = "Training not found", body = ErrorSchema)
    ),
    tags = ["trainings"],
    operation_id = "getTraining",
    security([])
)]
#[get("/trainings/{training_id}")]
pub async fn get_training(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<TrainingResponse>> {
    let training = state.trainings.get(TrainingId::new(path.into_inner())).await?;
    Ok(web::Json(training.into()))
}

/// Replace every field of a catalog entry.
#[utoipa::path(
    put,
    path = "/trainings/{training_id}",
    params(("training_id" = i64, Path, description = "Training id")),
    request_body = TrainingRequest,
    responses(
        (status = 200, description = "Training replaced", body = TrainingResponse),
        (status = 400, description = "Invalid training", body = ErrorSchema),
        (status = 404, description = "Training not found", body = ErrorSchema)
    ),
    tags = ["trainings"],
    operation_id = "replaceTraining",
    security([])
)]
#[put("/trainings/{training_id}")]
pub async fn replace_training(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<TrainingRequest>,
) -> ApiResult<web::Json<TrainingResponse>> {
    let content = TrainingContent::try_from(payload.into_inner())?;
    let training = state
        .trainings
        .replace(TrainingId::new(path.into_inner()), content)
        .await?;
    Ok(web::Json(training.into()))
}

/// Remove a catalog entry together with its recorded results.
#[utoipa::path(
    delete,
    path = "/trainings/{training_id}",
    params(("training_id" = i64, Path, description = "Training id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Training not found", body = ErrorSchema)
    ),
    tags = ["trainings"],
    operation_id = "deleteTraining",
    security([])
)]
#[delete("/trainings/{training_id}")]
pub async fn delete_training(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    state.trainings.delete(TrainingId::new(path.into_inner())).await?;
    Ok(web::Json(MessageResponse::new("Training deleted successfully")))
}

#[cfg(test)]
#[path = "trainings_tests.rs"]
mod tests;
