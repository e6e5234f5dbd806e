//! Physical test result handlers.
//!
//! Measurements are sent and stored in base units (cm, ms, counts); the
//! response adds the derived metres and seconds alongside.

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, MeasurementDraft, MeasurementSet, NewUserResult, SurfaceType, TestFormat, UserResult,
    UserResultId, twenty_five_meter_run,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, MessageResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_user_id;

/// Body of `POST /user_results/`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserResultRequest {
    /// User the record belongs to.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: String,
    /// Day the test was taken.
    pub date: NaiveDate,
    /// Standing long jump in centimetres.
    #[schema(example = 152.0)]
    pub long_jump_cm: f64,
    /// 50 m sprint in milliseconds.
    #[schema(example = 9120.0)]
    pub fifty_meter_run_ms: f64,
    /// Spider agility drill in milliseconds.
    #[schema(example = 10450.0)]
    pub spider_ms: f64,
    /// Figure-eight run count.
    #[schema(example = 14.0)]
    pub eight_shape_run_count: f64,
    /// Ball throw in centimetres.
    #[schema(example = 1830.0)]
    pub ball_throw_cm: f64,
    /// Seconds.
    #[serde(default)]
    pub twenty_five_meter_run: Option<f64>,
    /// 1 artificial grass, 2 hard, 3 clay.
    #[serde(default, alias = "serfece")]
    pub surface: Option<i64>,
    /// 1 national, 2 regional.
    #[serde(default)]
    pub test_format: Option<i64>,
}

impl TryFrom<CreateUserResultRequest> for NewUserResult {
    type Error = Error;

    fn try_from(value: CreateUserResultRequest) -> Result<Self, Self::Error> {
        let measurements = MeasurementSet::new(MeasurementDraft {
            long_jump_cm: value.long_jump_cm,
            fifty_meter_run_ms: value.fifty_meter_run_ms,
            spider_ms: value.spider_ms,
            eight_shape_run_count: value.eight_shape_run_count,
            ball_throw_cm: value.ball_throw_cm,
        })?;
        Ok(Self {
            user_id: parse_user_id(&value.user_id)?,
            date: value.date,
            measurements,
            twenty_five_meter_run: twenty_five_meter_run(value.twenty_five_meter_run)?,
            surface: value.surface.map(SurfaceType::try_from_code).transpose()?,
            test_format: value.test_format.map(TestFormat::try_from_code).transpose()?,
        })
    }
}

/// Measurements in stored and display units.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct MeasurementsResponse {
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
    /// Metres.
    pub long_jump: f64,
    /// Seconds.
    pub fifty_meter_run: f64,
    /// Seconds.
    pub spider: f64,
    /// Figure-eight run count.
    pub eight_shape_run: f64,
    /// Metres.
    pub ball_throw: f64,
}

impl From<&MeasurementSet> for MeasurementsResponse {
    fn from(set: &MeasurementSet) -> Self {
        Self {
            long_jump_cm: set.long_jump_cm(),
            fifty_meter_run_ms: set.fifty_meter_run_ms(),
            spider_ms: set.spider_ms(),
            eight_shape_run_count: set.eight_shape_run_count(),
            ball_throw_cm: set.ball_throw_cm(),
            long_jump: set.long_jump(),
            fifty_meter_run: set.fifty_meter_run(),
            spider: set.spider(),
            eight_shape_run: set.eight_shape_run(),
            ball_throw: set.ball_throw(),
        }
    }
}

/// A stored physical test result.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct UserResultResponse {
    /// Primary key.
    pub id: i64,
    /// User the record belongs to.
    pub user_id: String,
    /// Day the test was taken.
    pub date: NaiveDate,
    /// The five test measurements.
    #[serde(flatten)]
    pub measurements: MeasurementsResponse,
    /// Optional 25 m run time in seconds.
    pub twenty_five_meter_run: Option<f64>,
    /// Surface type code.
    pub surface: Option<i16>,
    /// Test format code.
    pub test_format: Option<i16>,
}

impl From<UserResult> for UserResultResponse {
    fn from(result: UserResult) -> Self {
        Self {
            id: result.id.get(),
            user_id: result.user_id.to_string(),
            date: result.date,
            measurements: MeasurementsResponse::from(&result.measurements),
            twenty_five_meter_run: result.twenty_five_meter_run,
            surface: result.surface.map(SurfaceType::code),
            test_format: result.test_format.map(TestFormat::code),
        }
    }
}

/// Record a physical test result.
#[utoipa::path(
    post,
    path = "/user_results/",
    request_body = CreateUserResultRequest,
    responses(
        (status = 201, description = "Result recorded", body = UserResultResponse),
        (status = 400, description = "Invalid measurement or code", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["user_results"],
    operation_id = "createUserResult",
    security([])
)]
#[post("/user_results/")]
pub async fn create_user_result(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserResultRequest>,
) -> ApiResult<HttpResponse> {
    let result = NewUserResult::try_from(payload.into_inner())?;
    let stored = state.physical_tests.record(result).await?;
    Ok(HttpResponse::Created().json(UserResultResponse::from(stored)))
}

/// Results recorded for a user, oldest first.
#[utoipa::path(
    get,
    path = "/user_results/{user_id}",
    params(("user_id" = String, Path, description = "User UUID")),
    responses(
        (status = 200, description = "Results", body = [UserResultResponse]),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["user_results"],
    operation_id = "listUserResults",
    security([])
)]
#[get("/user_results/{user_id}")]
pub async fn list_user_results(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<UserResultResponse>>> {
    let user_id = parse_user_id(&path)?;
    let results = state.physical_tests.list_for_user(user_id).await?;
    Ok(web::Json(results.into_iter().map(Into::into).collect()))
}

/// Delete a result.
#[utoipa::path(
    delete,
    path = "/user_results/{result_id}",
    params(("result_id" = i64, Path, description = "Result id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Result not found", body = ErrorSchema)
    ),
    tags = ["user_results"],
    operation_id = "deleteUserResult",
    security([])
)]
#[delete("/user_results/{result_id}")]
pub async fn delete_user_result(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    state
        .physical_tests
        .delete(UserResultId::new(path.into_inner()))
        .await?;
    Ok(web::Json(MessageResponse::new("Result deleted successfully")))
}

#[cfg(test)]
#[path = "user_results_tests.rs"]
mod tests;
