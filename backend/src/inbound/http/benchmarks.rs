//! Average and maximum benchmark handlers.
//!
//! Both kinds share one request and response shape; the route picks the
//! [`BenchmarkKind`].

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Benchmark, BenchmarkKind, CohortGrade, Error, MeasurementDraft, MeasurementSet, NewBenchmark,
    total_score,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::user_results::MeasurementsResponse;

/// Body of `POST /average_data/` and `POST /max_data/`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct BenchmarkRequest {
    /// Grade or cohort label.
    #[schema(example = "5")]
    pub grade: String,
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
    /// Optional aggregate score.
    #[serde(default)]
    pub total_score: Option<f64>,
}

impl BenchmarkRequest {
    fn into_new(self, kind: BenchmarkKind) -> Result<NewBenchmark, Error> {
        let grade = CohortGrade::new(&self.grade)?;
        let measurements = MeasurementSet::new(MeasurementDraft {
            long_jump_cm: self.long_jump_cm,
            fifty_meter_run_ms: self.fifty_meter_run_ms,
            spider_ms: self.spider_ms,
            eight_shape_run_count: self.eight_shape_run_count,
            ball_throw_cm: self.ball_throw_cm,
        })?;
        Ok(NewBenchmark {
            kind,
            grade,
            measurements,
            total_score: total_score(self.total_score)?,
        })
    }
}

/// A stored benchmark.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct BenchmarkResponse {
    /// Primary key.
    pub id: i64,
    /// Grade or cohort label.
    pub grade: String,
    /// The five test measurements.
    #[serde(flatten)]
    pub measurements: MeasurementsResponse,
    /// Optional aggregate score.
    pub total_score: Option<f64>,
}

impl From<Benchmark> for BenchmarkResponse {
    fn from(benchmark: Benchmark) -> Self {
        Self {
            id: benchmark.id.get(),
            grade: benchmark.grade.as_ref().to_owned(),
            measurements: MeasurementsResponse::from(&benchmark.measurements),
            total_score: benchmark.total_score,
        }
    }
}

async fn create(
    state: &HttpState,
    kind: BenchmarkKind,
    payload: BenchmarkRequest,
) -> ApiResult<HttpResponse> {
    let benchmark = payload.into_new(kind)?;
    let stored = state.benchmarks.create(benchmark).await?;
    Ok(HttpResponse::Created().json(BenchmarkResponse::from(stored)))
}

async fn list(
    state: &HttpState,
    kind: BenchmarkKind,
) -> ApiResult<web::Json<Vec<BenchmarkResponse>>> {
    let rows = state.benchmarks.list(kind).await?;
    Ok(web::Json(rows.into_iter().map(Into::into).collect()))
}

async fn by_grade(
    state: &HttpState,
    kind: BenchmarkKind,
    raw_grade: &str,
) -> ApiResult<web::Json<BenchmarkResponse>> {
    let grade = CohortGrade::new(raw_grade)?;
    let row = state.benchmarks.get_by_grade(kind, grade).await?;
    Ok(web::Json(row.into()))
}

/// Store the average benchmark for a grade.
#[utoipa::path(
    post,
    path = "/average_data/",
    request_body = BenchmarkRequest,
    responses(
        (status = 201, description = "Benchmark stored", body = BenchmarkResponse),
        (status = 400, description = "Invalid benchmark", body = ErrorSchema),
        (status = 409, description = "Grade already has an average", body = ErrorSchema)
    ),
    tags = ["benchmarks"],
    operation_id = "createAverageData",
    security([])
)]
#[post("/average_data/")]
pub async fn create_average(
    state: web::Data<HttpState>,
    payload: web::Json<BenchmarkRequest>,
) -> ApiResult<HttpResponse> {
    create(&state, BenchmarkKind::Average, payload.into_inner()).await
}

/// Average benchmarks, grade ascending.
#[utoipa::path(
    get,
    path = "/average_data/",
    responses((status = 200, description = "Benchmarks", body = [BenchmarkResponse])),
    tags = ["benchmarks"],
    operation_id = "listAverageData",
    security([])
)]
#[get("/average_data/")]
pub async fn list_average(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<BenchmarkResponse>>> {
    list(&state, BenchmarkKind::Average).await
}

/// Average benchmark for one grade.
#[utoipa::path(
    get,
    path = "/average_data/grade/{grade}",
    params(("grade" = String, Path, description = "Cohort grade")),
    responses(
        (status = 200, description = "Benchmark", body = BenchmarkResponse),
        (status = 404, description = "Average data not found", body = ErrorSchema)
    ),
    tags = ["benchmarks"],
    operation_id = "getAverageDataByGrade",
    security([])
)]
#[get("/average_data/grade/{grade}")]
pub async fn average_by_grade(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<BenchmarkResponse>> {
    by_grade(&state, BenchmarkKind::Average, &path).await
}

/// Store the maximum benchmark for a grade.
#[utoipa::path(
    post,
    path = "/max_data/",
    request_body = BenchmarkRequest,
    responses(
        (status = 201, description = "Benchmark stored", body = BenchmarkResponse),
        (status = 400, description = "Invalid benchmark", body = ErrorSchema),
        (status = 409, description = "Grade already has a maximum", body = ErrorSchema)
    ),
    tags = ["benchmarks"],
    operation_id = "createMaxData",
    security([])
)]
#[post("/max_data/")]
pub async fn create_max(
    state: web::Data<HttpState>,
    payload: web::Json<BenchmarkRequest>,
) -> ApiResult<HttpResponse> {
    create(&state, BenchmarkKind::Max, payload.into_inner()).await
}

/// Maximum benchmarks, grade ascending.
#[utoipa::path(
    get,
    path = "/max_data/",
    responses((status = 200, description = "Benchmarks", body = [BenchmarkResponse])),
    tags = ["benchmarks"],
    operation_id = "listMaxData",
    security([])
)]
#[get("/max_data/")]
pub async fn list_max(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<BenchmarkResponse>>> {
    list(&state, BenchmarkKind::Max).await
}

/// Maximum benchmark for one grade.
#[utoipa::path(
    get,
    path = "/max_data/grade/{grade}",
    params(("grade" = String, Path, description = "Cohort grade")),
    responses(
        (status = 200, description = "Benchmark", body = BenchmarkResponse),
        (status = 404, description = "Max data not found", body = ErrorSchema)
    ),
    tags = ["benchmarks"],
    operation_id = "getMaxDataByGrade",
    security([])
)]
#[get("/max_data/grade/{grade}")]
pub async fn max_by_grade(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<BenchmarkResponse>> {
    by_grade(&state, BenchmarkKind::Max, &path).await
}
