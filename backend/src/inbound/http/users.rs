//! User handlers.
//!
//! ```text
//! POST /users/            {"name":"Aoi","grade":"5"}
//! GET  /users/?skip=0&limit=100
//! GET  /users/{user_id}
//! PUT  /users/{user_id}   {"grade":"6"}
//! GET  /me                Authorization: Bearer <jwt>
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, Grade, PageRequest, UserDraft, UserName, UserPatch, UserWithResults};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::user_results::UserResultResponse;
use crate::inbound::http::validation::parse_user_id;

/// Body of `POST /users/`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    /// Display name.
    #[schema(example = "Aoi")]
    pub name: String,
    /// Grade or cohort label.
    #[serde(default)]
    #[schema(example = "5")]
    pub grade: String,
    /// Date of birth.
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
}

impl TryFrom<CreateUserRequest> for UserDraft {
    type Error = Error;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: UserName::new(&value.name)?,
            grade: Grade::new(&value.grade)?,
            birthday: value.birthday,
            auth_subject: None,
        })
    }
}

/// Body of `PUT /users/{user_id}`; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Grade or cohort label.
    #[serde(default)]
    pub grade: Option<String>,
    /// Date of birth.
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
}

impl TryFrom<UpdateUserRequest> for UserPatch {
    type Error = Error;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name.as_deref().map(UserName::new).transpose()?,
            grade: value.grade.as_deref().map(Grade::new).transpose()?,
            birthday: value.birthday,
        })
    }
}

/// Pagination parameters for `GET /users/`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Rows to skip, default 0.
    pub skip: Option<i64>,
    /// Maximum rows, default 100, at most 1000.
    pub limit: Option<i64>,
}

/// A user with their physical test results.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserResponse {
    /// Primary key.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Grade or cohort label.
    pub grade: String,
    /// Date of birth.
    pub birthday: Option<NaiveDate>,
    /// Physical test results of the user.
    pub results: Vec<UserResultResponse>,
}

impl From<UserWithResults> for UserResponse {
    fn from(value: UserWithResults) -> Self {
        let UserWithResults { user, results } = value;
        Self {
            id: user.id.to_string(),
            name: user.name.as_ref().to_owned(),
            grade: user.grade.as_ref().to_owned(),
            birthday: user.birthday,
            results: results.into_iter().map(UserResultResponse::from).collect(),
        }
    }
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/users/",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security([])
)]
#[post("/users/")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let draft = UserDraft::try_from(payload.into_inner())?;
    let created = state.users.create_user(draft).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(created)))
}

/// List users with their results.
#[utoipa::path(
    get,
    path = "/users/",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 400, description = "Invalid pagination", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users/")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<ListUsersQuery>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let ListUsersQuery { skip, limit } = query.into_inner();
    let page = PageRequest::new(skip, limit)?;
    let users = state.users.list_users(page).await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Fetch one user with their results.
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(("user_id" = String, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Invalid user id", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = parse_user_id(&path)?;
    let user = state.users.get_user(id).await?;
    Ok(web::Json(user.into()))
}

/// Partially update a user.
#[utoipa::path(
    put,
    path = "/users/{user_id}",
    params(("user_id" = String, Path, description = "User UUID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser",
    security([])
)]
#[put("/users/{user_id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = parse_user_id(&path)?;
    let patch = UserPatch::try_from(payload.into_inner())?;
    let user = state.users.update_user(id, patch).await?;
    Ok(web::Json(user.into()))
}

/// The caller's user, provisioned on first sight of the token subject.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 503, description = "Token verification not configured", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("BearerAuth" = []))
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    Authenticated(subject): Authenticated,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.users.resolve_subject(subject).await?;
    Ok(web::Json(user.into()))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
