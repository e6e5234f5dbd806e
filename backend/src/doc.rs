//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the response DTOs, the error
//! envelope wrappers from [`crate::inbound::http::schemas`], and the bearer
//! token scheme used by `/me`.
//!
//! The document backs Swagger UI (debug builds) and is exported via
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::benchmarks::{BenchmarkRequest, BenchmarkResponse};
use crate::inbound::http::health::HealthStatus;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, MessageResponse};
use crate::inbound::http::training_results::{
    CategorySummaryResponse, TrainingResultRequest, TrainingResultResponse,
    TrainingResultWithTrainingResponse, TrainingSummaryResponse,
};
use crate::inbound::http::trainings::{TrainingRequest, TrainingResponse};
use crate::inbound::http::user_results::{
    CreateUserResultRequest, MeasurementsResponse, UserResultResponse,
};
use crate::inbound::http::users::{CreateUserRequest, UpdateUserRequest, UserResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Karte backend API",
        description = "Physical test records, cohort benchmarks, and training progress."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::health::health,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::user_results::create_user_result,
        crate::inbound::http::user_results::list_user_results,
        crate::inbound::http::user_results::delete_user_result,
        crate::inbound::http::benchmarks::create_average,
        crate::inbound::http::benchmarks::list_average,
        crate::inbound::http::benchmarks::average_by_grade,
        crate::inbound::http::benchmarks::create_max,
        crate::inbound::http::benchmarks::list_max,
        crate::inbound::http::benchmarks::max_by_grade,
        crate::inbound::http::trainings::list_trainings,
        crate::inbound::http::trainings::create_training,
        crate::inbound::http::trainings::get_training,
        crate::inbound::http::trainings::replace_training,
        crate::inbound::http::trainings::delete_training,
        crate::inbound::http::training_results::create_training_result,
        crate::inbound::http::training_results::list_training_results,
        crate::inbound::http::training_results::list_training_results_for_training,
        crate::inbound::http::training_results::replace_training_result,
        crate::inbound::http::training_results::delete_training_result,
        crate::inbound::http::training_results::training_summary,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        MessageResponse,
        HealthStatus,
        CreateUserRequest,
        UpdateUserRequest,
        UserResponse,
        CreateUserResultRequest,
        MeasurementsResponse,
        UserResultResponse,
        BenchmarkRequest,
        BenchmarkResponse,
        TrainingRequest,
        TrainingResponse,
        TrainingResultRequest,
        TrainingResultResponse,
        TrainingResultWithTrainingResponse,
        CategorySummaryResponse,
        TrainingSummaryResponse,
    )),
    tags(
        (name = "health", description = "Endpoints for health checks"),
        (name = "users", description = "Users and their physical test results"),
        (name = "user_results", description = "Physical test results"),
        (name = "benchmarks", description = "Average and maximum values per grade"),
        (name = "trainings", description = "Training catalog"),
        (name = "training_results", description = "Training results and summaries")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the OpenAPI document structure.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/me",
            "/users/",
            "/users/{user_id}",
            "/user_results/",
            "/user_results/{user_id}",
            "/user_results/{result_id}",
            "/average_data/",
            "/average_data/grade/{grade}",
            "/max_data/",
            "/max_data/grade/{grade}",
            "/trainings/",
            "/trainings/{training_id}",
            "/user-training-results/",
            "/user-training-results/{user_id}",
            "/user-training-results/{user_id}/{training_id}",
            "/user-training-results/{result_id}",
            "/user-training-summary/{user_id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components");
        assert!(components.security_schemes.contains_key("BearerAuth"));
    }

    #[rstest]
    #[case("/users/{user_id}", "get", "404")]
    #[case("/users/", "post", "400")]
    #[case("/trainings/{training_id}", "get", "404")]
    #[case("/user-training-summary/{user_id}", "get", "404")]
    fn error_responses_reference_the_error_schema(
        #[case] path: &str,
        #[case] method: &str,
        #[case] status: &str,
    ) {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("serialise openapi");
        let reference = &doc["paths"][path][method]["responses"][status]["content"]
            ["application/json"]["schema"]["$ref"];
        assert_eq!(
            reference,
            &serde_json::json!(format!("#/components/schemas/{ERROR_SCHEMA_NAME}")),
            "{method} {path} {status}"
        );
    }
}
