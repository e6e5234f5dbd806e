//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use tracing::info;

use backend::Trace;
use actix_cors::Cors;
use backend::middleware::cors;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::benchmarks::{
    average_by_grade, create_average, create_max, list_average, list_max, max_by_grade,
};
use backend::inbound::http::error::configure_extractors;
use backend::inbound::http::health::{HealthState, health, live, ready};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::training_results::{
    create_training_result, delete_training_result, list_training_results,
    list_training_results_for_training, replace_training_result, training_summary,
};
use backend::inbound::http::trainings::{
    create_training, delete_training, get_training, list_trainings, replace_training,
};
use backend::inbound::http::user_results::{
    create_user_result, delete_user_result, list_user_results,
};
use backend::inbound::http::users::{
    create_user, current_user, get_user, list_users, update_user,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    cors_layer: Cors,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .configure(configure_extractors)
        .wrap(Trace)
        .wrap(cors_layer)
        .service(ready)
        .service(live)
        .service(health)
        .service(current_user)
        .service(create_user)
        .service(list_users)
        .service(get_user)
        .service(update_user)
        .service(create_user_result)
        .service(list_user_results)
        .service(delete_user_result)
        .service(create_average)
        .service(list_average)
        .service(average_by_grade)
        .service(create_max)
        .service(list_max)
        .service(max_by_grade)
        .service(list_trainings)
        .service(create_training)
        .service(get_training)
        .service(replace_training)
        .service(delete_training)
        .service(create_training_result)
        .service(list_training_results)
        .service(list_training_results_for_training)
        .service(replace_training_result)
        .service(delete_training_result)
        .service(training_summary);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

#[cfg(feature = "metrics")]
fn build_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("karte")
        .endpoint("/metrics")
        .build()
        .map_err(|err| std::io::Error::other(format!("configure Prometheus metrics: {err}")))
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let bind_addr = config.bind_addr();
    let cors_origins = config.cors_origins.clone();

    #[cfg(feature = "metrics")]
    let prometheus = build_metrics()?;

    let server = HttpServer::new(move || {
        let app = build_app(
            server_health_state.clone(),
            http_state.clone(),
            cors(&cors_origins),
        );

        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}
