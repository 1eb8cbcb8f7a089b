use crate::cli::ServeArgs;
use crate::infra::{load_definition, AppState, LeadSink};
use crate::routes::with_quiz_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use pipeline_quiz::config::AppConfig;
use pipeline_quiz::error::AppError;
use pipeline_quiz::quiz::{QuizService, RandomVariantSource};
use pipeline_quiz::telemetry;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.quiz_config.take() {
        config.quiz.definition_path = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let definition = Arc::new(load_definition(config.quiz.definition_path.as_deref())?);
    let sink = LeadSink::from_settings(&config.quiz);
    info!(
        questions = definition.len(),
        sink = %sink.describe(),
        "quiz definition loaded"
    );
    let quiz_service = Arc::new(QuizService::new(definition, Arc::new(sink)));
    let variants = Arc::new(Mutex::new(RandomVariantSource::from_seed(
        config.quiz.variant_seed,
    )));

    let app = with_quiz_routes(quiz_service, variants)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "pipeline quiz service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
