use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_screening_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use recruitment_ai::config::{AppConfig, ModelConfig};
use recruitment_ai::error::AppError;
use recruitment_ai::screening::{ClassifierCache, InferenceSession};
use recruitment_ai::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(model) = args.model.take() {
        config.model = ModelConfig::new(model)?;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let cache = Arc::new(ClassifierCache::from_path(config.model.path.clone()));
    let session = Arc::new(InferenceSession::new(cache));
    if let Err(err) = session.load_classifier() {
        warn!(error = %err, "serving without a classifier; submissions will report the load error");
    }

    let app = with_screening_routes(session)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, model = %config.model.path.display(), "recruitment verdict service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
