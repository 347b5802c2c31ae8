use crate::cli::ServeArgs;
use crate::infra::{AppState, ProgramServices};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use program_finder::config::AppConfig;
use program_finder::error::AppError;
use program_finder::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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

    telemetry::init(&config.telemetry)?;

    if config.search.credentials.is_empty() || config.search.engine_id.is_empty() {
        warn!("search credentials or engine id missing; /search will report cse_error");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = ProgramServices::from_config(&config)?
        .into_router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        credentials = config.search.credentials.len(),
        "program finder ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
