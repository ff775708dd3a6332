use crate::cli::ServeArgs;
use crate::infra::{in_memory_service, AppState};
use crate::routes::with_reputation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use ratedin::config::AppConfig;
use ratedin::error::AppError;
use ratedin::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(in_memory_service(config.reputation.leaderboard_limit));

    let app = with_reputation_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        leaderboard_limit = config.reputation.leaderboard_limit,
        "ratedin reputation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
