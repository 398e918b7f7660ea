use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lernprofil::config::AppConfig;
use lernprofil::error::AppError;
use lernprofil::instrument::item_registry;
use lernprofil::scoring::ENGINE_VERSION;
use lernprofil::telemetry;
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

    let app = router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Build the registry before accepting traffic.
    let items = item_registry().total_items();
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        version = ENGINE_VERSION,
        items,
        "lernprofil scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
