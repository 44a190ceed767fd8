use crate::cli::ServeArgs;
use crate::infra::{build_library, AppState};
use crate::routes::with_library_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use library_core::router::shared;
use library_core::{telemetry, AppConfig, AppError, SystemClock};
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

    let library = build_library(
        Arc::new(SystemClock),
        config.circulation,
        args.catalog_csv.as_deref(),
    )?;

    let app = with_library_routes(shared(library))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        fine_per_day = config.circulation.fine_per_day,
        hold_days = config.circulation.reservation_hold_days,
        "library desk ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
