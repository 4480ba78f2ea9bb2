use crate::cli::ServeArgs;
use crate::error::AppError;
use crate::infra::{AppState, PortalState};
use crate::routes::{portal_router, with_service_routes};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use property_hub::config::AppConfig;
use property_hub::telemetry;
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

    let portal = Arc::new(PortalState::in_memory(config.registration.clone()));

    let app = with_service_routes(portal_router(portal))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        registration_timeout = ?config.registration.timeout,
        "property portal ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
