use crate::cli::ServeArgs;
use crate::infra::{seed_sample_data, AppState};
use crate::routes::with_quoting_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use car_insurance::config::AppConfig;
use car_insurance::error::AppError;
use car_insurance::quoting::{InMemoryInsuranceStore, QuotingState};
use car_insurance::telemetry;
use std::sync::atomic::Ordering;
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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryInsuranceStore::new());
    let state = QuotingState::new(store, config.quoting);

    if args.seed_sample_data {
        let sample = seed_sample_data(&state.registry)?;
        info!(
            customer = %sample.customer,
            car_with_main_driver = %sample.car_with_main_driver,
            car_without_main_driver = %sample.car_without_main_driver,
            "sample data loaded"
        );
    }

    let app = with_quoting_routes(state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        max_coverage_months = config.quoting.max_coverage_months,
        "car insurance quoting api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
