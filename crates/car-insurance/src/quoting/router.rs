use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use super::domain::{
    BudgetId, BudgetRequest, CarId, CustomerId, DriverId, NewCar, NewCustomer, NewDriver,
};
use super::registry::{RegistryError, RegistryService};
use super::repository::{InsuranceStore, RepositoryError};
use super::service::{BudgetService, BudgetServiceError, Clock, SystemClock};
use super::validation::{RejectionKind, RejectionReason, ValidationConfig};

/// Shared handler state: both services sit on the same store.
pub struct QuotingState<S> {
    pub budgets: Arc<BudgetService<S>>,
    pub registry: Arc<RegistryService<S>>,
}

impl<S> Clone for QuotingState<S> {
    fn clone(&self) -> Self {
        Self {
            budgets: Arc::clone(&self.budgets),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<S> QuotingState<S>
where
    S: InsuranceStore + 'static,
{
    pub fn new(store: Arc<S>, config: ValidationConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<S>, config: ValidationConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            budgets: Arc::new(BudgetService::with_clock(Arc::clone(&store), config, clock)),
            registry: Arc::new(RegistryService::new(store)),
        }
    }
}

/// Router builder exposing budget and registration endpoints.
pub fn quoting_router<S>(state: QuotingState<S>) -> Router
where
    S: InsuranceStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/insurance/budget",
            post(create_budget_handler::<S>).put(update_budget_handler::<S>),
        )
        .route("/api/v1/insurance/budget/:budget_id", get(budget_handler::<S>))
        .route("/api/v1/customers", post(register_customer_handler::<S>))
        .route(
            "/api/v1/customers/:customer_id",
            get(customer_handler::<S>).put(rename_customer_handler::<S>),
        )
        .route("/api/v1/drivers", post(register_driver_handler::<S>))
        .route("/api/v1/cars", post(register_car_handler::<S>))
        .route("/api/v1/cars/:car_id/drivers", post(assign_driver_handler::<S>))
        .with_state(state)
}

/// Status a rejection is reported with. Missing entities are business
/// errors (400), not 404s; a car without a main driver has its own 422.
pub fn status_for(reason: RejectionReason) -> StatusCode {
    match reason.kind() {
        RejectionKind::Malformed
        | RejectionKind::InvalidDates
        | RejectionKind::MissingEntity => StatusCode::BAD_REQUEST,
        RejectionKind::NoMainDriver => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

pub fn error_code_for(reason: RejectionReason) -> &'static str {
    match reason.kind() {
        RejectionKind::Malformed | RejectionKind::InvalidDates => "VALIDATION_ERROR",
        RejectionKind::MissingEntity => "BUSINESS_RULE_VIOLATION",
        RejectionKind::NoMainDriver => "NO_MAIN_DRIVER_REGISTERED",
    }
}

pub(crate) fn rejection_response(reason: RejectionReason) -> Response {
    let payload = json!({
        "error": reason.to_string(),
        "code": error_code_for(reason),
        "reason": reason.label(),
    });
    (status_for(reason), Json(payload)).into_response()
}

fn malformed_payload_response(rejection: JsonRejection) -> Response {
    debug!(error = %rejection.body_text(), "undecodable request payload");
    let payload = json!({
        "error": rejection.body_text(),
        "code": "REQUEST_MALFORMED",
        "reason": RejectionReason::RequestMalformed.label(),
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

fn repository_response(err: RepositoryError) -> Response {
    let (status, code) = match &err {
        RepositoryError::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
        RepositoryError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        RepositoryError::Unavailable(_) => {
            error!(error = %err, "store unavailable");
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    };
    let payload = json!({
        "error": err.to_string(),
        "code": code,
    });
    (status, Json(payload)).into_response()
}

fn budget_error_response(err: BudgetServiceError) -> Response {
    match err {
        BudgetServiceError::Rejected(reason) => rejection_response(reason),
        BudgetServiceError::Repository(err) => repository_response(err),
    }
}

fn registry_error_response(err: RegistryError) -> Response {
    match err {
        RegistryError::Repository(err) => repository_response(err),
        other => {
            let payload = json!({
                "error": other.to_string(),
                "code": "VALIDATION_ERROR",
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn create_budget_handler<S>(
    State(state): State<QuotingState<S>>,
    payload: Result<Json<BudgetRequest>, JsonRejection>,
) -> Response
where
    S: InsuranceStore + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_payload_response(rejection),
    };

    match state.budgets.create(request) {
        Ok(budget) => (StatusCode::CREATED, Json(budget)).into_response(),
        Err(err) => budget_error_response(err),
    }
}

pub(crate) async fn update_budget_handler<S>(
    State(state): State<QuotingState<S>>,
    payload: Result<Json<BudgetRequest>, JsonRejection>,
) -> Response
where
    S: InsuranceStore + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_payload_response(rejection),
    };

    match state.budgets.update(request) {
        Ok(budget) => (StatusCode::OK, Json(budget)).into_response(),
        Err(err) => budget_error_response(err),
    }
}

pub(crate) async fn budget_handler<S>(
    State(state): State<QuotingState<S>>,
    Path(budget_id): Path<i64>,
) -> Response
where
    S: InsuranceStore + 'static,
{
    match state.budgets.get(BudgetId(budget_id)) {
        Ok(budget) => (StatusCode::OK, Json(budget)).into_response(),
        Err(err) => budget_error_response(err),
    }
}

pub(crate) async fn register_customer_handler<S>(
    State(state): State<QuotingState<S>>,
    payload: Result<Json<NewCustomer>, JsonRejection>,
) -> Response
where
    S: InsuranceStore + 'static,
{
    let Json(customer) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_payload_response(rejection),
    };

    match state.registry.register_customer(customer) {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(err) => registry_error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RenameCustomerPayload {
    pub(crate) name: String,
}

pub(crate) async fn rename_customer_handler<S>(
    State(state): State<QuotingState<S>>,
    Path(customer_id): Path<i64>,
    payload: Result<Json<RenameCustomerPayload>, JsonRejection>,
) -> Response
where
    S: InsuranceStore + 'static,
{
    let Json(RenameCustomerPayload { name }) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_payload_response(rejection),
    };

    match state.registry.rename_customer(CustomerId(customer_id), name) {
        Ok(stored) => (StatusCode::OK, Json(stored)).into_response(),
        Err(err) => registry_error_response(err),
    }
}

pub(crate) async fn customer_handler<S>(
    State(state): State<QuotingState<S>>,
    Path(customer_id): Path<i64>,
) -> Response
where
    S: InsuranceStore + 'static,
{
    match state.registry.customer(CustomerId(customer_id)) {
        Ok(customer) => (StatusCode::OK, Json(customer)).into_response(),
        Err(err) => registry_error_response(err),
    }
}

pub(crate) async fn register_driver_handler<S>(
    State(state): State<QuotingState<S>>,
    payload: Result<Json<NewDriver>, JsonRejection>,
) -> Response
where
    S: InsuranceStore + 'static,
{
    let Json(driver) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_payload_response(rejection),
    };

    match state.registry.register_driver(driver) {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(err) => registry_error_response(err),
    }
}

pub(crate) async fn register_car_handler<S>(
    State(state): State<QuotingState<S>>,
    payload: Result<Json<NewCar>, JsonRejection>,
) -> Response
where
    S: InsuranceStore + 'static,
{
    let Json(car) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_payload_response(rejection),
    };

    match state.registry.register_car(car) {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(err) => registry_error_response(err),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssignDriverPayload {
    pub(crate) driver_id: DriverId,
    #[serde(default)]
    pub(crate) main_driver: bool,
}

pub(crate) async fn assign_driver_handler<S>(
    State(state): State<QuotingState<S>>,
    Path(car_id): Path<i64>,
    payload: Result<Json<AssignDriverPayload>, JsonRejection>,
) -> Response
where
    S: InsuranceStore + 'static,
{
    let Json(AssignDriverPayload {
        driver_id,
        main_driver,
    }) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_payload_response(rejection),
    };

    match state
        .registry
        .assign_driver(CarId(car_id), driver_id, main_driver)
    {
        Ok(link) => (StatusCode::CREATED, Json(link)).into_response(),
        Err(err) => registry_error_response(err),
    }
}
