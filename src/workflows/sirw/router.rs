use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Datelike, Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::countries;
use super::domain::{EmployeeId, RequestReference};
use super::repository::{RepositoryError, RequestRepository};
use super::service::{ServiceError, SirwRequestService};

/// Router builder exposing the SIRW decision endpoints.
pub fn sirw_router<R>(service: Arc<SirwRequestService<R>>) -> Router
where
    R: RequestRepository + 'static,
{
    Router::new()
        .route("/api/v1/sirw/requests", post(submit_handler::<R>))
        .route(
            "/api/v1/sirw/requests/:reference",
            get(status_handler::<R>).delete(cancel_handler::<R>),
        )
        .route("/api/v1/sirw/balance/:employee", get(balance_handler::<R>))
        .route("/api/v1/sirw/overlap-check", post(overlap_handler::<R>))
        .route("/api/v1/sirw/countries", get(blocked_countries_handler))
        .route("/api/v1/sirw/countries/:country", get(country_handler))
        .route("/api/v1/sirw/rules", get(rules_handler::<R>))
        .with_state(service)
}

fn error_payload(message: impl ToString) -> axum::Json<serde_json::Value> {
    axum::Json(json!({ "error": message.to_string() }))
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<SirwRequestService<R>>>,
    axum::Json(submission): axum::Json<super::domain::SirwSubmission>,
) -> Response
where
    R: RequestRepository + 'static,
{
    match service.submit(submission, Local::now().date_naive()) {
        Ok(decision) => (StatusCode::CREATED, axum::Json(decision)).into_response(),
        Err(ServiceError::Submission(violation)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, error_payload(violation)).into_response()
        }
        Err(ServiceError::Context(error)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, error_payload(error)).into_response()
        }
        Err(ServiceError::Repository(RepositoryError::Conflict)) => {
            (StatusCode::CONFLICT, error_payload("request already exists")).into_response()
        }
        Err(other) => (StatusCode::INTERNAL_SERVER_ERROR, error_payload(other)).into_response(),
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<SirwRequestService<R>>>,
    Path(reference): Path<String>,
) -> Response
where
    R: RequestRepository + 'static,
{
    let reference = RequestReference(reference);
    match service.get(&reference) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(ServiceError::Repository(RepositoryError::NotFound)) => {
            (StatusCode::NOT_FOUND, error_payload("request not found")).into_response()
        }
        Err(other) => (StatusCode::INTERNAL_SERVER_ERROR, error_payload(other)).into_response(),
    }
}

/// Soft delete: the record stays retrievable with a `cancelled` status.
pub(crate) async fn cancel_handler<R>(
    State(service): State<Arc<SirwRequestService<R>>>,
    Path(reference): Path<String>,
) -> Response
where
    R: RequestRepository + 'static,
{
    let reference = RequestReference(reference);
    match service.cancel(&reference) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(ServiceError::Repository(RepositoryError::NotFound)) => {
            (StatusCode::NOT_FOUND, error_payload("request not found")).into_response()
        }
        Err(other) => (StatusCode::INTERNAL_SERVER_ERROR, error_payload(other)).into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BalanceQuery {
    year: Option<i32>,
}

pub(crate) async fn balance_handler<R>(
    State(service): State<Arc<SirwRequestService<R>>>,
    Path(employee): Path<String>,
    Query(query): Query<BalanceQuery>,
) -> Response
where
    R: RequestRepository + 'static,
{
    let employee = EmployeeId(employee);
    let year = query.year.unwrap_or_else(|| Local::now().year());
    match service.balance(&employee, year) {
        Ok(balance) => (StatusCode::OK, axum::Json(json!({
            "year": year,
            "days_allowed": balance.days_allowed,
            "days_used": balance.days_used,
            "days_remaining": balance.days_remaining,
        })))
        .into_response(),
        Err(other) => (StatusCode::INTERNAL_SERVER_ERROR, error_payload(other)).into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverlapCheckRequest {
    pub employee: EmployeeId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub(crate) async fn overlap_handler<R>(
    State(service): State<Arc<SirwRequestService<R>>>,
    axum::Json(request): axum::Json<OverlapCheckRequest>,
) -> Response
where
    R: RequestRepository + 'static,
{
    match service.overlap_check(&request.employee, request.start_date, request.end_date) {
        Ok(check) => (StatusCode::OK, axum::Json(check)).into_response(),
        Err(other) => (StatusCode::INTERNAL_SERVER_ERROR, error_payload(other)).into_response(),
    }
}

/// Pre-submission destination check; unknown countries report as eligible.
pub(crate) async fn country_handler(Path(country): Path<String>) -> Response {
    let classification = countries::classify(&country);
    (StatusCode::OK, axum::Json(classification)).into_response()
}

pub(crate) async fn blocked_countries_handler() -> Response {
    let entries: Vec<_> = countries::all_blocked().collect();
    (StatusCode::OK, axum::Json(entries)).into_response()
}

/// Public reflection of the registered rules for documentation screens.
pub(crate) async fn rules_handler<R>(
    State(service): State<Arc<SirwRequestService<R>>>,
) -> Response
where
    R: RequestRepository + 'static,
{
    (StatusCode::OK, axum::Json(service.rules())).into_response()
}
