use std::collections::BTreeSet;
use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::sirw::domain::{
    EmployeeId, EvaluationContext, RequestReference, RequestStatus, SirwSubmission,
};
use crate::workflows::sirw::evaluation::{ComplianceEngine, PolicyConfig};
use crate::workflows::sirw::repository::{
    InMemoryRequestRepository, RepositoryError, RequestRecord, RequestRepository,
};
use crate::workflows::sirw::router::sirw_router;
use crate::workflows::sirw::service::SirwRequestService;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn policy() -> PolicyConfig {
    PolicyConfig::default()
}

pub(super) fn engine() -> ComplianceEngine {
    ComplianceEngine::new(policy())
}

pub(super) fn employee() -> EmployeeId {
    EmployeeId("emp-001".to_string())
}

/// Context that passes every rule: Denmark to France, ten workdays.
pub(super) fn context() -> EvaluationContext {
    EvaluationContext {
        has_right_to_work: true,
        is_sales_role: false,
        ineligible_role_categories: BTreeSet::new(),
        duration_days: 10,
        home_country: "Denmark".to_string(),
        destination_country: "France".to_string(),
    }
}

pub(super) fn context_to(destination: &str) -> EvaluationContext {
    EvaluationContext {
        destination_country: destination.to_string(),
        ..context()
    }
}

pub(super) fn context_with_duration(duration_days: u32) -> EvaluationContext {
    EvaluationContext {
        duration_days,
        ..context()
    }
}

/// Submission matching [`context`]: 2025-06-02 (Mon) through 2025-06-13 (Fri).
pub(super) fn submission() -> SirwSubmission {
    SirwSubmission {
        employee: employee(),
        home_country: "Denmark".to_string(),
        destination_country: "France".to_string(),
        start_date: date(2025, 6, 2),
        end_date: date(2025, 6, 13),
        has_right_to_work: true,
        is_sales_role: false,
        ineligible_role_categories: BTreeSet::new(),
        manager_name: "Anna Larsen".to_string(),
        manager_email: "anna.larsen@example.com".to_string(),
        is_exception_request: false,
        exception_reason: None,
    }
}

pub(super) fn today() -> NaiveDate {
    date(2025, 6, 1)
}

pub(super) fn prior_record(
    reference: &str,
    start: NaiveDate,
    end: NaiveDate,
    duration_days: u32,
    status: RequestStatus,
) -> RequestRecord {
    RequestRecord {
        reference: RequestReference(reference.to_string()),
        employee: employee(),
        home_country: "Denmark".to_string(),
        destination_country: "Germany".to_string(),
        start_date: start,
        end_date: end,
        duration_days,
        status,
        decision_reason: String::new(),
        escalation_note: String::new(),
        flags: Vec::new(),
        assessment: None,
    }
}

pub(super) fn build_service() -> (
    SirwRequestService<InMemoryRequestRepository>,
    Arc<InMemoryRequestRepository>,
) {
    let repository = Arc::new(InMemoryRequestRepository::default());
    let service = SirwRequestService::new(repository.clone(), policy());
    (service, repository)
}

pub(super) fn router_with_service(
    service: SirwRequestService<InMemoryRequestRepository>,
) -> axum::Router {
    sirw_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) struct ConflictRepository;

impl RequestRepository for ConflictRepository {
    fn insert(&self, _record: RequestRecord) -> Result<RequestRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: RequestRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(
        &self,
        _reference: &RequestReference,
    ) -> Result<Option<RequestRecord>, RepositoryError> {
        Ok(None)
    }

    fn history(&self, _employee: &EmployeeId) -> Result<Vec<RequestRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl RequestRepository for UnavailableRepository {
    fn insert(&self, _record: RequestRecord) -> Result<RequestRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: RequestRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(
        &self,
        _reference: &RequestReference,
    ) -> Result<Option<RequestRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn history(&self, _employee: &EmployeeId) -> Result<Vec<RequestRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
