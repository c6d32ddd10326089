use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{EmployeeId, RequestReference, RequestStatus};
use super::evaluation::{AssessmentFlag, AssessmentResult};

/// Persisted remote work request, decision fields included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub reference: RequestReference,
    pub employee: EmployeeId,
    pub home_country: String,
    pub destination_country: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Workday count of the inclusive date range, computed once at intake and
    /// reused by balance and overlap queries.
    pub duration_days: u32,
    pub status: RequestStatus,
    pub decision_reason: String,
    pub escalation_note: String,
    pub flags: Vec<AssessmentFlag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<AssessmentResult>,
}

impl RequestRecord {
    pub fn status_view(&self) -> RequestStatusView {
        RequestStatusView {
            reference: self.reference.clone(),
            status: self.status.label(),
            decision_reason: self.decision_reason.clone(),
            escalation_note: self.escalation_note.clone(),
            flags: self.flags.clone(),
        }
    }
}

/// Sanitized representation of a request's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct RequestStatusView {
    pub reference: RequestReference,
    pub status: &'static str,
    pub decision_reason: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub escalation_note: String,
    pub flags: Vec<AssessmentFlag>,
}

/// Storage abstraction so the service module can be exercised in isolation.
/// Fetching an employee's history happens before the decision core runs.
pub trait RequestRepository: Send + Sync {
    fn insert(&self, record: RequestRecord) -> Result<RequestRecord, RepositoryError>;
    fn update(&self, record: RequestRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, reference: &RequestReference) -> Result<Option<RequestRecord>, RepositoryError>;
    fn history(&self, employee: &EmployeeId) -> Result<Vec<RequestRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Mutex-guarded map used by the bundled server and by tests. Production
/// deployments substitute their own [`RequestRepository`].
#[derive(Debug, Default)]
pub struct InMemoryRequestRepository {
    records: Mutex<HashMap<RequestReference, RequestRecord>>,
}

impl RequestRepository for InMemoryRequestRepository {
    fn insert(&self, record: RequestRecord) -> Result<RequestRecord, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))?;
        if guard.contains_key(&record.reference) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.reference.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: RequestRecord) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))?;
        guard.insert(record.reference.clone(), record);
        Ok(())
    }

    fn fetch(&self, reference: &RequestReference) -> Result<Option<RequestRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))?;
        Ok(guard.get(reference).cloned())
    }

    fn history(&self, employee: &EmployeeId) -> Result<Vec<RequestRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))?;
        let mut records: Vec<RequestRecord> = guard
            .values()
            .filter(|record| record.employee == *employee)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.start_date.cmp(&b.start_date));
        Ok(records)
    }
}
