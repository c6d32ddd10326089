use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::info;

use super::calendar::{self, AnnualBalance};
use super::domain::{ContextError, EmployeeId, RequestReference, RequestStatus, SirwSubmission};
use super::evaluation::{
    AssessmentFlag, AssessmentOutcome, ComplianceEngine, PolicyConfig, RuleSummary,
};
use super::intake::{SubmissionGuard, SubmissionViolation};
use super::overlap::{self, OverlapReport};
use super::repository::{RepositoryError, RequestRecord, RequestRepository};

/// Host workflow composing the intake guard, balance calculator, overlap
/// detector, rule engine, and repository. The decision core stays pure; this
/// layer owns history fetching, persistence, and the annual-limit escalation
/// the six rules do not cover.
pub struct SirwRequestService<R> {
    guard: SubmissionGuard,
    repository: Arc<R>,
    engine: ComplianceEngine,
}

static REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_reference(year: i32) -> RequestReference {
    let sequence = REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RequestReference(format!("SIRW-{year}-{sequence:04}"))
}

/// Response view returned to the submitting employee.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionDecision {
    pub reference: RequestReference,
    pub status: &'static str,
    pub outcome: AssessmentOutcome,
    pub message: String,
    pub days_used_this_year: u32,
    pub days_remaining: u32,
    pub record: RequestRecord,
}

/// Overlap findings plus the advisory warning, shaped for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct OverlapCheck {
    pub has_overlap: bool,
    pub nearby_requests: Vec<RequestRecord>,
    pub combined_workdays: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Error raised by the request service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Submission(#[from] SubmissionViolation),
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl<R> SirwRequestService<R>
where
    R: RequestRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: PolicyConfig) -> Self {
        Self {
            guard: SubmissionGuard,
            repository,
            engine: ComplianceEngine::new(policy),
        }
    }

    pub fn policy(&self) -> &PolicyConfig {
        self.engine.policy()
    }

    pub fn rules(&self) -> Vec<RuleSummary> {
        self.engine.rules_summary()
    }

    pub fn engine(&self) -> &ComplianceEngine {
        &self.engine
    }

    /// Submit a request: validate, assess, layer the annual-limit and
    /// exception checks on top of the rule outcome, and persist the decision.
    ///
    /// `today` anchors the balance year and the generated reference; callers
    /// pass the current date so the service itself stays deterministic.
    pub fn submit(
        &self,
        submission: SirwSubmission,
        today: NaiveDate,
    ) -> Result<SubmissionDecision, ServiceError> {
        let context = self.guard.context_from_submission(&submission)?;

        let history = self.repository.history(&submission.employee)?;
        let year = today.year();
        let days_used = calendar::annual_days_used(year, &history);
        let request_days = context.duration_days;

        let policy = self.engine.policy();
        let annual_allowed = policy.annual_days_allowed;
        let would_exceed_annual = days_used + request_days > annual_allowed;

        let mut assessment = self.engine.assess(&context)?;

        // The annual balance depends on history the rule set never sees. The
        // flags are recorded unconditionally; the escalation itself yields to
        // a rejection already produced by the rules.
        if would_exceed_annual {
            assessment.flags.push(AssessmentFlag::ExceedsAnnualLimit);
        }
        if submission.is_exception_request {
            assessment.flags.push(AssessmentFlag::ExceptionRequested);
        }

        if assessment.outcome != AssessmentOutcome::Rejected
            && (would_exceed_annual || submission.is_exception_request)
        {
            let mut reasons = Vec::new();
            if would_exceed_annual {
                reasons.push(format!(
                    "would exceed annual limit ({days_used} + {request_days} = {} days)",
                    days_used + request_days
                ));
            }
            if submission.is_exception_request {
                reasons.push("exception requested".to_string());
            }

            assessment.outcome = AssessmentOutcome::Escalated;
            assessment.reason = format!(
                "Request requires Global Mobility review: {} (Policy Sections 4.1.2, 5).",
                reasons.join(", ")
            );
            assessment.escalation_note = format!(
                "Days used this year: {days_used}. Request duration: {request_days} days. \
                 Manager: {} ({})",
                submission.manager_name.trim(),
                submission.manager_email.trim()
            );
        }

        let status = match assessment.outcome {
            AssessmentOutcome::Approved => RequestStatus::Approved,
            AssessmentOutcome::Rejected => RequestStatus::Rejected,
            AssessmentOutcome::Escalated => RequestStatus::Escalated,
        };

        let message = match assessment.outcome {
            AssessmentOutcome::Approved => format!(
                "Your SIRW request to {} for {request_days} workdays has been approved.",
                context.destination_country
            ),
            AssessmentOutcome::Escalated => {
                "Your request has been submitted for review by Global Mobility.".to_string()
            }
            AssessmentOutcome::Rejected => assessment.reason.clone(),
        };

        let balance_after = if assessment.outcome == AssessmentOutcome::Approved {
            AnnualBalance::derive(annual_allowed, days_used + request_days)
        } else {
            AnnualBalance::derive(annual_allowed, days_used)
        };

        let record = RequestRecord {
            reference: next_reference(year),
            employee: submission.employee.clone(),
            home_country: context.home_country.clone(),
            destination_country: context.destination_country.clone(),
            start_date: submission.start_date,
            end_date: submission.end_date,
            duration_days: request_days,
            status,
            decision_reason: assessment.reason.clone(),
            escalation_note: assessment.escalation_note.clone(),
            flags: assessment.flags.clone(),
            assessment: Some(assessment.clone()),
        };

        let stored = self.repository.insert(record)?;

        info!(
            reference = %stored.reference.0,
            status = stored.status.label(),
            days = request_days,
            "SIRW request recorded"
        );

        Ok(SubmissionDecision {
            reference: stored.reference.clone(),
            status: stored.status.label(),
            outcome: assessment.outcome,
            message,
            days_used_this_year: days_used,
            days_remaining: balance_after.days_remaining,
            record: stored,
        })
    }

    /// Cancel a stored request (soft delete). Cancelled requests stop
    /// counting toward the annual allowance and drop out of overlap
    /// detection; the record itself is kept for audit.
    ///
    /// Cancelling an already-cancelled request is a no-op.
    pub fn cancel(&self, reference: &RequestReference) -> Result<RequestRecord, ServiceError> {
        let mut record = self
            .repository
            .fetch(reference)?
            .ok_or(RepositoryError::NotFound)?;

        if record.status != RequestStatus::Cancelled {
            record.status = RequestStatus::Cancelled;
            self.repository.update(record.clone())?;
            info!(reference = %record.reference.0, "SIRW request cancelled");
        }

        Ok(record)
    }

    /// Fetch a stored request for API responses.
    pub fn get(&self, reference: &RequestReference) -> Result<RequestRecord, ServiceError> {
        let record = self
            .repository
            .fetch(reference)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Annual allowance consumption for one employee and calendar year.
    pub fn balance(&self, employee: &EmployeeId, year: i32) -> Result<AnnualBalance, ServiceError> {
        let history = self.repository.history(employee)?;
        let days_used = calendar::annual_days_used(year, &history);
        Ok(AnnualBalance::derive(
            self.engine.policy().annual_days_allowed,
            days_used,
        ))
    }

    /// Nearby-request detection for proposed dates, with the advisory
    /// circumvention warning attached when the combined total crosses the
    /// consecutive cap.
    pub fn overlap_check(
        &self,
        employee: &EmployeeId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<OverlapCheck, ServiceError> {
        let history = self.repository.history(employee)?;
        let policy = self.engine.policy();
        let report: OverlapReport =
            overlap::find_nearby(
                start_date,
                end_date,
                i64::from(policy.overlap_buffer_days),
                &history,
            );
        let warning = report.warning(policy.max_consecutive_workdays);

        Ok(OverlapCheck {
            has_overlap: report.has_overlap,
            nearby_requests: report.nearby,
            combined_workdays: report.combined_workdays,
            warning,
        })
    }
}
