//! Short-term international remote work (SIRW) compliance workflow.
//!
//! The decision core is deterministic, synchronous computation: the
//! blocked-country table ([`countries`]), the ordered rule engine
//! ([`evaluation`]), and the calendar/overlap calculators ([`calendar`],
//! [`overlap`]). [`service`] is the host composition around that core
//! (intake validation, history lookup, annual-limit escalation, persistence)
//! and [`router`] is the HTTP edge over the service.

pub mod calendar;
pub mod countries;
pub mod domain;
pub mod evaluation;
pub mod intake;
pub mod overlap;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use calendar::{annual_days_used, workdays, AnnualBalance};
pub use countries::{classify, BlockReason, BlockedCountry, CountryClassification, Region};
pub use domain::{
    ContextError, EmployeeId, EvaluationContext, RequestReference, RequestStatus, RoleCategory,
    SirwSubmission,
};
pub use evaluation::{
    AssessmentFlag, AssessmentOutcome, AssessmentResult, ComplianceEngine, ComplianceRule,
    PolicyConfig, RuleError, RuleSummary, RuleVerdict, Severity, REGISTERED_RULES,
};
pub use intake::{SubmissionGuard, SubmissionViolation};
pub use overlap::{find_nearby, OverlapReport};
pub use repository::{
    InMemoryRequestRepository, RepositoryError, RequestRecord, RequestRepository,
    RequestStatusView,
};
pub use router::sirw_router;
pub use service::{OverlapCheck, ServiceError, SirwRequestService, SubmissionDecision};
