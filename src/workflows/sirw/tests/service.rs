use std::sync::Arc;

use super::common::*;
use crate::workflows::sirw::domain::{RequestReference, RequestStatus};
use crate::workflows::sirw::evaluation::{AssessmentFlag, AssessmentOutcome};
use crate::workflows::sirw::intake::SubmissionViolation;
use crate::workflows::sirw::repository::{RepositoryError, RequestRepository};
use crate::workflows::sirw::service::{ServiceError, SirwRequestService};

#[test]
fn clean_submission_is_approved_and_persisted() {
    let (service, repository) = build_service();
    let decision = service.submit(submission(), today()).expect("submit succeeds");

    assert_eq!(decision.outcome, AssessmentOutcome::Approved);
    assert_eq!(decision.status, "approved");
    assert!(decision.reference.0.starts_with("SIRW-2025-"));
    assert_eq!(decision.days_used_this_year, 0);
    assert_eq!(decision.days_remaining, 10);
    assert_eq!(
        decision.message,
        "Your SIRW request to France for 10 workdays has been approved."
    );

    let stored = repository
        .fetch(&decision.reference)
        .expect("fetch succeeds")
        .expect("record stored");
    assert_eq!(stored.status, RequestStatus::Approved);
    assert_eq!(stored.duration_days, 10);
    assert!(stored.flags.is_empty());
    assert!(stored.assessment.is_some());
}

#[test]
fn blocked_destination_is_rejected_with_flag() {
    let (service, repository) = build_service();
    let mut submission = submission();
    submission.destination_country = "Russia".to_string();

    let decision = service.submit(submission, today()).expect("submit succeeds");
    assert_eq!(decision.outcome, AssessmentOutcome::Rejected);
    assert_eq!(decision.status, "rejected");
    // Rejections surface the rule reason directly.
    assert!(decision.message.contains("Russia"));
    assert!(decision.message.contains("(Policy Appendix A)."));
    assert_eq!(decision.days_remaining, 20, "rejected requests consume nothing");

    let stored = repository
        .fetch(&decision.reference)
        .expect("fetch succeeds")
        .expect("record stored");
    assert_eq!(stored.status, RequestStatus::Rejected);
    assert!(stored.flags.contains(&AssessmentFlag::SanctionedCountry));
}

#[test]
fn exceeding_annual_allowance_escalates() {
    let (service, repository) = build_service();
    repository
        .insert(prior_record(
            "SIRW-2025-9001",
            date(2025, 2, 3),
            date(2025, 2, 18),
            12,
            RequestStatus::Approved,
        ))
        .expect("seed prior request");

    let decision = service.submit(submission(), today()).expect("submit succeeds");

    assert_eq!(decision.outcome, AssessmentOutcome::Escalated);
    assert_eq!(decision.status, "escalated");
    assert_eq!(decision.days_used_this_year, 12);
    assert_eq!(decision.days_remaining, 8);
    assert_eq!(
        decision.message,
        "Your request has been submitted for review by Global Mobility."
    );

    let stored = repository
        .fetch(&decision.reference)
        .expect("fetch succeeds")
        .expect("record stored");
    assert_eq!(stored.status, RequestStatus::Escalated);
    assert!(stored.flags.contains(&AssessmentFlag::ExceedsAnnualLimit));
    assert!(stored
        .decision_reason
        .contains("would exceed annual limit (12 + 10 = 22 days)"));
    assert!(stored.decision_reason.contains("(Policy Sections 4.1.2, 5)."));
    assert!(stored.escalation_note.contains("Days used this year: 12."));
    assert!(stored.escalation_note.contains("Request duration: 10 days."));
    assert!(stored
        .escalation_note
        .contains("Manager: Anna Larsen (anna.larsen@example.com)"));
}

#[test]
fn exception_request_escalates_even_when_rules_pass() {
    let (service, _repository) = build_service();
    let mut submission = submission();
    submission.is_exception_request = true;
    submission.exception_reason = Some("Family relocation support".to_string());

    let decision = service.submit(submission, today()).expect("submit succeeds");
    assert_eq!(decision.outcome, AssessmentOutcome::Escalated);
    assert!(decision.record.flags.contains(&AssessmentFlag::ExceptionRequested));
    assert!(decision
        .record
        .decision_reason
        .contains("exception requested"));
}

#[test]
fn rejection_keeps_annual_flag_but_not_escalation() {
    let (service, repository) = build_service();
    repository
        .insert(prior_record(
            "SIRW-2025-9002",
            date(2025, 2, 3),
            date(2025, 2, 7),
            5,
            RequestStatus::Approved,
        ))
        .expect("seed prior request");

    // 2025-07-01 (Tue) through 2025-07-24 (Thu): 18 workdays, over the
    // consecutive cap, and 5 + 18 also breaches the annual allowance.
    let mut submission = submission();
    submission.start_date = date(2025, 7, 1);
    submission.end_date = date(2025, 7, 24);

    let decision = service.submit(submission, today()).expect("submit succeeds");
    assert_eq!(decision.outcome, AssessmentOutcome::Rejected);
    assert!(decision
        .record
        .flags
        .contains(&AssessmentFlag::ExceedsConsecutiveLimit));
    assert!(decision
        .record
        .flags
        .contains(&AssessmentFlag::ExceedsAnnualLimit));
    assert!(decision.record.escalation_note.is_empty());
}

#[test]
fn intake_violations_stop_the_submission() {
    let (service, repository) = build_service();

    let mut missing_destination = submission();
    missing_destination.destination_country = "  ".to_string();
    let err = service
        .submit(missing_destination, today())
        .expect_err("must fail");
    assert!(matches!(
        err,
        ServiceError::Submission(SubmissionViolation::MissingDestinationCountry)
    ));

    let mut inverted = submission();
    inverted.start_date = date(2025, 6, 13);
    inverted.end_date = date(2025, 6, 2);
    let err = service.submit(inverted, today()).expect_err("must fail");
    assert!(matches!(
        err,
        ServiceError::Submission(SubmissionViolation::InvertedDateRange { .. })
    ));

    let mut no_manager = submission();
    no_manager.manager_email = String::new();
    let err = service.submit(no_manager, today()).expect_err("must fail");
    assert!(matches!(
        err,
        ServiceError::Submission(SubmissionViolation::MissingManagerApproval)
    ));

    let mut bare_exception = submission();
    bare_exception.is_exception_request = true;
    let err = service
        .submit(bare_exception, today())
        .expect_err("must fail");
    assert!(matches!(
        err,
        ServiceError::Submission(SubmissionViolation::MissingExceptionReason)
    ));

    let history = repository.history(&employee()).expect("history readable");
    assert!(history.is_empty(), "no record persisted for failed intake");
}

#[test]
fn repository_outage_propagates() {
    let service = SirwRequestService::new(Arc::new(UnavailableRepository), policy());
    let err = service.submit(submission(), today()).expect_err("must fail");
    assert!(matches!(
        err,
        ServiceError::Repository(RepositoryError::Unavailable(_))
    ));
}

#[test]
fn cancelling_a_request_releases_its_allowance() {
    let (service, repository) = build_service();
    let decision = service.submit(submission(), today()).expect("submit succeeds");
    assert_eq!(
        service.balance(&employee(), 2025).expect("balance computed").days_used,
        10
    );

    let cancelled = service.cancel(&decision.reference).expect("cancel succeeds");
    assert_eq!(cancelled.status, RequestStatus::Cancelled);

    let stored = repository
        .fetch(&decision.reference)
        .expect("fetch succeeds")
        .expect("record kept for audit");
    assert_eq!(stored.status, RequestStatus::Cancelled);

    let balance = service.balance(&employee(), 2025).expect("balance computed");
    assert_eq!(balance.days_used, 0);

    // The cancelled trip no longer trips the adjacency detector either.
    let check = service
        .overlap_check(&employee(), date(2025, 6, 16), date(2025, 6, 27))
        .expect("overlap check runs");
    assert!(!check.has_overlap);

    let again = service.cancel(&decision.reference).expect("cancel is idempotent");
    assert_eq!(again.status, RequestStatus::Cancelled);
}

#[test]
fn cancelling_an_unknown_reference_fails() {
    let (service, _repository) = build_service();
    let err = service
        .cancel(&RequestReference("SIRW-2099-0001".to_string()))
        .expect_err("must fail");
    assert!(matches!(
        err,
        ServiceError::Repository(RepositoryError::NotFound)
    ));
}

#[test]
fn balance_reports_per_year_usage() {
    let (service, repository) = build_service();
    repository
        .insert(prior_record(
            "SIRW-2024-9003",
            date(2024, 11, 4),
            date(2024, 11, 8),
            5,
            RequestStatus::Completed,
        ))
        .expect("seed 2024 request");
    repository
        .insert(prior_record(
            "SIRW-2025-9004",
            date(2025, 3, 3),
            date(2025, 3, 7),
            5,
            RequestStatus::Approved,
        ))
        .expect("seed 2025 request");

    let balance = service.balance(&employee(), 2025).expect("balance computed");
    assert_eq!(balance.days_used, 5);
    assert_eq!(balance.days_remaining, 15);

    let balance = service.balance(&employee(), 2024).expect("balance computed");
    assert_eq!(balance.days_used, 5);
}

#[test]
fn overlap_check_attaches_circumvention_warning() {
    let (service, repository) = build_service();
    repository
        .insert(prior_record(
            "SIRW-2025-9005",
            date(2025, 6, 16),
            date(2025, 6, 27),
            12,
            RequestStatus::Approved,
        ))
        .expect("seed prior request");

    let check = service
        .overlap_check(&employee(), date(2025, 6, 2), date(2025, 6, 13))
        .expect("overlap check runs");
    assert!(check.has_overlap);
    assert_eq!(check.combined_workdays, 22);
    let warning = check.warning.expect("warning expected");
    assert!(warning.contains("22 workdays"));

    let clear = service
        .overlap_check(&employee(), date(2025, 9, 1), date(2025, 9, 5))
        .expect("overlap check runs");
    assert!(!clear.has_overlap);
    assert_eq!(clear.warning, None);
}
