//! Intake validation: turn a raw wizard submission into a normalized
//! evaluation context, failing fast on malformed input before any rule runs.

use chrono::NaiveDate;

use super::calendar;
use super::domain::{EvaluationContext, SirwSubmission};

/// Validation errors raised by the intake guard. These surface to the caller
/// as hard failures; the assessment never starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionViolation {
    #[error("home country must not be empty")]
    MissingHomeCountry,
    #[error("destination country must not be empty")]
    MissingDestinationCountry,
    #[error("end date {end} precedes start date {start}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },
    #[error("manager approval details are incomplete")]
    MissingManagerApproval,
    #[error("exception requests must include a reason")]
    MissingExceptionReason,
}

/// Guard producing [`EvaluationContext`] values from inbound submissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmissionGuard;

impl SubmissionGuard {
    /// Validate a submission and build the rule-engine context.
    ///
    /// Country strings are trimmed here so every downstream consumer sees the
    /// normalized form; `duration_days` is the workday count of the inclusive
    /// date range.
    pub fn context_from_submission(
        &self,
        submission: &SirwSubmission,
    ) -> Result<EvaluationContext, SubmissionViolation> {
        let home_country = submission.home_country.trim();
        if home_country.is_empty() {
            return Err(SubmissionViolation::MissingHomeCountry);
        }

        let destination_country = submission.destination_country.trim();
        if destination_country.is_empty() {
            return Err(SubmissionViolation::MissingDestinationCountry);
        }

        if submission.end_date < submission.start_date {
            return Err(SubmissionViolation::InvertedDateRange {
                start: submission.start_date,
                end: submission.end_date,
            });
        }

        if submission.manager_name.trim().is_empty() || submission.manager_email.trim().is_empty()
        {
            return Err(SubmissionViolation::MissingManagerApproval);
        }

        if submission.is_exception_request
            && submission
                .exception_reason
                .as_deref()
                .map(str::trim)
                .unwrap_or("")
                .is_empty()
        {
            return Err(SubmissionViolation::MissingExceptionReason);
        }

        Ok(EvaluationContext {
            has_right_to_work: submission.has_right_to_work,
            is_sales_role: submission.is_sales_role,
            ineligible_role_categories: submission.ineligible_role_categories.clone(),
            duration_days: calendar::workdays(submission.start_date, submission.end_date),
            home_country: home_country.to_string(),
            destination_country: destination_country.to_string(),
        })
    }
}
