//! Detection of prior requests adjacent to a candidate date range.
//!
//! Splitting one long stay into several short requests can sidestep the
//! consecutive-workday cap. The detector never blocks anything; it surfaces
//! the pattern for human reviewers.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::calendar;
use super::domain::RequestStatus;
use super::repository::RequestRecord;

/// Nearby-request findings for a candidate date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapReport {
    pub has_overlap: bool,
    pub nearby: Vec<RequestRecord>,
    pub combined_workdays: u32,
}

impl OverlapReport {
    /// Advisory text, present only when nearby requests exist and the
    /// combined workday total exceeds the consecutive limit.
    pub fn warning(&self, consecutive_limit: u32) -> Option<String> {
        if self.has_overlap && self.combined_workdays > consecutive_limit {
            Some(format!(
                "Combined with nearby requests, this would total {} workdays. Consider \
                 whether this effectively circumvents the {}-day consecutive limit.",
                self.combined_workdays, consecutive_limit
            ))
        } else {
            None
        }
    }
}

/// Find non-cancelled prior requests whose date range intersects the
/// candidate range widened by `buffer_days` on each side.
///
/// `combined_workdays` adds each nearby request's stored workday count to the
/// candidate's own, and is 0 when nothing is nearby.
pub fn find_nearby(
    candidate_start: NaiveDate,
    candidate_end: NaiveDate,
    buffer_days: i64,
    prior_requests: &[RequestRecord],
) -> OverlapReport {
    let window_start = candidate_start - Duration::days(buffer_days);
    let window_end = candidate_end + Duration::days(buffer_days);

    let nearby: Vec<RequestRecord> = prior_requests
        .iter()
        .filter(|request| request.status != RequestStatus::Cancelled)
        .filter(|request| request.start_date <= window_end && request.end_date >= window_start)
        .cloned()
        .collect();

    let has_overlap = !nearby.is_empty();
    let combined_workdays = if has_overlap {
        nearby.iter().map(|request| request.duration_days).sum::<u32>()
            + calendar::workdays(candidate_start, candidate_end)
    } else {
        0
    };

    OverlapReport {
        has_overlap,
        nearby,
        combined_workdays,
    }
}
