//! Workday arithmetic and annual balance aggregation.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use super::repository::RequestRecord;

/// Count Monday–Friday days in the inclusive range `[start, end]`.
///
/// Returns 0 when `start > end`. Public holidays are out of scope; this is a
/// plain calendar scan.
pub fn workdays(start: NaiveDate, end: NaiveDate) -> u32 {
    if start > end {
        return 0;
    }

    let mut count = 0;
    let mut current = start;
    while current <= end {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            count += 1;
        }
        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    count
}

/// Sum the stored workday counts of prior approved/completed requests whose
/// start date falls in `year`.
///
/// A request spanning a year boundary counts entirely toward its start year.
pub fn annual_days_used(year: i32, prior_requests: &[RequestRecord]) -> u32 {
    prior_requests
        .iter()
        .filter(|request| request.status.counts_toward_allowance())
        .filter(|request| request.start_date.year() == year)
        .map(|request| request.duration_days)
        .sum()
}

/// Derived view of an employee's annual allowance consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnnualBalance {
    pub days_allowed: u32,
    pub days_used: u32,
    pub days_remaining: u32,
}

impl AnnualBalance {
    pub fn derive(days_allowed: u32, days_used: u32) -> Self {
        Self {
            days_allowed,
            days_used,
            days_remaining: days_allowed.saturating_sub(days_used),
        }
    }
}
