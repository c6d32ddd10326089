use super::common::*;
use crate::workflows::sirw::domain::RequestStatus;
use crate::workflows::sirw::overlap::find_nearby;

#[test]
fn prior_request_within_buffer_is_detected() {
    let prior = vec![prior_record(
        "SIRW-2024-0001",
        date(2024, 3, 1),
        date(2024, 3, 10),
        7,
        RequestStatus::Approved,
    )];
    // Candidate 2024-03-12..14 is Tue-Thu, three workdays, two days after the
    // prior request ends.
    let report = find_nearby(date(2024, 3, 12), date(2024, 3, 14), 7, &prior);
    assert!(report.has_overlap);
    assert_eq!(report.nearby.len(), 1);
    assert_eq!(report.combined_workdays, 10);
    assert_eq!(report.warning(14), None);
}

#[test]
fn combined_total_over_limit_produces_warning() {
    let prior = vec![prior_record(
        "SIRW-2024-0001",
        date(2024, 3, 1),
        date(2024, 3, 10),
        12,
        RequestStatus::Approved,
    )];
    let report = find_nearby(date(2024, 3, 12), date(2024, 3, 14), 7, &prior);
    assert_eq!(report.combined_workdays, 15);
    let warning = report.warning(14).expect("warning expected");
    assert!(warning.contains("15 workdays"));
    assert!(warning.contains("14-day consecutive limit"));
}

#[test]
fn cancelled_requests_are_ignored() {
    let prior = vec![prior_record(
        "SIRW-2024-0001",
        date(2024, 3, 1),
        date(2024, 3, 10),
        7,
        RequestStatus::Cancelled,
    )];
    let report = find_nearby(date(2024, 3, 12), date(2024, 3, 14), 7, &prior);
    assert!(!report.has_overlap);
    assert!(report.nearby.is_empty());
    assert_eq!(report.combined_workdays, 0);
    assert_eq!(report.warning(14), None);
}

#[test]
fn requests_outside_the_buffer_are_ignored() {
    let prior = vec![prior_record(
        "SIRW-2024-0001",
        date(2024, 1, 8),
        date(2024, 1, 12),
        5,
        RequestStatus::Approved,
    )];
    let report = find_nearby(date(2024, 3, 12), date(2024, 3, 14), 7, &prior);
    assert!(!report.has_overlap);
    assert_eq!(report.combined_workdays, 0);
}

#[test]
fn window_boundary_touch_counts_as_nearby() {
    // Prior ends exactly buffer_days before the candidate starts.
    let prior = vec![prior_record(
        "SIRW-2024-0001",
        date(2024, 3, 1),
        date(2024, 3, 5),
        3,
        RequestStatus::Approved,
    )];
    let report = find_nearby(date(2024, 3, 12), date(2024, 3, 14), 7, &prior);
    assert!(report.has_overlap);

    // One day further back falls outside the window.
    let prior = vec![prior_record(
        "SIRW-2024-0001",
        date(2024, 3, 1),
        date(2024, 3, 4),
        2,
        RequestStatus::Approved,
    )];
    let report = find_nearby(date(2024, 3, 12), date(2024, 3, 14), 7, &prior);
    assert!(!report.has_overlap);
}

#[test]
fn multiple_nearby_requests_sum_their_workdays() {
    let prior = vec![
        prior_record(
            "SIRW-2024-0001",
            date(2024, 3, 4),
            date(2024, 3, 8),
            5,
            RequestStatus::Approved,
        ),
        prior_record(
            "SIRW-2024-0002",
            date(2024, 3, 18),
            date(2024, 3, 22),
            5,
            RequestStatus::Escalated,
        ),
    ];
    let report = find_nearby(date(2024, 3, 12), date(2024, 3, 14), 7, &prior);
    assert_eq!(report.nearby.len(), 2);
    assert_eq!(report.combined_workdays, 13);
}
