use serde::{Deserialize, Serialize};

/// Policy dials backing the compliance rule set.
///
/// Defaults follow SIRW Policy V3: a 20-workday annual allowance that also
/// caps any single trip, a stricter 14-workday consecutive cap, and a 7-day
/// adjacency buffer for overlap detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub max_single_trip_days: u32,
    pub max_consecutive_workdays: u32,
    pub annual_days_allowed: u32,
    pub overlap_buffer_days: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_single_trip_days: 20,
            max_consecutive_workdays: 14,
            annual_days_allowed: 20,
            overlap_buffer_days: 7,
        }
    }
}
