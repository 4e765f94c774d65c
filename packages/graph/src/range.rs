//! Time span covered by an assignment's visits.

use canvass_map_canvass_models::Location;
use chrono::{DateTime, Utc};

/// Inclusive time span `[start, end]` of the visits being graphed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitRange {
    /// Earliest visit timestamp.
    pub start: DateTime<Utc>,
    /// Latest visit timestamp.
    pub end: DateTime<Utc>,
}

impl VisitRange {
    /// A zero-width range at `instant`.
    #[must_use]
    pub const fn instant(instant: DateTime<Utc>) -> Self {
        Self {
            start: instant,
            end: instant,
        }
    }

    /// Whether the range covers a single instant.
    #[must_use]
    pub fn is_zero_width(&self) -> bool {
        self.start == self.end
    }
}

/// Computes the range of visits made for `assignment_id` across every
/// household of `locations`.
///
/// Without any matching visit the range collapses to `now` on both ends.
#[must_use]
pub fn visit_range(locations: &[Location], assignment_id: &str, now: DateTime<Utc>) -> VisitRange {
    let mut timestamps: Vec<DateTime<Utc>> = locations
        .iter()
        .flat_map(|location| &location.households)
        .flat_map(|household| household.visits_for(assignment_id))
        .map(|visit| visit.timestamp)
        .collect();

    timestamps.sort_unstable();

    match (timestamps.first(), timestamps.last()) {
        (Some(&start), Some(&end)) => VisitRange { start, end },
        _ => VisitRange::instant(now),
    }
}
