//! Cumulative progress series for one bucket of households.
//!
//! The range is cut into hourly buckets when it spans at most
//! [`HOURLY_MAX_SPAN_HOURS`], daily buckets otherwise. Ranges too wide for
//! [`MAX_GRAPH_POINTS`] daily points are cut into buckets of several days.
//! Every point reports how many households had been visited, and how many
//! marked done, by the end of its bucket.

use std::collections::BTreeSet;

use canvass_map_canvass_models::Household;
use canvass_map_graph_models::AreaGraphPoint;
use chrono::{DateTime, TimeDelta, Utc};

/// Longest range, in hours, that is still graphed hour by hour.
pub const HOURLY_MAX_SPAN_HOURS: i64 = 48;

/// Upper bound on the number of points in one series.
pub const MAX_GRAPH_POINTS: i64 = 1000;

/// Width of one graph bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// One point per hour.
    Hourly,
    /// One point per UTC day.
    Daily,
    /// One point per run of this many days, aligned to the Unix epoch.
    Days(i64),
}

impl Granularity {
    /// Picks the granularity for a range.
    #[must_use]
    pub fn for_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let span = end - start;
        if span <= TimeDelta::hours(HOURLY_MAX_SPAN_HOURS) {
            return Self::Hourly;
        }

        // A span of `days` whole days touches at most `days + 2` buckets.
        let days = span.num_days();
        if days + 2 <= MAX_GRAPH_POINTS {
            Self::Daily
        } else {
            Self::Days(days / (MAX_GRAPH_POINTS - 2) + 1)
        }
    }

    /// Width of one bucket.
    #[must_use]
    pub fn step(self) -> TimeDelta {
        match self {
            Self::Hourly => TimeDelta::hours(1),
            Self::Daily => TimeDelta::days(1),
            Self::Days(days) => TimeDelta::days(days),
        }
    }

    /// Start of the bucket containing `instant`.
    #[must_use]
    pub fn floor(self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let step = self.step().num_seconds();
        let secs = instant.timestamp();
        DateTime::<Utc>::from_timestamp(secs - secs.rem_euclid(step), 0).unwrap_or(instant)
    }
}

/// Per-household milestones derived from its visits.
struct Milestones {
    first_visit: Option<DateTime<Utc>>,
    done: Option<DateTime<Utc>>,
}

fn milestones(household: &Household, done_metric_id: Option<&str>) -> Milestones {
    let first_visit = household.visits.iter().map(|v| v.timestamp).min();
    let done = done_metric_id.and_then(|metric_id| {
        household
            .visits
            .iter()
            .filter(|v| v.marks_done(metric_id))
            .map(|v| v.timestamp)
            .min()
    });

    Milestones { first_visit, done }
}

fn count_before(instants: &[DateTime<Utc>], bound: DateTime<Utc>) -> u32 {
    let count = instants.partition_point(|&t| t < bound);
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Computes the progress series for `households` over
/// `[range_start, range_end]`.
///
/// `households` must already be trimmed to the visits of the assignment
/// being graphed. Households listed more than once are counted once.
/// Without a done-defining metric no household counts as done.
#[must_use]
pub fn compute_area_stats(
    range_end: DateTime<Utc>,
    households: &[Household],
    range_start: DateTime<Utc>,
    done_metric_id: Option<&str>,
) -> Vec<AreaGraphPoint> {
    let range_end = range_end.max(range_start);

    let mut seen = BTreeSet::new();
    let mut visited = Vec::new();
    let mut done = Vec::new();

    for household in households {
        if !seen.insert(household.id.as_str()) {
            continue;
        }
        let milestones = milestones(household, done_metric_id);
        visited.extend(milestones.first_visit);
        done.extend(milestones.done);
    }

    visited.sort_unstable();
    done.sort_unstable();

    let granularity = Granularity::for_range(range_start, range_end);
    let step = granularity.step();
    let last = granularity.floor(range_end);

    let mut points = Vec::new();
    let mut bucket = granularity.floor(range_start);

    while bucket <= last {
        let bucket_end = bucket + step;
        points.push(AreaGraphPoint {
            date: bucket,
            households_visited: count_before(&visited, bucket_end),
            successful_visits: count_before(&done, bucket_end),
        });
        bucket = bucket_end;
    }

    points
}
