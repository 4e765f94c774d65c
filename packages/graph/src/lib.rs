#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Area visit aggregation for canvassing assignments.
//!
//! Given an assignment, the areas its sessions reference and every location
//! of the organization, [`AreaVisitAggregator::aggregate`] works out which
//! locations lie in which area, the time span of the assignment's visits,
//! and a cumulative progress series per area. Visits at locations outside
//! every area are collected in a trailing "no area" bucket.
//!
//! Everything is recomputed from the inputs on each call; nothing is
//! cached between calls.

pub mod buckets;
pub mod range;
pub mod stats;

use canvass_map_canvass_models::{Area, Assignment, Household, Location};
use canvass_map_graph_models::{AreaCard, AreaGraphPoint, CardArea, OverlapPolicy};
use canvass_map_spatial::AreaPolygon;
use chrono::{DateTime, Utc};

pub use range::{VisitRange, visit_range};
pub use stats::compute_area_stats;

/// One aggregated bucket: an assigned area or the "no area" bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaBucket {
    /// Identity of the bucket.
    pub area: CardArea,
    /// Locations in the bucket with at least one visit for the assignment.
    pub location_ids: Vec<String>,
    /// Households with at least one visit for the assignment, trimmed to
    /// those visits.
    pub households: Vec<Household>,
    /// Progress series over the visit range.
    pub data: Vec<AreaGraphPoint>,
}

impl From<AreaBucket> for AreaCard {
    fn from(bucket: AreaBucket) -> Self {
        Self {
            area: bucket.area,
            data: bucket.data,
        }
    }
}

/// Result of one aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct AreasGraph {
    /// Span of the assignment's visits.
    pub range: VisitRange,
    /// Area buckets in first-encounter order, "no area" last when present.
    pub buckets: Vec<AreaBucket>,
}

impl AreasGraph {
    /// Converts the buckets into response cards.
    #[must_use]
    pub fn into_cards(self) -> Vec<AreaCard> {
        self.buckets.into_iter().map(AreaCard::from).collect()
    }
}

/// Computes per-area visit progress for an assignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct AreaVisitAggregator {
    policy: OverlapPolicy,
}

impl AreaVisitAggregator {
    /// Creates an aggregator with the given overlap policy.
    #[must_use]
    pub const fn new(policy: OverlapPolicy) -> Self {
        Self { policy }
    }

    /// The overlap policy in use.
    #[must_use]
    pub const fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// Aggregates the visits of `assignment` over `areas` and `locations`.
    ///
    /// `areas` may repeat (one entry per session); repeats are collapsed by
    /// ID keeping the first position. `now` anchors the visit range when the
    /// assignment has no visits yet.
    #[must_use]
    pub fn aggregate(
        &self,
        assignment: &Assignment,
        areas: &[Area],
        locations: &[Location],
        now: DateTime<Utc>,
    ) -> AreasGraph {
        let assignment_id = assignment.id.as_str();
        let done_metric_id = assignment.done_metric_id();

        let areas = buckets::dedup_areas(areas);
        let polygons: Vec<AreaPolygon> = areas.iter().map(|a| AreaPolygon::from_area(a)).collect();
        let grouping = buckets::group_locations(&polygons, locations, self.policy);
        let range = visit_range(locations, assignment_id, now);

        let collector = BucketCollector {
            assignment_id,
            done_metric_id,
            locations,
            range,
        };

        // Areas without qualifying locations still get a (zero) card.
        let mut result: Vec<AreaBucket> = areas
            .iter()
            .zip(&grouping.per_area)
            .map(|(area, members)| {
                let identity = CardArea {
                    id: area.id.clone(),
                    title: area.title.clone(),
                };
                collector.collect(identity, members)
            })
            .collect();

        let outside = collector.collect(CardArea::no_area(), &grouping.outside);
        if !outside.households.is_empty() {
            result.push(outside);
        }

        log::debug!(
            "Aggregated assignment {assignment_id}: {} area(s), {} location(s), {} bucket(s), range {} - {}",
            areas.len(),
            locations.len(),
            result.len(),
            range.start,
            range.end,
        );

        AreasGraph {
            range,
            buckets: result,
        }
    }
}

struct BucketCollector<'a> {
    assignment_id: &'a str,
    done_metric_id: Option<&'a str>,
    locations: &'a [Location],
    range: VisitRange,
}

impl BucketCollector<'_> {
    fn collect(&self, area: CardArea, members: &[usize]) -> AreaBucket {
        let mut location_ids = Vec::new();
        let mut households = Vec::new();

        for location in members.iter().filter_map(|&idx| self.locations.get(idx)) {
            let before = households.len();

            for household in &location.households {
                let visits: Vec<_> = household
                    .visits_for(self.assignment_id)
                    .cloned()
                    .collect();
                if visits.is_empty() {
                    continue;
                }
                households.push(Household {
                    id: household.id.clone(),
                    floor: household.floor,
                    title: household.title.clone(),
                    visits,
                });
            }

            if households.len() > before {
                location_ids.push(location.id.clone());
            }
        }

        let data = compute_area_stats(
            self.range.end,
            &households,
            self.range.start,
            self.done_metric_id,
        );

        AreaBucket {
            area,
            location_ids,
            households,
            data,
        }
    }
}
