//! Area deduplication and location-to-area grouping.

use std::collections::BTreeSet;

use canvass_map_canvass_models::{Area, Location};
use canvass_map_graph_models::OverlapPolicy;
use canvass_map_spatial::AreaPolygon;

/// Removes repeated areas by ID, keeping the first occurrence of each in
/// input order.
pub fn dedup_areas<'a>(areas: impl IntoIterator<Item = &'a Area>) -> Vec<&'a Area> {
    let mut seen = BTreeSet::new();
    areas
        .into_iter()
        .filter(|area| seen.insert(area.id.as_str()))
        .collect()
}

/// Location indices grouped by the area polygons that contain them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouping {
    /// For each polygon, in polygon order, the indices of contained
    /// locations in location order.
    pub per_area: Vec<Vec<usize>>,
    /// Indices of locations contained by no polygon.
    pub outside: Vec<usize>,
}

/// Groups `locations` by containment in `polygons`.
///
/// Areas are scanned in order. With [`OverlapPolicy::FirstMatch`] a
/// location already claimed by an earlier area is skipped for later ones.
#[must_use]
pub fn group_locations(
    polygons: &[AreaPolygon],
    locations: &[Location],
    policy: OverlapPolicy,
) -> Grouping {
    let mut contained = vec![false; locations.len()];
    let mut per_area = Vec::with_capacity(polygons.len());

    for polygon in polygons {
        let mut members = Vec::new();
        for (idx, location) in locations.iter().enumerate() {
            if policy == OverlapPolicy::FirstMatch && contained[idx] {
                continue;
            }
            if polygon.contains(location.position) {
                members.push(idx);
                contained[idx] = true;
            }
        }
        per_area.push(members);
    }

    let outside = contained
        .iter()
        .enumerate()
        .filter_map(|(idx, &inside)| (!inside).then_some(idx))
        .collect();

    Grouping { per_area, outside }
}
