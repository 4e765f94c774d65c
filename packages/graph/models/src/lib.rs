#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Output records of the area graph aggregation.
//!
//! One [`AreaCard`] is produced per assigned area, plus a synthetic
//! [`NO_AREA_ID`] card for visits made outside every assigned area. Each
//! card carries a cumulative progress series of [`AreaGraphPoint`]s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// ID and title of the synthetic bucket for locations outside every area.
pub const NO_AREA_ID: &str = "noArea";

/// Identity of the area a card describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardArea {
    /// Area ID, or [`NO_AREA_ID`].
    pub id: String,
    /// Area title.
    pub title: Option<String>,
}

impl CardArea {
    /// The synthetic "no area" identity.
    #[must_use]
    pub fn no_area() -> Self {
        Self {
            id: NO_AREA_ID.to_string(),
            title: Some(NO_AREA_ID.to_string()),
        }
    }

    /// Whether this is the synthetic "no area" identity.
    #[must_use]
    pub fn is_no_area(&self) -> bool {
        self.id == NO_AREA_ID
    }
}

/// Cumulative progress at the end of one time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaGraphPoint {
    /// Start of the time bucket.
    pub date: DateTime<Utc>,
    /// Households visited at least once by the end of the bucket.
    pub households_visited: u32,
    /// Households marked done by the end of the bucket.
    pub successful_visits: u32,
}

/// Progress series for one area bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaCard {
    /// The area this card describes.
    pub area: CardArea,
    /// Progress points in chronological order.
    pub data: Vec<AreaGraphPoint>,
}

/// How a location contained by several overlapping areas is bucketed.
///
/// Under both policies a location contained by any area is kept out of
/// the "no area" bucket.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
pub enum OverlapPolicy {
    /// Every containing area receives the location, so overlapping areas
    /// count its visits more than once.
    #[default]
    #[strum(serialize = "all")]
    AllMatches,
    /// Only the first containing area, in assignment session order,
    /// receives the location.
    #[strum(serialize = "first")]
    FirstMatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_policy_parses_config_values() {
        assert_eq!("all".parse::<OverlapPolicy>().unwrap(), OverlapPolicy::AllMatches);
        assert_eq!("first".parse::<OverlapPolicy>().unwrap(), OverlapPolicy::FirstMatch);
        assert!("both".parse::<OverlapPolicy>().is_err());
        assert_eq!(OverlapPolicy::default().to_string(), "all");
    }

    #[test]
    fn card_serializes_in_api_shape() {
        let card = AreaCard {
            area: CardArea::no_area(),
            data: vec![AreaGraphPoint {
                date: "2024-05-01T10:00:00Z".parse().unwrap(),
                households_visited: 2,
                successful_visits: 1,
            }],
        };

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["area"]["id"], "noArea");
        assert_eq!(json["area"]["title"], "noArea");
        assert_eq!(json["data"][0]["householdsVisited"], 2);
        assert_eq!(json["data"][0]["successfulVisits"], 1);
        assert_eq!(json["data"][0]["date"], "2024-05-01T10:00:00Z");
    }
}
