#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canvassing domain types shared across the canvass-map workspace.
//!
//! These mirror the documents kept in the canvass store: an [`Assignment`]
//! ties people to [`Area`] polygons through its sessions, and every
//! [`Location`] of an organization carries its [`Household`]s, each with the
//! [`Visit`]s canvassers have reported. Field names follow the stored
//! document format (`orgId`, `areaAssId`, `definesDone`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Response value that marks a boolean metric as answered positively.
pub const YES_RESPONSE: &str = "yes";

/// A geographic position in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl LatLng {
    /// Creates a new position.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// How a metric is answered.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MetricKind {
    /// Yes/no question.
    Boolean,
    /// Rating from 1 to 5.
    Scale5,
}

/// A question asked per household (or location) during a visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Metric ID, referenced by [`MetricResponse::metric_id`].
    #[serde(alias = "_id")]
    pub id: String,
    /// Question text shown to the canvasser.
    pub question: String,
    /// Optional longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Answer kind.
    pub kind: MetricKind,
    /// Whether a `"yes"` answer marks the household as done.
    #[serde(default)]
    pub defines_done: bool,
}

/// Granularity at which an assignment collects responses.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportingLevel {
    /// One report per household.
    #[default]
    Household,
    /// One report per location.
    Location,
}

/// A (person, area) pair stored on an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRef {
    /// Assignee person ID in the person directory.
    pub person_id: i64,
    /// Assigned area ID.
    pub area_id: String,
}

/// A canvassing assignment run over a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Assignment ID.
    #[serde(alias = "_id")]
    pub id: String,
    /// Owning organization.
    pub org_id: i64,
    /// Campaign the assignment belongs to.
    #[serde(rename = "campId")]
    pub campaign_id: i64,
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Instructions for canvassers.
    #[serde(default)]
    pub instructions: String,
    /// Start of the canvassing window.
    #[serde(default, rename = "start_date")]
    pub start_date: Option<DateTime<Utc>>,
    /// End of the canvassing window.
    #[serde(default, rename = "end_date")]
    pub end_date: Option<DateTime<Utc>>,
    /// Ordered metric definitions.
    #[serde(default)]
    pub metrics: Vec<Metric>,
    /// Reporting level, `household` when absent.
    #[serde(default, rename = "reporting_level")]
    pub reporting_level: ReportingLevel,
    /// Assignee/area pairs in stored order.
    #[serde(default)]
    pub sessions: Vec<SessionRef>,
}

impl Assignment {
    /// Returns the ID of the metric that defines a household as done.
    ///
    /// Only one metric is expected to carry the flag; if several do, the
    /// first in metric order is used.
    #[must_use]
    pub fn done_metric_id(&self) -> Option<&str> {
        self.metrics
            .iter()
            .find(|m| m.defines_done)
            .map(|m| m.id.as_str())
    }
}

/// A named polygon region used to bound a canvassing zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    /// Area ID.
    #[serde(alias = "_id")]
    pub id: String,
    /// Owning organization.
    pub org_id: i64,
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Polygon vertices as `[lat, lng]` pairs in boundary order.
    #[serde(default)]
    pub points: Vec<[f64; 2]>,
}

impl Area {
    /// Iterates the polygon vertices as [`LatLng`] values.
    pub fn vertices(&self) -> impl Iterator<Item = LatLng> + '_ {
        self.points.iter().map(|&[lat, lng]| LatLng::new(lat, lng))
    }
}

/// A response to one metric during a visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricResponse {
    /// ID of the answered [`Metric`].
    pub metric_id: String,
    /// Response value (`"yes"`/`"no"` or `"1"`..`"5"`).
    pub response: String,
}

/// A single canvasser interaction with a household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    /// Visit ID.
    pub id: String,
    /// Assignment this visit was made for.
    #[serde(rename = "areaAssId")]
    pub assignment_id: String,
    /// Canvasser who made the visit.
    pub person_id: i64,
    /// When the visit happened.
    pub timestamp: DateTime<Utc>,
    /// Whether someone opened the door.
    #[serde(default)]
    pub door_was_opened: bool,
    /// Whether the canvasser achieved the goal of the visit.
    #[serde(default)]
    pub mission_accomplished: bool,
    /// Per-metric responses.
    #[serde(default)]
    pub responses: Vec<MetricResponse>,
    /// Optional note for organizers.
    #[serde(default)]
    pub note_to_official: Option<String>,
}

impl Visit {
    /// Returns the response recorded for `metric_id`, if any.
    #[must_use]
    pub fn response_for(&self, metric_id: &str) -> Option<&str> {
        self.responses
            .iter()
            .find(|r| r.metric_id == metric_id)
            .map(|r| r.response.as_str())
    }

    /// Whether this visit answered the done-defining metric with `"yes"`.
    #[must_use]
    pub fn marks_done(&self, done_metric_id: &str) -> bool {
        self.response_for(done_metric_id) == Some(YES_RESPONSE)
    }
}

/// A unit within a location, such as an apartment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    /// Household ID.
    pub id: String,
    /// Floor number, when known.
    #[serde(default)]
    pub floor: Option<i32>,
    /// Display title (e.g. door label).
    #[serde(default)]
    pub title: Option<String>,
    /// Visits in insertion order.
    #[serde(default)]
    pub visits: Vec<Visit>,
}

impl Household {
    /// Iterates the visits made for `assignment_id`.
    pub fn visits_for<'a>(&'a self, assignment_id: &'a str) -> impl Iterator<Item = &'a Visit> {
        self.visits
            .iter()
            .filter(move |v| v.assignment_id == assignment_id)
    }

    /// Whether at least one visit was made for `assignment_id`.
    #[must_use]
    pub fn has_visit_for(&self, assignment_id: &str) -> bool {
        self.visits_for(assignment_id).next().is_some()
    }
}

/// A physical address or building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Location ID.
    #[serde(alias = "_id")]
    pub id: String,
    /// Owning organization.
    pub org_id: i64,
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Position of the building.
    pub position: LatLng,
    /// Households at this location.
    #[serde(default)]
    pub households: Vec<Household>,
}

impl Location {
    /// Whether any household here has a visit for `assignment_id`.
    #[must_use]
    pub fn has_visit_for(&self, assignment_id: &str) -> bool {
        self.households.iter().any(|h| h.has_visit_for(assignment_id))
    }
}

/// A person record from the person directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Person ID.
    pub id: i64,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
}

/// A session whose assignee and area both resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSession {
    /// The assigned person.
    pub assignee: Person,
    /// The assigned area.
    pub area: Area,
}

/// A bulk export of canvass documents, as accepted by the store import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvassSnapshot {
    /// Area documents.
    #[serde(default)]
    pub areas: Vec<Area>,
    /// Assignment documents.
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    /// Location documents with nested households and visits.
    #[serde(default)]
    pub locations: Vec<Location>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCATION_DOC: &str = r#"{
        "_id": "loc-1",
        "orgId": 1,
        "title": "Storgatan 1",
        "position": { "lat": 55.6, "lng": 13.0 },
        "households": [
            {
                "id": "hh-1",
                "floor": 2,
                "title": "2A",
                "visits": [
                    {
                        "id": "v-1",
                        "areaAssId": "ass-1",
                        "personId": 7,
                        "timestamp": "2024-05-01T10:00:00Z",
                        "doorWasOpened": true,
                        "missionAccomplished": false,
                        "responses": [{ "metricId": "m-done", "response": "yes" }],
                        "noteToOfficial": null
                    },
                    {
                        "id": "v-2",
                        "areaAssId": "other",
                        "personId": 7,
                        "timestamp": "2024-05-02T10:00:00Z"
                    }
                ]
            },
            { "id": "hh-2" }
        ]
    }"#;

    #[test]
    fn location_document_deserializes() {
        let location: Location = serde_json::from_str(LOCATION_DOC).unwrap();

        assert_eq!(location.id, "loc-1");
        assert_eq!(location.households.len(), 2);
        assert_eq!(location.households[0].floor, Some(2));
        assert!(location.households[1].visits.is_empty());

        let visit = &location.households[0].visits[0];
        assert_eq!(visit.assignment_id, "ass-1");
        assert!(visit.door_was_opened);
        assert!(visit.marks_done("m-done"));
        assert!(!visit.marks_done("m-other"));
    }

    #[test]
    fn visits_are_filtered_by_assignment() {
        let location: Location = serde_json::from_str(LOCATION_DOC).unwrap();
        let household = &location.households[0];

        let ids: Vec<&str> = household.visits_for("ass-1").map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["v-1"]);
        assert!(location.has_visit_for("other"));
        assert!(!location.has_visit_for("missing"));
        assert!(!location.households[1].has_visit_for("ass-1"));
    }

    #[test]
    fn assignment_defaults_and_done_metric() {
        let assignment: Assignment = serde_json::from_str(
            r#"{
                "_id": "ass-1",
                "orgId": 1,
                "campId": 3,
                "metrics": [
                    { "_id": "m-1", "question": "Rating?", "kind": "scale5" },
                    { "_id": "m-2", "question": "Talked?", "kind": "boolean", "definesDone": true },
                    { "_id": "m-3", "question": "Again?", "kind": "boolean", "definesDone": true }
                ],
                "sessions": [{ "personId": 7, "areaId": "area-1" }]
            }"#,
        )
        .unwrap();

        assert_eq!(assignment.reporting_level, ReportingLevel::Household);
        assert_eq!(assignment.metrics[0].kind, MetricKind::Scale5);
        assert_eq!(assignment.done_metric_id(), Some("m-2"));
        assert_eq!(assignment.sessions[0].area_id, "area-1");
    }

    #[test]
    fn area_vertices_are_lat_lng() {
        let area = Area {
            id: "a".to_string(),
            org_id: 1,
            title: None,
            description: None,
            points: vec![[1.0, 2.0], [3.0, 4.0]],
        };

        let vertices: Vec<LatLng> = area.vertices().collect();
        assert_eq!(vertices, vec![LatLng::new(1.0, 2.0), LatLng::new(3.0, 4.0)]);
    }

    #[test]
    fn enum_string_forms() {
        assert_eq!(MetricKind::Scale5.to_string(), "scale5");
        assert_eq!("location".parse::<ReportingLevel>().unwrap(), ReportingLevel::Location);
    }
}
