#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API response types for the canvass map server.
//!
//! These wrap the aggregation records from `canvass_map_graph_models` in the
//! envelopes the REST API returns, so the API contract can evolve apart from
//! the aggregation.

use canvass_map_graph_models::AreaCard;
use serde::{Deserialize, Serialize};

/// Response of `GET /api/orgs/{orgId}/areaassignments/{areaAssId}/areasgraph`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiAreasGraph {
    /// One card per assigned area, "no area" last when present.
    pub data: Vec<AreaCard>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Error body for failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use canvass_map_graph_models::CardArea;

    use super::*;

    #[test]
    fn areas_graph_wraps_cards_in_data() {
        let body = ApiAreasGraph {
            data: vec![AreaCard {
                area: CardArea {
                    id: "area-1".to_string(),
                    title: None,
                },
                data: Vec::new(),
            }],
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "data": [{ "area": { "id": "area-1", "title": null }, "data": [] }] })
        );
    }
}
