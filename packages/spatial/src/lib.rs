#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Point-in-polygon containment for canvassing areas.
//!
//! Area polygons are stored as ordered `[lat, lng]` vertices. They are
//! converted once per request into [`AreaPolygon`]s, which answer
//! containment queries for location positions. Coordinates are treated as
//! planar (`x = lng`, `y = lat`); polygons crossing the antimeridian are not
//! handled.
//!
//! Containment is boundary-exclusive: a point lying exactly on an edge or a
//! vertex is outside. Polygons with fewer than three distinct vertices
//! contain nothing.

use canvass_map_canvass_models::{Area, LatLng};
use geo::{BoundingRect, Contains, Coord, LineString, Point, Polygon, Rect};

/// Minimum number of distinct vertices for a polygon to enclose anything.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// A prepared area polygon with its bounding rectangle.
#[derive(Debug, Clone)]
pub struct AreaPolygon {
    shape: Option<PreparedShape>,
}

#[derive(Debug, Clone)]
struct PreparedShape {
    polygon: Polygon<f64>,
    bounds: Rect<f64>,
}

impl AreaPolygon {
    /// Builds a polygon from vertices in boundary order.
    ///
    /// An explicit closing vertex (equal to the first) is accepted but not
    /// required. Degenerate input yields a polygon that contains nothing.
    #[must_use]
    pub fn new(vertices: impl IntoIterator<Item = LatLng>) -> Self {
        let mut coords: Vec<Coord<f64>> = vertices
            .into_iter()
            .map(|v| Coord { x: v.lng, y: v.lat })
            .collect();
        coords.dedup();
        if coords.len() > 1 && coords.first() == coords.last() {
            coords.pop();
        }

        if coords.len() < MIN_POLYGON_VERTICES {
            return Self { shape: None };
        }

        let polygon = Polygon::new(LineString::from(coords), vec![]);
        let shape = polygon
            .bounding_rect()
            .map(|bounds| PreparedShape { polygon, bounds });

        Self { shape }
    }

    /// Builds the polygon for a stored [`Area`].
    #[must_use]
    pub fn from_area(area: &Area) -> Self {
        let polygon = Self::new(area.vertices());
        if polygon.is_degenerate() {
            log::debug!(
                "Area {} has {} vertices, treating it as empty",
                area.id,
                area.points.len()
            );
        }
        polygon
    }

    /// Whether this polygon can never contain a point.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.shape.is_none()
    }

    /// Whether `point` lies strictly inside the polygon.
    #[must_use]
    pub fn contains(&self, point: LatLng) -> bool {
        let Some(shape) = &self.shape else {
            return false;
        };

        let min = shape.bounds.min();
        let max = shape.bounds.max();
        if point.lng < min.x || point.lng > max.x || point.lat < min.y || point.lat > max.y {
            return false;
        }

        shape.polygon.contains(&Point::new(point.lng, point.lat))
    }
}

/// Tests a single point against polygon vertices without keeping the
/// prepared polygon around.
#[must_use]
pub fn is_point_inside_polygon(point: LatLng, vertices: &[LatLng]) -> bool {
    AreaPolygon::new(vertices.iter().copied()).contains(point)
}
