use geo::EuclideanLength;
use geo_types::{Coord, LineString};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::Contour;

/// A chain of connected straight segments through an ordered vertex list.
///
/// Vertices are pure 2D integer coordinates — no bulge, width or elevation.
/// Contour-derived polylines are always open chains: no closing segment is
/// added even when the trace looped back on itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Polyline {
    pub vertices: Vec<[i32; 2]>,
    pub closed: bool,
}

impl Polyline {
    /// One vertex per contour point, in original trace order.
    pub fn from_contour(contour: &Contour) -> Self {
        Self {
            vertices: contour.points.clone(),
            closed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Convert to a geo-types LineString for geometric operations.
    pub fn to_line_string(&self) -> LineString<f64> {
        LineString::new(
            self.vertices
                .iter()
                .map(|&[x, y]| Coord {
                    x: f64::from(x),
                    y: f64::from(y),
                })
                .collect(),
        )
    }

    /// Total Euclidean length of the chain, in pixels.
    pub fn length(&self) -> f64 {
        self.to_line_string().euclidean_length()
    }
}

impl From<&Contour> for Polyline {
    fn from(contour: &Contour) -> Self {
        Self::from_contour(contour)
    }
}
