//! Geometric validation of traced outlines: closure, winding, crossings

use glam::Vec2;
use geo::{Area, Contains, Intersects, LineString, Polygon};

use super::{ValidationError, Winding};

/// Corners closer than this count as the same corner
const VERTEX_EPSILON: f32 = 0.01;

pub struct BorderValidator;

impl BorderValidator {
    /// Validate an outline given as its corners in the ground plane.
    /// Outlines are expected to walk clockwise.
    pub fn validate_outline(vertices: &[Vec2]) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if vertices.len() < 3 {
            errors.push(ValidationError::InsufficientVertices {
                count: vertices.len(),
                minimum: 3,
            });
            return errors;
        }

        let n = vertices.len();
        for i in 0..n {
            if vertices[i].abs_diff_eq(vertices[(i + 1) % n], VERTEX_EPSILON) {
                errors.push(ValidationError::DuplicateVertex { index: i });
            }
        }

        let coords = Self::to_coords(vertices);

        if Self::is_self_intersecting(&coords) {
            errors.push(ValidationError::SelfIntersecting {
                description: "Outline edges cross each other".into(),
            });
        }

        if !Self::is_clockwise(&coords) {
            errors.push(ValidationError::InvalidWinding {
                expected: Winding::Clockwise,
            });
        }

        errors
    }

    /// Unsigned area enclosed by an outline
    pub fn outline_area(vertices: &[Vec2]) -> f64 {
        if vertices.len() < 3 {
            return 0.0;
        }
        Self::to_geo_polygon(vertices).unsigned_area()
    }

    /// Whether `inner` lies entirely inside `outer`
    pub fn contains(outer: &[Vec2], inner: &[Vec2]) -> bool {
        if outer.len() < 3 || inner.len() < 3 {
            return false;
        }
        Self::to_geo_polygon(outer).contains(&Self::to_geo_polygon(inner))
    }

    pub fn validate_contains(
        outer_id: &str,
        outer: &[Vec2],
        inner_id: &str,
        inner: &[Vec2],
    ) -> Vec<ValidationError> {
        if Self::contains(outer, inner) {
            Vec::new()
        } else {
            vec![ValidationError::NotContained {
                outer: outer_id.to_string(),
                inner: inner_id.to_string(),
            }]
        }
    }

    /// Validate that two outlines don't overlap
    pub fn validate_no_overlap(
        area1_id: &str,
        vertices1: &[Vec2],
        area2_id: &str,
        vertices2: &[Vec2],
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if vertices1.len() < 3 || vertices2.len() < 3 {
            return errors;
        }

        let poly1 = Self::to_geo_polygon(vertices1);
        let poly2 = Self::to_geo_polygon(vertices2);

        if poly1.intersects(&poly2) {
            errors.push(ValidationError::PolygonOverlap {
                area1: area1_id.to_string(),
                area2: area2_id.to_string(),
            });
        }

        errors
    }

    /// Shoelace sum over the edges; positive for clockwise outlines
    fn is_clockwise(coords: &[(f64, f64)]) -> bool {
        let mut sum = 0.0;
        for i in 0..coords.len() {
            let j = (i + 1) % coords.len();
            sum += (coords[j].0 - coords[i].0) * (coords[j].1 + coords[i].1);
        }
        sum > 0.0
    }

    /// Check if outline edges cross each other (excluding adjacent edges)
    fn is_self_intersecting(coords: &[(f64, f64)]) -> bool {
        let n = coords.len();
        if n < 4 {
            return false;
        }

        for i in 0..n {
            let a1 = coords[i];
            let a2 = coords[(i + 1) % n];

            for j in (i + 2)..n {
                if j == (i + n - 1) % n {
                    continue;
                }

                let b1 = coords[j];
                let b2 = coords[(j + 1) % n];

                if Self::segments_intersect(a1, a2, b1, b2) {
                    return true;
                }
            }
        }
        false
    }

    /// Proper crossing only; segments that merely touch do not count
    fn segments_intersect(a1: (f64, f64), a2: (f64, f64), b1: (f64, f64), b2: (f64, f64)) -> bool {
        let d1 = Self::cross_product_sign(b1, b2, a1);
        let d2 = Self::cross_product_sign(b1, b2, a2);
        let d3 = Self::cross_product_sign(a1, a2, b1);
        let d4 = Self::cross_product_sign(a1, a2, b2);

        ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
            && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    }

    fn cross_product_sign(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
        (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
    }

    fn to_coords(vertices: &[Vec2]) -> Vec<(f64, f64)> {
        vertices
            .iter()
            .map(|v| (f64::from(v.x), f64::from(v.y)))
            .collect()
    }

    fn to_geo_polygon(vertices: &[Vec2]) -> Polygon<f64> {
        // LineString::from closes the ring when the polygon is built
        Polygon::new(LineString::from(Self::to_coords(vertices)), vec![])
    }
}
