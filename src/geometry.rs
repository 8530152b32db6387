//! Shared 2D geometry primitives
//!
//! Small helpers used across the pipeline: the domain rectangle, the
//! circumcenter computation shared by the triangulator and the mesh builder,
//! and polygon measurements for Voronoi cells.
//!
//! All geometric arithmetic in this crate runs in `f64` (via [`glam::DVec2`])
//! so that the in-circle predicate and circumcenter positions agree; mixing
//! precisions here shows up as Voronoi corners that fail to close.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Epsilon used by the in-circle predicate and the circumcenter determinant.
///
/// Both tests must share one threshold: a triangle whose circumcenter is
/// considered degenerate (centroid fallback) must also be treated as
/// degenerate by the in-circle test, otherwise incremental insertion can
/// flip-flop on near-collinear triples.
pub const DEGENERACY_EPSILON: f64 = 1e-10;

/// An axis-aligned rectangle (the map domain)
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// X coordinate of the left edge
    pub x: f64,
    /// Y coordinate of the top edge
    pub y: f64,
    /// Width (must be positive for a usable domain)
    pub width: f64,
    /// Height (must be positive for a usable domain)
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from origin and extents
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Minimum corner (top-left)
    #[inline]
    pub fn min(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Maximum corner (bottom-right)
    #[inline]
    pub fn max(&self) -> DVec2 {
        DVec2::new(self.x + self.width, self.y + self.height)
    }

    /// Center of the rectangle
    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Check whether a point lies inside the rectangle (inclusive edges)
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.x
            && p.x <= self.x + self.width
            && p.y >= self.y
            && p.y <= self.y + self.height
    }

    /// Clamp a point into the rectangle
    #[inline]
    pub fn clamp_point(&self, p: DVec2) -> DVec2 {
        DVec2::new(
            p.x.clamp(self.x, self.x + self.width),
            p.y.clamp(self.y, self.y + self.height),
        )
    }

    /// Grow the rectangle outward by `margin` on all four sides
    pub fn expanded(&self, margin: f64) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// True if the rectangle cannot host any geometry
    ///
    /// Degenerate means non-finite origin/extents or a non-positive area.
    pub fn is_degenerate(&self) -> bool {
        !(self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0)
    }
}

/// Circumcenter of triangle `(a, b, c)`, with centroid fallback
///
/// Uses the standard two-line-equidistant-point formula, translated to `a`
/// for numerical stability. When the triangle is degenerate (the three points
/// near-collinear, determinant below [`DEGENERACY_EPSILON`]) the centroid is
/// returned instead, so callers never see NaN or infinity.
pub fn circumcenter(a: DVec2, b: DVec2, c: DVec2) -> DVec2 {
    let ab = b - a;
    let ac = c - a;
    let d = 2.0 * (ab.x * ac.y - ab.y * ac.x);
    if d.abs() < DEGENERACY_EPSILON {
        return (a + b + c) / 3.0;
    }
    let ab_len = ab.length_squared();
    let ac_len = ac.length_squared();
    let ux = (ac.y * ab_len - ab.y * ac_len) / d;
    let uy = (ab.x * ac_len - ac.x * ab_len) / d;
    a + DVec2::new(ux, uy)
}

/// Twice the signed area of triangle `(a, b, c)`
///
/// Positive for counter-clockwise winding (in a Y-down coordinate system
/// this is the mathematical convention applied to raw coordinates; the
/// whole crate uses it consistently).
#[inline]
pub fn orient2d(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Signed area of a polygon via the shoelace formula
///
/// Positive for counter-clockwise vertex order, negative for clockwise.
/// Returns 0.0 for fewer than 3 vertices.
pub fn polygon_signed_area(polygon: &[DVec2]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..polygon.len() {
        let p = polygon[i];
        let q = polygon[(i + 1) % polygon.len()];
        sum += p.x * q.y - q.x * p.y;
    }
    sum * 0.5
}

/// Area-weighted centroid of a polygon
///
/// Falls back to the vertex average for degenerate (near-zero area) polygons.
pub fn polygon_centroid(polygon: &[DVec2]) -> DVec2 {
    if polygon.is_empty() {
        return DVec2::ZERO;
    }
    let area = polygon_signed_area(polygon);
    if area.abs() < DEGENERACY_EPSILON {
        let sum: DVec2 = polygon.iter().copied().sum();
        return sum / polygon.len() as f64;
    }
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..polygon.len() {
        let p = polygon[i];
        let q = polygon[(i + 1) % polygon.len()];
        let cross = p.x * q.y - q.x * p.y;
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
    }
    DVec2::new(cx, cy) / (6.0 * area)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(rect.contains(DVec2::new(50.0, 25.0)));
        assert!(rect.contains(DVec2::new(0.0, 0.0))); // edges inclusive
        assert!(rect.contains(DVec2::new(100.0, 50.0)));
        assert!(!rect.contains(DVec2::new(-0.1, 25.0)));
        assert!(!rect.contains(DVec2::new(50.0, 50.1)));
    }

    #[test]
    fn test_rect_degenerate() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_degenerate());
        assert!(Rect::new(0.0, 0.0, 10.0, -1.0).is_degenerate());
        assert!(Rect::new(f64::NAN, 0.0, 10.0, 10.0).is_degenerate());
        assert!(!Rect::new(0.0, 0.0, 10.0, 10.0).is_degenerate());
    }

    #[test]
    fn test_rect_expanded() {
        let rect = Rect::new(10.0, 10.0, 100.0, 100.0).expanded(5.0);
        assert_eq!(rect.x, 5.0);
        assert_eq!(rect.y, 5.0);
        assert_eq!(rect.width, 110.0);
        assert_eq!(rect.height, 110.0);
    }

    #[test]
    fn test_circumcenter_right_triangle() {
        // Circumcenter of a right triangle sits on the hypotenuse midpoint
        let center = circumcenter(
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(0.0, 10.0),
        );
        assert!((center - DVec2::new(5.0, 5.0)).length() < 1e-9);
    }

    #[test]
    fn test_circumcenter_equidistant() {
        let a = DVec2::new(1.0, 2.0);
        let b = DVec2::new(7.0, 3.0);
        let c = DVec2::new(4.0, 9.0);
        let center = circumcenter(a, b, c);
        let ra = (center - a).length();
        let rb = (center - b).length();
        let rc = (center - c).length();
        assert!((ra - rb).abs() < 1e-9);
        assert!((ra - rc).abs() < 1e-9);
    }

    #[test]
    fn test_circumcenter_collinear_fallback() {
        // Collinear points must yield the centroid, never NaN
        let center = circumcenter(
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(2.0, 0.0),
        );
        assert!(center.is_finite());
        assert!((center - DVec2::new(1.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_polygon_signed_area() {
        // Unit square, counter-clockwise
        let ccw = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ];
        assert!((polygon_signed_area(&ccw) - 1.0).abs() < 1e-12);

        let cw: Vec<DVec2> = ccw.iter().rev().copied().collect();
        assert!((polygon_signed_area(&cw) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_polygon_centroid() {
        let square = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(0.0, 2.0),
        ];
        let centroid = polygon_centroid(&square);
        assert!((centroid - DVec2::new(1.0, 1.0)).length() < 1e-12);
    }
}
