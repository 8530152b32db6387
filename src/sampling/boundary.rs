//! Boundary frame point generation
//!
//! Produces the deterministic points along the domain rectangle that seed
//! the Poisson-disc sampler: *interior* points just inside the edges (with a
//! slight parabolic inset so no three consecutive points are collinear,
//! which would create degenerate flat triangles), and *exterior* points just
//! outside the rectangle that pad the triangulation so boundary cells are
//! not artificially truncated.
//!
//! Pure function of `(bounds, spacing)`; no randomness.

use glam::DVec2;

use crate::geometry::Rect;

/// Generate the boundary frame for a domain rectangle
///
/// Returns `(interior, exterior)` point sets:
///
/// - Interior points sit half a spacing inside each edge, pushed further
///   inward near the corners by a parabolic inset of up to another half
///   spacing. The curvature guarantees no three consecutive points along an
///   edge are exactly collinear.
/// - Exterior points sit half a spacing outside each edge at roughly double
///   spacing, plus the four outward corner points. They exist only to pad
///   the triangulation; the regions they own are not terrain.
///
/// Both sets are emitted in a fixed edge order (top, right, bottom, left)
/// so the output is deterministic.
pub fn boundary_points(bounds: &Rect, spacing: f64) -> (Vec<DVec2>, Vec<DVec2>) {
    let min = bounds.min();
    let max = bounds.max();
    let half = spacing * 0.5;

    // Each edge: start corner, direction along the edge, inward normal.
    let edges = [
        (min, DVec2::new(1.0, 0.0), DVec2::new(0.0, 1.0), bounds.width), // top
        (
            DVec2::new(max.x, min.y),
            DVec2::new(0.0, 1.0),
            DVec2::new(-1.0, 0.0),
            bounds.height,
        ), // right
        (max, DVec2::new(-1.0, 0.0), DVec2::new(0.0, -1.0), bounds.width), // bottom
        (
            DVec2::new(min.x, max.y),
            DVec2::new(0.0, -1.0),
            DVec2::new(1.0, 0.0),
            bounds.height,
        ), // left
    ];

    let mut interior = Vec::new();
    for &(start, along, inward, length) in &edges {
        let count = (length / spacing).ceil().max(2.0) as usize;
        for i in 0..count {
            let t = (i as f64 + 0.5) / count as f64;
            // dc runs -1..1 along the edge; the quadratic inset is deepest
            // at the corners, breaking up collinear runs.
            let dc = 2.0 * t - 1.0;
            let inset = half + half * dc * dc;
            interior.push(start + along * (t * length) + inward * inset);
        }
    }

    let mut exterior = Vec::new();
    for &(start, along, inward, length) in &edges {
        let count = (length / (2.0 * spacing)).ceil().max(1.0) as usize;
        for i in 0..count {
            let t = (i as f64 + 0.5) / count as f64;
            exterior.push(start + along * (t * length) - inward * half);
        }
    }
    // Outward corner points complete the padding frame.
    exterior.push(min - DVec2::splat(half));
    exterior.push(DVec2::new(max.x + half, min.y - half));
    exterior.push(max + DVec2::splat(half));
    exterior.push(DVec2::new(min.x - half, max.y + half));

    (interior, exterior)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::orient2d;

    #[test]
    fn test_interior_points_inside_domain() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (interior, _) = boundary_points(&bounds, 10.0);
        assert!(!interior.is_empty());
        for p in &interior {
            assert!(bounds.contains(*p), "interior point {:?} outside domain", p);
        }
    }

    #[test]
    fn test_exterior_points_outside_domain() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (_, exterior) = boundary_points(&bounds, 10.0);
        assert!(!exterior.is_empty());
        for p in &exterior {
            assert!(
                !bounds.contains(*p),
                "exterior point {:?} inside domain",
                p
            );
            // Still close enough to be covered by the sampler grid
            assert!(bounds.expanded(10.0).contains(*p));
        }
    }

    #[test]
    fn test_deterministic() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 60.0);
        let a = boundary_points(&bounds, 7.5);
        let b = boundary_points(&bounds, 7.5);
        assert_eq!(a.0, b.0);
        assert_eq!(a.1, b.1);
    }

    #[test]
    fn test_no_three_consecutive_interior_points_collinear() {
        let bounds = Rect::new(0.0, 0.0, 200.0, 200.0);
        let (interior, _) = boundary_points(&bounds, 10.0);
        // The top edge emits its points consecutively; the parabolic inset
        // must keep every consecutive triple off a straight line.
        let per_edge = (200.0f64 / 10.0).ceil() as usize;
        let top = &interior[..per_edge];
        for window in top.windows(3) {
            let area = orient2d(window[0], window[1], window[2]);
            assert!(
                area.abs() > 1e-9,
                "collinear run: {:?} {:?} {:?}",
                window[0],
                window[1],
                window[2]
            );
        }
    }

    #[test]
    fn test_scales_with_spacing() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (fine, _) = boundary_points(&bounds, 5.0);
        let (coarse, _) = boundary_points(&bounds, 20.0);
        assert!(fine.len() > coarse.len());
    }
}
