//! Incremental Delaunay triangulation (Bowyer–Watson)
//!
//! Consumes a 2D point set and produces a triangle list satisfying the
//! Delaunay empty-circumcircle property, encoded as flat `triangles` /
//! `halfedges` index arrays. The encoding matches the conventional compact
//! half-edge layout: side `s` belongs to triangle `s / 3`, `triangles[s]` is
//! the vertex the side starts from, and `halfedges[s]` is the opposite
//! directed side or [`EMPTY`] on the outer boundary.

use glam::DVec2;
use std::collections::HashMap;

use crate::geometry::{orient2d, DEGENERACY_EPSILON};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sentinel for an unpaired half-edge (true geometric boundary)
pub const EMPTY: usize = usize::MAX;

/// Result of Delaunay triangulation
///
/// `triangles` holds vertex indices in runs of three, one run per triangle
/// in counter-clockwise winding. `halfedges` is parallel to it:
/// `halfedges[s]` is the index of the opposite directed edge of side `s`,
/// or [`EMPTY`] if that side lies on the boundary.
///
/// Invariant: for any side `s` with `halfedges[s] != EMPTY`,
/// `halfedges[halfedges[s]] == s`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Triangulation {
    /// Vertex index each side starts from; three consecutive entries form
    /// one counter-clockwise triangle
    pub triangles: Vec<usize>,
    /// Opposite side of each side, or `EMPTY` on the boundary
    pub halfedges: Vec<usize>,
}

impl Triangulation {
    /// Number of triangles
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// True if the triangulation contains no triangles
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// In-circle predicate for the Bowyer–Watson bad-triangle test
///
/// Returns true when `p` lies strictly inside the circumcircle of the
/// counter-clockwise triangle `(a, b, c)`. The determinant is compared
/// against [`DEGENERACY_EPSILON`] — the same threshold the circumcenter
/// computation uses — so cocircular and near-degenerate configurations are
/// treated as "not inside" rather than flip-flopping.
fn in_circumcircle(a: DVec2, b: DVec2, c: DVec2, p: DVec2) -> bool {
    let ax = a.x - p.x;
    let ay = a.y - p.y;
    let bx = b.x - p.x;
    let by = b.y - p.y;
    let cx = c.x - p.x;
    let cy = c.y - p.y;

    let a_sq = ax * ax + ay * ay;
    let b_sq = bx * bx + by * by;
    let c_sq = cx * cx + cy * cy;

    let det = ax * (by * c_sq - cy * b_sq) - ay * (bx * c_sq - cx * b_sq)
        + a_sq * (bx * cy - cx * by);
    det > DEGENERACY_EPSILON
}

/// Compute the Delaunay triangulation of a point set
///
/// Incremental Bowyer–Watson: points are inserted in x-sorted order into a
/// working triangle list seeded with one enclosing super-triangle; each
/// insertion removes the triangles whose circumcircle contains the point and
/// re-triangulates the hole boundary against the new point. Triangles still
/// referencing a super-triangle vertex are discarded at the end, and the
/// survivors are converted into the flat `(triangles, halfedges)` arrays.
///
/// Fewer than 3 points — or a set whose every triangle is degenerate, such
/// as all-collinear input — yields an empty triangulation, not an error.
/// Duplicate points are tolerated; the duplicates simply do not appear in
/// any triangle.
///
/// # Panics
///
/// Panics if the working triangle set produces the same directed edge twice,
/// which indicates a corrupted (non-planar) intermediate state and would
/// otherwise surface as an inconsistent mesh downstream.
pub fn triangulate(points: &[DVec2]) -> Triangulation {
    let n = points.len();
    if n < 3 {
        return Triangulation::default();
    }

    // Insertion in x-sorted order improves the average bad-triangle scan;
    // ties broken by y then index for determinism.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| {
        let (p, q) = (points[i], points[j]);
        p.x.total_cmp(&q.x)
            .then(p.y.total_cmp(&q.y))
            .then(i.cmp(&j))
    });

    // Super-triangle enclosing everything by a wide margin. Its vertices use
    // scratch indices n..n+3.
    let mut min = points[0];
    let mut max = points[0];
    for &p in points.iter().skip(1) {
        min = min.min(p);
        max = max.max(p);
    }
    let center = (min + max) * 0.5;
    let reach = (max - min).length().max(1.0) * 20.0;
    let super_points = [
        center + DVec2::new(-reach, -reach),
        center + DVec2::new(reach, -reach),
        center + DVec2::new(0.0, reach),
    ];
    debug_assert!(orient2d(super_points[0], super_points[1], super_points[2]) > 0.0);

    let position = |index: usize| -> DVec2 {
        if index < n {
            points[index]
        } else {
            super_points[index - n]
        }
    };

    // Working triangle list; triangles stay counter-clockwise throughout.
    let mut triangles: Vec<[usize; 3]> = vec![[n, n + 1, n + 2]];
    let mut bad: Vec<usize> = Vec::new();
    let mut hole: Vec<(usize, usize)> = Vec::new();
    let mut edge_counts: HashMap<(usize, usize), u32> = HashMap::new();

    for &point_index in &order {
        let p = points[point_index];

        // Every triangle whose circumcircle contains the point is removed.
        bad.clear();
        for (t, tri) in triangles.iter().enumerate() {
            if in_circumcircle(position(tri[0]), position(tri[1]), position(tri[2]), p) {
                bad.push(t);
            }
        }
        if bad.is_empty() {
            // Duplicate or cocircular-degenerate point; tolerated, skipped.
            continue;
        }

        // Hole boundary: directed edges of bad triangles whose undirected
        // edge is not shared with another bad triangle.
        edge_counts.clear();
        for &t in &bad {
            let tri = triangles[t];
            for k in 0..3 {
                let a = tri[k];
                let b = tri[(k + 1) % 3];
                let key = if a < b { (a, b) } else { (b, a) };
                *edge_counts.entry(key).or_insert(0) += 1;
            }
        }
        hole.clear();
        for &t in &bad {
            let tri = triangles[t];
            for k in 0..3 {
                let a = tri[k];
                let b = tri[(k + 1) % 3];
                let key = if a < b { (a, b) } else { (b, a) };
                if edge_counts[&key] == 1 {
                    hole.push((a, b));
                }
            }
        }

        // Remove bad triangles (descending so swap_remove keeps indices
        // valid), then fan the hole boundary to the new point. The boundary
        // edges keep their counter-clockwise direction, so each new triangle
        // is counter-clockwise as well.
        for &t in bad.iter().rev() {
            triangles.swap_remove(t);
        }
        for &(a, b) in &hole {
            triangles.push([a, b, point_index]);
        }
    }

    // Drop everything still attached to the super-triangle scratch vertices.
    triangles.retain(|tri| tri.iter().all(|&v| v < n));

    build_halfedges(&triangles)
}

/// Convert a triangle list into the flat `(triangles, halfedges)` arrays
///
/// Opposite sides are resolved through a map keyed by the directed vertex
/// pair: side `s = (a -> b)` pairs with the unique side `(b -> a)`, or
/// [`EMPTY`] when none exists (a true boundary edge).
fn build_halfedges(triangle_list: &[[usize; 3]]) -> Triangulation {
    let side_count = triangle_list.len() * 3;
    let mut triangles = Vec::with_capacity(side_count);
    let mut halfedges = vec![EMPTY; side_count];

    let mut edge_to_side: HashMap<(usize, usize), usize> = HashMap::with_capacity(side_count);
    for (t, tri) in triangle_list.iter().enumerate() {
        for k in 0..3 {
            let side = t * 3 + k;
            let a = tri[k];
            let b = tri[(k + 1) % 3];
            triangles.push(a);
            if let Some(&previous) = edge_to_side.get(&(a, b)) {
                panic!(
                    "duplicate directed edge {}->{} at sides {} and {}: corrupted triangulation",
                    a, b, previous, side
                );
            }
            edge_to_side.insert((a, b), side);
            if let Some(&opposite) = edge_to_side.get(&(b, a)) {
                halfedges[side] = opposite;
                halfedges[opposite] = side;
            }
        }
    }

    Triangulation {
        triangles,
        halfedges,
    }
}
