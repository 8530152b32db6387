//! Half-edge dual mesh with a closed ghost boundary
//!
//! Wraps a raw [`Triangulation`] into an index-based half-edge structure and
//! extends it with "ghost" elements so the mesh becomes a closed
//! combinatorial surface: one synthetic ghost vertex plus one ghost triangle
//! per boundary edge. After the extension every side has a defined opposite,
//! so circular neighbor traversal (the operation Voronoi extraction and all
//! adjacency queries depend on) never special-cases the mesh edge.
//!
//! Everything is a plain integer index into flat arrays — no pointer graph,
//! no reference cycles. A side `s` belongs to triangle `s / 3`; the other
//! two sides of the same triangle are reached by [`next_side`] /
//! [`prev_side`] index arithmetic within the triple.

mod regions;

pub use regions::{extract_regions, RawRegion};

use glam::DVec2;
use std::collections::HashMap;

use crate::geometry::circumcenter;
use crate::triangulation::{Triangulation, EMPTY};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Next side within the same triangle (rotates the triple)
#[inline]
pub const fn next_side(s: usize) -> usize {
    if s % 3 == 2 {
        s - 2
    } else {
        s + 1
    }
}

/// Previous side within the same triangle
#[inline]
pub const fn prev_side(s: usize) -> usize {
    if s % 3 == 0 {
        s + 2
    } else {
        s - 1
    }
}

/// A closed half-edge mesh over a 2D point set
///
/// Built once from a triangulation; immutable afterwards. Solid elements
/// (indices below the respective `solid_*` counts) are real geometry; ghost
/// elements exist only to close the boundary and must never be treated as
/// terrain by consumers.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct DualMesh {
    /// Point coordinates; the last entry is the ghost point (NaN)
    points: Vec<DVec2>,
    /// Begin vertex of each side, ghost triangles appended
    triangles: Vec<usize>,
    /// Opposite side of each side; no `EMPTY` entries remain
    halfedges: Vec<usize>,
    /// Per-triangle center: circumcenter for solid triangles (centroid
    /// fallback when degenerate), outward offset point for ghost triangles
    centers: Vec<DVec2>,
    /// One outgoing side per point, `EMPTY` for points in no triangle
    point_side: Vec<usize>,
    /// Sides belonging to real (non-ghost) triangles
    solid_side_count: usize,
    /// Real triangles
    solid_triangle_count: usize,
    /// Real points (the ghost point index equals this count)
    solid_point_count: usize,
}

impl DualMesh {
    /// Build the closed mesh from a triangulation and its point list
    ///
    /// Appends the ghost point and one ghost triangle per unpaired side,
    /// wires all opposites into a single cycle around the ghost vertex, and
    /// computes per-triangle centers.
    ///
    /// # Panics
    ///
    /// Panics when an unpaired side's ghost opposite cannot be resolved,
    /// which means the input was not a consistent planar triangulation
    /// (e.g. a corrupted halfedge table). This is a programming-contract
    /// violation, not a recoverable error: all downstream consumers assume
    /// the closed-mesh invariants hold unconditionally.
    pub fn from_triangulation(points: &[DVec2], triangulation: &Triangulation) -> Self {
        let solid_side_count = triangulation.triangles.len();
        let solid_triangle_count = solid_side_count / 3;
        let solid_point_count = points.len();

        let mut mesh_points = points.to_vec();
        let ghost_point = mesh_points.len();
        mesh_points.push(DVec2::NAN);

        let mut triangles = triangulation.triangles.clone();
        let mut halfedges = triangulation.halfedges.clone();

        // Boundary sides in index order, so construction is deterministic.
        let boundary: Vec<usize> = (0..solid_side_count)
            .filter(|&s| halfedges[s] == EMPTY)
            .collect();

        let ghost_triangle_count = boundary.len();
        triangles.reserve(ghost_triangle_count * 3);
        halfedges.resize(solid_side_count + ghost_triangle_count * 3, EMPTY);

        // For boundary side s = (a -> b), its ghost triangle is (b, a, ghost):
        //   base + 0: b -> a      (opposite of s)
        //   base + 1: a -> ghost
        //   base + 2: ghost -> b
        // The (x -> ghost) side of one ghost triangle pairs with the
        // (ghost -> x) side of the ghost triangle whose boundary edge ends
        // at x, forming one cycle around the ghost vertex that visits every
        // boundary edge exactly once.
        let mut base_of_end: HashMap<usize, usize> = HashMap::with_capacity(ghost_triangle_count);
        for (k, &s) in boundary.iter().enumerate() {
            let base = solid_side_count + 3 * k;
            let a = triangulation.triangles[s];
            let b = triangulation.triangles[next_side(s)];
            triangles.push(b);
            triangles.push(a);
            triangles.push(ghost_point);
            halfedges[base] = s;
            halfedges[s] = base;
            base_of_end.insert(b, base);
        }
        for (k, &s) in boundary.iter().enumerate() {
            let base = solid_side_count + 3 * k;
            let a = triangulation.triangles[s];
            let incoming_base = *base_of_end.get(&a).unwrap_or_else(|| {
                panic!(
                    "ghost opposite unresolved for boundary side {} (vertex {})",
                    s, a
                )
            });
            halfedges[base + 1] = incoming_base + 2;
            halfedges[incoming_base + 2] = base + 1;
        }

        // Triangle centers, computed once.
        let triangle_count = triangles.len() / 3;
        let mut centers = Vec::with_capacity(triangle_count);
        for t in 0..solid_triangle_count {
            let a = mesh_points[triangles[3 * t]];
            let b = mesh_points[triangles[3 * t + 1]];
            let c = mesh_points[triangles[3 * t + 2]];
            centers.push(circumcenter(a, b, c));
        }
        for &s in &boundary {
            // Ghost center: a finite synthetic point pushed outward from the
            // boundary edge midpoint, perpendicular to the edge. Solid hull
            // edges run counter-clockwise, so outward is to their right.
            let a = mesh_points[triangulation.triangles[s]];
            let b = mesh_points[triangulation.triangles[next_side(s)]];
            let mid = (a + b) * 0.5;
            let edge = b - a;
            let len = edge.length();
            let center = if len > 0.0 {
                mid + DVec2::new(edge.y, -edge.x) / len * (len * 0.5)
            } else {
                mid
            };
            centers.push(center);
        }

        // First outgoing side per point.
        let mut point_side = vec![EMPTY; mesh_points.len()];
        for (s, &v) in triangles.iter().enumerate() {
            if point_side[v] == EMPTY {
                point_side[v] = s;
            }
        }

        Self {
            points: mesh_points,
            triangles,
            halfedges,
            centers,
            point_side,
            solid_side_count,
            solid_triangle_count,
            solid_point_count,
        }
    }

    // === Counts and classification ===

    /// Total number of sides, ghost sides included
    #[inline]
    pub fn side_count(&self) -> usize {
        self.triangles.len()
    }

    /// Total number of triangles, ghost triangles included
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Total number of points, the ghost point included
    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of sides belonging to real triangles
    #[inline]
    pub fn solid_side_count(&self) -> usize {
        self.solid_side_count
    }

    /// Number of real triangles
    #[inline]
    pub fn solid_triangle_count(&self) -> usize {
        self.solid_triangle_count
    }

    /// Number of real points
    #[inline]
    pub fn solid_point_count(&self) -> usize {
        self.solid_point_count
    }

    /// Index of the synthetic ghost point
    #[inline]
    pub fn ghost_point(&self) -> usize {
        self.solid_point_count
    }

    /// True if the side belongs to a ghost triangle
    #[inline]
    pub fn is_ghost_side(&self, s: usize) -> bool {
        s >= self.solid_side_count
    }

    /// True if the triangle is a ghost triangle
    #[inline]
    pub fn is_ghost_triangle(&self, t: usize) -> bool {
        t >= self.solid_triangle_count
    }

    /// True if the point is the ghost point
    #[inline]
    pub fn is_ghost_point(&self, p: usize) -> bool {
        p >= self.solid_point_count
    }

    // === Element accessors ===

    /// Coordinates of a point (NaN for the ghost point)
    #[inline]
    pub fn point(&self, p: usize) -> DVec2 {
        self.points[p]
    }

    /// All point coordinates, ghost point last
    #[inline]
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// The flat side -> begin-vertex array (ghost entries included)
    #[inline]
    pub fn triangle_array(&self) -> &[usize] {
        &self.triangles
    }

    /// The flat side -> opposite-side array (ghost entries included)
    #[inline]
    pub fn halfedge_array(&self) -> &[usize] {
        &self.halfedges
    }

    /// Vertex a side starts from
    #[inline]
    pub fn side_begin(&self, s: usize) -> usize {
        self.triangles[s]
    }

    /// Vertex a side ends at
    #[inline]
    pub fn side_end(&self, s: usize) -> usize {
        self.triangles[next_side(s)]
    }

    /// Opposite directed side (always defined on the closed mesh)
    #[inline]
    pub fn side_opposite(&self, s: usize) -> usize {
        self.halfedges[s]
    }

    /// Triangle a side belongs to
    #[inline]
    pub fn side_triangle(&self, s: usize) -> usize {
        s / 3
    }

    /// The three sides of a triangle
    #[inline]
    pub fn triangle_sides(&self, t: usize) -> [usize; 3] {
        [3 * t, 3 * t + 1, 3 * t + 2]
    }

    /// The three vertices of a triangle
    #[inline]
    pub fn triangle_points(&self, t: usize) -> [usize; 3] {
        [
            self.triangles[3 * t],
            self.triangles[3 * t + 1],
            self.triangles[3 * t + 2],
        ]
    }

    /// Center of a triangle: circumcenter for solid triangles, the
    /// synthetic outward point for ghost triangles (finite but never
    /// semantically meaningful)
    #[inline]
    pub fn triangle_center(&self, t: usize) -> DVec2 {
        self.centers[t]
    }

    // === Ring traversal ===

    /// Ordered ring of outgoing sides around a point
    ///
    /// Rotates via opposite-then-next until returning to the start side; on
    /// the closed mesh this terminates for every point, boundary vertices
    /// included. Returns an empty ring for a point in no triangle (such as
    /// a duplicate input point dropped by the triangulator).
    pub fn sides_around_point(&self, p: usize) -> Vec<usize> {
        let start = self.point_side[p];
        if start == EMPTY {
            return Vec::new();
        }
        let mut ring = Vec::new();
        let mut s = start;
        loop {
            debug_assert_eq!(self.side_begin(s), p);
            ring.push(s);
            s = next_side(self.halfedges[s]);
            if s == start {
                break;
            }
            assert!(
                ring.len() <= self.side_count(),
                "vertex ring around point {} failed to close",
                p
            );
        }
        ring
    }

    /// Ordered ring of triangles incident to a point
    pub fn triangles_around_point(&self, p: usize) -> Vec<usize> {
        self.sides_around_point(p)
            .into_iter()
            .map(|s| self.side_triangle(s))
            .collect()
    }

    /// Ordered ring of neighboring points around a point
    pub fn points_around_point(&self, p: usize) -> Vec<usize> {
        self.sides_around_point(p)
            .into_iter()
            .map(|s| self.side_end(s))
            .collect()
    }

    // === Diagnostics ===

    /// Check the closed-mesh invariants, returning a diagnostic on failure
    ///
    /// Verifies array lengths, the absence of `EMPTY` entries, the halfedge
    /// involution, endpoint agreement between opposite sides, finite
    /// centers, and ring closure around every point. Intended for tests and
    /// debugging; construction itself already panics on inconsistent input.
    pub fn validate(&self) -> Result<(), String> {
        if self.triangles.len() != self.halfedges.len() {
            return Err(format!(
                "triangles/halfedges length mismatch: {} vs {}",
                self.triangles.len(),
                self.halfedges.len()
            ));
        }
        if self.triangles.len() % 3 != 0 {
            return Err(format!("side count {} not divisible by 3", self.triangles.len()));
        }
        for s in 0..self.side_count() {
            let h = self.halfedges[s];
            if h == EMPTY {
                return Err(format!("side {} has no opposite", s));
            }
            if h >= self.side_count() {
                return Err(format!("side {} opposite {} out of range", s, h));
            }
            if self.halfedges[h] != s {
                return Err(format!("involution broken at side {} (opposite {})", s, h));
            }
            if self.side_begin(s) != self.side_end(h) || self.side_end(s) != self.side_begin(h) {
                return Err(format!("sides {} and {} do not share an edge", s, h));
            }
        }
        for (t, center) in self.centers.iter().enumerate() {
            if !center.is_finite() {
                return Err(format!("triangle {} has a non-finite center", t));
            }
        }
        for p in 0..self.point_count() {
            let start = self.point_side[p];
            if start == EMPTY {
                continue;
            }
            let mut s = start;
            let mut steps = 0;
            loop {
                if self.side_begin(s) != p {
                    return Err(format!("ring side {} does not start at point {}", s, p));
                }
                s = next_side(self.halfedges[s]);
                steps += 1;
                if s == start {
                    break;
                }
                if steps > self.side_count() {
                    return Err(format!("ring around point {} failed to close", p));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::sampling::sample_poisson;
    use crate::triangulation::triangulate;

    fn square_mesh() -> (Vec<DVec2>, DualMesh) {
        let points = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(0.0, 10.0),
        ];
        let triangulation = triangulate(&points);
        let mesh = DualMesh::from_triangulation(&points, &triangulation);
        (points, mesh)
    }

    fn sampled_mesh(seed: u64) -> DualMesh {
        let points =
            sample_poisson(Rect::new(0.0, 0.0, 100.0, 100.0), 10.0, 30, seed, &[]).unwrap();
        let triangulation = triangulate(&points);
        DualMesh::from_triangulation(&points, &triangulation)
    }

    #[test]
    fn test_next_prev_side_arithmetic() {
        assert_eq!(next_side(0), 1);
        assert_eq!(next_side(1), 2);
        assert_eq!(next_side(2), 0);
        assert_eq!(next_side(5), 3);
        assert_eq!(prev_side(0), 2);
        assert_eq!(prev_side(3), 5);
        assert_eq!(prev_side(4), 3);
    }

    #[test]
    fn test_square_ghost_extension() {
        // The 4-point square has 4 boundary sides, so ghost
        // extension adds exactly 4 ghost triangles and leaves no EMPTY.
        let (_, mesh) = square_mesh();
        assert_eq!(mesh.solid_triangle_count(), 2);
        assert_eq!(mesh.triangle_count(), 6);
        assert_eq!(mesh.solid_side_count(), 6);
        assert_eq!(mesh.side_count(), 18);
        assert_eq!(mesh.solid_point_count(), 4);
        assert_eq!(mesh.point_count(), 5);
        assert!(mesh.halfedge_array().iter().all(|&h| h != EMPTY));
    }

    #[test]
    fn test_ghost_point_is_nan() {
        let (_, mesh) = square_mesh();
        let ghost = mesh.point(mesh.ghost_point());
        assert!(ghost.x.is_nan() && ghost.y.is_nan());
        assert!(mesh.is_ghost_point(mesh.ghost_point()));
        assert!(!mesh.is_ghost_point(0));
    }

    #[test]
    fn test_involution_after_extension() {
        let mesh = sampled_mesh(42);
        for s in 0..mesh.side_count() {
            let h = mesh.side_opposite(s);
            assert_ne!(h, EMPTY);
            assert_eq!(mesh.side_opposite(h), s, "involution broken at side {}", s);
            assert_eq!(mesh.side_begin(s), mesh.side_end(h));
        }
    }

    #[test]
    fn test_validate_passes() {
        let mesh = sampled_mesh(42);
        mesh.validate().expect("generated mesh must satisfy all invariants");
        let (_, square) = square_mesh();
        square.validate().unwrap();
    }

    #[test]
    fn test_rotation_closure_every_solid_point() {
        // Walking opposite-then-next around any solid vertex returns to the
        // start after exactly its incident-triangle count.
        let mesh = sampled_mesh(7);
        for p in 0..mesh.solid_point_count() {
            let ring = mesh.sides_around_point(p);
            assert!(!ring.is_empty(), "point {} has no ring", p);
            let triangles = mesh.triangles_around_point(p);
            assert_eq!(ring.len(), triangles.len());
            for &s in &ring {
                assert_eq!(mesh.side_begin(s), p);
            }
            // Each incident triangle appears exactly once
            let mut sorted = triangles.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), triangles.len());
        }
    }

    #[test]
    fn test_ghost_ring_visits_every_boundary_edge() {
        let (_, mesh) = square_mesh();
        let ring = mesh.triangles_around_point(mesh.ghost_point());
        // One ghost triangle per boundary edge, each visited exactly once.
        assert_eq!(ring.len(), 4);
        assert!(ring.iter().all(|&t| mesh.is_ghost_triangle(t)));
    }

    #[test]
    fn test_solid_centers_are_circumcenters() {
        let (points, mesh) = square_mesh();
        for t in 0..mesh.solid_triangle_count() {
            let [a, b, c] = mesh.triangle_points(t);
            let center = mesh.triangle_center(t);
            let ra = (center - points[a]).length();
            let rb = (center - points[b]).length();
            let rc = (center - points[c]).length();
            assert!((ra - rb).abs() < 1e-9);
            assert!((ra - rc).abs() < 1e-9);
        }
    }

    #[test]
    fn test_ghost_centers_finite_and_outside_hull() {
        let (_, mesh) = square_mesh();
        for t in mesh.solid_triangle_count()..mesh.triangle_count() {
            let center = mesh.triangle_center(t);
            assert!(center.is_finite());
            // The square itself is the hull; ghost centers sit strictly outside.
            assert!(
                !(center.x > 0.0 && center.x < 10.0 && center.y > 0.0 && center.y < 10.0),
                "ghost center {:?} inside hull",
                center
            );
        }
    }

    #[test]
    fn test_neighbors_symmetric() {
        let mesh = sampled_mesh(11);
        for p in 0..mesh.solid_point_count() {
            for &q in &mesh.points_around_point(p) {
                if mesh.is_ghost_point(q) {
                    continue;
                }
                assert!(
                    mesh.points_around_point(q).contains(&p),
                    "adjacency not symmetric between {} and {}",
                    p,
                    q
                );
            }
        }
    }

    #[test]
    fn test_duplicate_point_has_empty_ring() {
        let points = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(5.0, 8.0),
            DVec2::new(5.0, 8.0), // dropped by the triangulator
        ];
        let triangulation = triangulate(&points);
        let mesh = DualMesh::from_triangulation(&points, &triangulation);
        assert!(mesh.sides_around_point(3).is_empty());
        mesh.validate().unwrap();
    }
}
