//! Voronoi region extraction from the dual mesh
//!
//! Derives, for every solid point, its Voronoi cell polygon from the
//! centers of incident triangles, plus the neighbor list in ring order.
//!
//! Boundary cells include the synthetic ghost-triangle centers: those
//! outward offset points are finite and close the polygon, and the region's
//! `boundary` flag marks the cell so consumers can treat it differently
//! (or clip it to the domain via `MapRegion::polygon_clipped`).

use glam::DVec2;

use crate::geometry::polygon_signed_area;
use crate::mesh::DualMesh;

/// A Voronoi cell without attributes (geometry and adjacency only)
///
/// Intermediate representation produced by [`extract_regions`]; the island
/// shaper turns these into full map regions.
#[derive(Debug, Clone)]
pub struct RawRegion {
    /// Region identifier (equals the point index)
    pub id: usize,
    /// The seed point this cell surrounds
    pub site: DVec2,
    /// Cell polygon: incident triangle centers in counter-clockwise order.
    /// Empty for points with no incident triangle.
    pub polygon: Vec<DVec2>,
    /// Neighboring solid region IDs in ring order
    pub neighbors: Vec<usize>,
    /// True when the cell touches the mesh boundary (its ring includes a
    /// ghost triangle, so part of the polygon is synthetic)
    pub boundary: bool,
}

/// Extract the Voronoi cell of every solid point
///
/// For each point, rotates around its half-edge ring collecting incident
/// triangle centers; the resulting polygon is put into counter-clockwise
/// order so consumers can rely on standard fill winding. Ghost neighbors
/// are omitted from the neighbor list; ghost triangle centers are kept in
/// the polygon (see module docs).
pub fn extract_regions(mesh: &DualMesh) -> Vec<RawRegion> {
    (0..mesh.solid_point_count())
        .map(|p| {
            let ring = mesh.sides_around_point(p);
            let mut polygon = Vec::with_capacity(ring.len());
            let mut neighbors = Vec::with_capacity(ring.len());
            let mut boundary = false;

            for &s in &ring {
                let t = mesh.side_triangle(s);
                polygon.push(mesh.triangle_center(t));
                if mesh.is_ghost_triangle(t) {
                    boundary = true;
                }
                let q = mesh.side_end(s);
                if !mesh.is_ghost_point(q) {
                    neighbors.push(q);
                }
            }

            // Ring rotation order depends on the halfedge layout; normalize
            // to counter-clockwise so winding is consistent everywhere.
            if polygon_signed_area(&polygon) < 0.0 {
                polygon.reverse();
                neighbors.reverse();
            }

            RawRegion {
                id: p,
                site: mesh.point(p),
                polygon,
                neighbors,
                boundary,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{polygon_signed_area, Rect};
    use crate::sampling::sample_poisson;
    use crate::triangulation::triangulate;

    fn build_mesh(points: &[DVec2]) -> DualMesh {
        DualMesh::from_triangulation(points, &triangulate(points))
    }

    #[test]
    fn test_hexagon_center_region() {
        // One interior point surrounded by 6 others in a
        // regular hexagon produces a convex 6-gon Voronoi cell centered on
        // the point.
        let mut points = vec![DVec2::ZERO];
        for k in 0..6 {
            let angle = k as f64 * std::f64::consts::TAU / 6.0;
            points.push(DVec2::new(angle.cos(), angle.sin()) * 10.0);
        }
        let mesh = build_mesh(&points);
        let regions = extract_regions(&mesh);

        let center = &regions[0];
        assert!(!center.boundary, "interior point must not be boundary");
        assert_eq!(center.polygon.len(), 6);
        assert_eq!(center.neighbors.len(), 6);

        // Convex and counter-clockwise
        assert!(polygon_signed_area(&center.polygon) > 0.0);
        for i in 0..6 {
            let a = center.polygon[i];
            let b = center.polygon[(i + 1) % 6];
            let c = center.polygon[(i + 2) % 6];
            let cross = (b - a).perp_dot(c - b);
            assert!(cross > 0.0, "polygon not convex at vertex {}", i);
        }

        // Centered on the seed point
        let centroid: DVec2 = center.polygon.iter().copied().sum::<DVec2>() / 6.0;
        assert!(centroid.length() < 1e-9);
    }

    #[test]
    fn test_one_region_per_solid_point() {
        let points =
            sample_poisson(Rect::new(0.0, 0.0, 100.0, 100.0), 10.0, 30, 42, &[]).unwrap();
        let mesh = build_mesh(&points);
        let regions = extract_regions(&mesh);
        assert_eq!(regions.len(), mesh.solid_point_count());
        for (i, region) in regions.iter().enumerate() {
            assert_eq!(region.id, i);
            assert_eq!(region.site, points[i]);
        }
    }

    #[test]
    fn test_polygons_closed_and_ccw() {
        let points =
            sample_poisson(Rect::new(0.0, 0.0, 100.0, 100.0), 10.0, 30, 99, &[]).unwrap();
        let mesh = build_mesh(&points);
        for region in extract_regions(&mesh) {
            assert!(
                region.polygon.len() >= 3,
                "region {} polygon has {} points",
                region.id,
                region.polygon.len()
            );
            assert!(
                polygon_signed_area(&region.polygon) > 0.0,
                "region {} polygon not counter-clockwise",
                region.id
            );
            for p in &region.polygon {
                assert!(p.is_finite());
            }
        }
    }

    #[test]
    fn test_interior_polygons_simple() {
        // Non-boundary cells must be simple (no self-intersections): check
        // that no two non-adjacent edges cross.
        let points =
            sample_poisson(Rect::new(0.0, 0.0, 100.0, 100.0), 10.0, 30, 5, &[]).unwrap();
        let mesh = build_mesh(&points);
        for region in extract_regions(&mesh).iter().filter(|r| !r.boundary) {
            let n = region.polygon.len();
            for i in 0..n {
                for j in (i + 1)..n {
                    // Skip adjacent edges (they share an endpoint)
                    if j == i + 1 || (i == 0 && j == n - 1) {
                        continue;
                    }
                    let (a, b) = (region.polygon[i], region.polygon[(i + 1) % n]);
                    let (c, d) = (region.polygon[j], region.polygon[(j + 1) % n]);
                    assert!(
                        !segments_intersect(a, b, c, d),
                        "region {} self-intersects between edges {} and {}",
                        region.id,
                        i,
                        j
                    );
                }
            }
        }
    }

    #[test]
    fn test_neighbor_symmetry() {
        let points =
            sample_poisson(Rect::new(0.0, 0.0, 100.0, 100.0), 10.0, 30, 13, &[]).unwrap();
        let mesh = build_mesh(&points);
        let regions = extract_regions(&mesh);
        for region in &regions {
            for &q in &region.neighbors {
                assert!(
                    regions[q].neighbors.contains(&region.id),
                    "neighbor relation not symmetric between {} and {}",
                    region.id,
                    q
                );
            }
        }
    }

    #[test]
    fn test_boundary_flag_matches_hull() {
        let points = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(0.0, 10.0),
            DVec2::new(5.0, 5.0),
        ];
        let mesh = build_mesh(&points);
        let regions = extract_regions(&mesh);
        // The four corners are hull points, the center is interior.
        for region in &regions[..4] {
            assert!(region.boundary, "hull region {} not flagged", region.id);
        }
        assert!(!regions[4].boundary);
    }

    fn segments_intersect(a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> bool {
        let o1 = (b - a).perp_dot(c - a);
        let o2 = (b - a).perp_dot(d - a);
        let o3 = (d - c).perp_dot(a - c);
        let o4 = (d - c).perp_dot(b - c);
        (o1 * o2 < 0.0) && (o3 * o4 < 0.0)
    }
}
