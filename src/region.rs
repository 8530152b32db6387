//! Map Region Structure
//!
//! Represents an individual Voronoi region of the island map with
//! attributes, neighbors, and geometry.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{polygon_centroid, polygon_signed_area, Rect};

/// A single Voronoi region of the island map
///
/// Each region represents a discrete patch of the map with:
/// - A unique ID for identification
/// - A site point (the sampled seed) for positioning entities
/// - Attributes (generic `T`) for gameplay rules
/// - Neighbor connectivity for pathfinding
/// - A polygon for rendering the region boundary
///
/// # Design Notes
///
/// Regions are NOT serialized individually in save files. They are
/// regenerated from `MapConfig` when loading, ensuring consistency and
/// compact saves.
///
/// Regions whose ID is below the map's exterior padding count, and regions
/// flagged `boundary`, are not real terrain: their polygons include
/// synthetic points from the mesh's ghost structure and must not be
/// rendered or sampled as gameplay area.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct MapRegion<T> {
    /// Unique identifier (equals the sampled point index)
    pub id: usize,

    /// The seed point this region surrounds
    ///
    /// This is where units and buildings are positioned when placed in
    /// this region.
    pub site: DVec2,

    /// Attributes of this region (elevation, biome, rivers...)
    pub attributes: T,

    /// IDs of adjacent regions (share a Voronoi edge)
    ///
    /// In ring order around the site. Used for pathfinding, territory
    /// expansion, and flood-fill algorithms.
    pub neighbors: Vec<usize>,

    /// Polygon vertices in counter-clockwise order (Delaunay triangle
    /// circumcenters; synthetic outward points on boundary regions)
    pub polygon: Vec<DVec2>,

    /// True when the region touches the mesh boundary
    pub boundary: bool,
}

impl<T> MapRegion<T> {
    /// Create a new map region
    ///
    /// This is typically called during map generation, not by user code.
    pub fn new(
        id: usize,
        site: DVec2,
        attributes: T,
        neighbors: Vec<usize>,
        polygon: Vec<DVec2>,
        boundary: bool,
    ) -> Self {
        Self {
            id,
            site,
            attributes,
            neighbors,
            polygon,
            boundary,
        }
    }

    /// Get the number of neighboring regions
    ///
    /// Typically 5-7 thanks to the blue-noise point distribution.
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Check if this region is adjacent to another region
    #[inline]
    pub fn is_neighbor_of(&self, other_region_id: usize) -> bool {
        self.neighbors.contains(&other_region_id)
    }

    /// Get the polygon vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.polygon.len()
    }

    /// Area of the region polygon (shoelace formula)
    ///
    /// Positive for the counter-clockwise polygons this crate produces;
    /// zero for degenerate (empty) regions.
    pub fn area(&self) -> f64 {
        polygon_signed_area(&self.polygon)
    }

    /// Area-weighted centroid of the region polygon
    ///
    /// Usually close to but not identical to the site (blue-noise sites
    /// are not perfectly centered in their cells).
    pub fn centroid(&self) -> DVec2 {
        polygon_centroid(&self.polygon)
    }

    /// Euclidean distance between this region's site and another's
    pub fn distance_to(&self, other: &MapRegion<T>) -> f64 {
        (self.site - other.site).length()
    }

    /// The region polygon clipped to the domain rectangle
    ///
    /// Boundary regions include synthetic ghost-derived vertices outside
    /// the domain; this clamps every vertex into `bounds` for consumers
    /// that want a bounded polygon. Interior regions are unaffected.
    pub fn polygon_clipped(&self, bounds: &Rect) -> Vec<DVec2> {
        self.polygon
            .iter()
            .map(|&p| bounds.clamp_point(p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_creation() {
        let region = MapRegion::new(
            0,
            DVec2::new(5.0, 5.0),
            "grassland",
            vec![1, 2, 3],
            vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(10.0, 0.0),
                DVec2::new(5.0, 10.0),
            ],
            false,
        );

        assert_eq!(region.id, 0);
        assert_eq!(region.neighbor_count(), 3);
        assert_eq!(region.vertex_count(), 3);
        assert!(region.is_neighbor_of(1));
        assert!(!region.is_neighbor_of(99));
        assert!(!region.boundary);
    }

    #[test]
    fn test_area() {
        let region = MapRegion::new(
            0,
            DVec2::new(1.0, 1.0),
            (),
            vec![],
            vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(2.0, 0.0),
                DVec2::new(2.0, 2.0),
                DVec2::new(0.0, 2.0),
            ],
            false,
        );
        assert!((region.area() - 4.0).abs() < 1e-12);

        let empty: MapRegion<()> =
            MapRegion::new(1, DVec2::ZERO, (), vec![], vec![], false);
        assert_eq!(empty.area(), 0.0);
    }

    #[test]
    fn test_centroid() {
        let region = MapRegion::new(
            0,
            DVec2::new(1.1, 0.9),
            (),
            vec![],
            vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(2.0, 0.0),
                DVec2::new(2.0, 2.0),
                DVec2::new(0.0, 2.0),
            ],
            false,
        );
        assert!((region.centroid() - DVec2::new(1.0, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_distance_to() {
        let a = MapRegion::new(0, DVec2::new(0.0, 0.0), (), vec![], vec![], false);
        let b = MapRegion::new(1, DVec2::new(3.0, 4.0), (), vec![], vec![], false);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_polygon_clipped() {
        let bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        let region = MapRegion::new(
            0,
            DVec2::new(1.0, 1.0),
            (),
            vec![],
            vec![
                DVec2::new(-5.0, 5.0), // outside, clamps to x = 0
                DVec2::new(5.0, 5.0),  // inside, unchanged
                DVec2::new(5.0, 15.0), // outside, clamps to y = 10
            ],
            true,
        );
        let clipped = region.polygon_clipped(&bounds);
        assert_eq!(clipped[0], DVec2::new(0.0, 5.0));
        assert_eq!(clipped[1], DVec2::new(5.0, 5.0));
        assert_eq!(clipped[2], DVec2::new(5.0, 10.0));
    }
}
