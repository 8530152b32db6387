//! Spatial indexing for fast position-to-region lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use glam::DVec2;
#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

/// Wrapper around a KD-tree for spatial queries
///
/// Provides O(log n) nearest-neighbor lookups to convert 2D positions into
/// region IDs. This is essential for click handling, unit placement, and
/// position queries.
///
/// # Performance
///
/// - Construction: O(n log n), once per generation
/// - Query: O(log n), extremely fast even for large maps
/// - Memory: ~24 bytes per region
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f64, usize, 2, 32>,
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build spatial index from region sites
    ///
    /// Creates an immutable KD-tree from the provided site positions.
    /// This is called once during map generation.
    ///
    /// # Example
    ///
    /// ```
    /// use island_mapgen::*;
    /// use glam::DVec2;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let sites = vec![
    ///     DVec2::new(10.0, 10.0),
    ///     DVec2::new(90.0, 10.0),
    ///     DVec2::new(50.0, 90.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&sites);
    /// let region_id = index.find_nearest(DVec2::new(12.0, 11.0));
    /// assert_eq!(region_id, 0); // closest to the first site
    /// # }
    /// ```
    pub fn new(sites: &[DVec2]) -> Self {
        let points: Vec<[f64; 2]> = sites.iter().map(|s| [s.x, s.y]).collect();
        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        }
    }

    /// Find the region whose site is nearest to a position
    ///
    /// Nearest-site lookup is exact region containment for a Voronoi
    /// diagram: a point belongs to the region of its closest site.
    pub fn find_nearest(&self, position: DVec2) -> usize {
        let query = [position.x, position.y];
        let result = self.tree.nearest_one::<SquaredEuclidean>(&query);
        result.item as usize
    }
}
