//! IslandMap main structure
//!
//! Runs the full generation pipeline — boundary frame, Poisson-disc
//! sampling, Delaunay triangulation, ghost-closed dual mesh, Voronoi
//! extraction, shaping — and exposes the finished, immutable map.

use std::time::Instant;

use crate::config::MapConfig;
use crate::error::{MapgenError, Result};
use crate::geometry::Rect;
use crate::mesh::{extract_regions, DualMesh};
use crate::region::MapRegion;
use crate::sampling::sample_island_points;
use crate::shaper::{IslandShaper, RegionAttributes, RegionShaper};
use crate::triangulation::triangulate;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;
#[cfg(feature = "spatial-index")]
use glam::DVec2;

/// A complete generated island map
///
/// Generic over the region attribute type `T` for maximum flexibility. The
/// map stores the closed dual mesh plus one attributed region per sampled
/// point, all immutable after generation: a new seed or parameter means a
/// full regeneration, never partial invalidation.
///
/// Generation is synchronous and pure; it is safe to run on a background
/// thread and hand the finished map over in one swap.
///
/// # Consumer contract
///
/// Regions with `id < exterior_count()` sit outside the domain (sampling
/// padding) and regions flagged `boundary` have partly synthetic polygons;
/// neither must be rendered or sampled as terrain. Likewise, mesh indices
/// at or above the mesh's `solid_*` counts are ghost elements and carry no
/// geometry.
///
/// # Examples
///
/// ```
/// use island_mapgen::*;
///
/// let config = MapConfigBuilder::new()
///     .seed(42)
///     .map_size(MapSize::Tiny)
///     .build()
///     .unwrap();
///
/// let map = IslandMap::generate(config).unwrap();
/// println!("Generated {} regions", map.region_count());
///
/// if let Some(region) = map.region(0) {
///     println!("Region 0 biome: {:?}", region.attributes.biome);
/// }
/// ```
#[derive(Clone)]
pub struct IslandMap<T> {
    /// Configuration used to generate this map
    config: MapConfig,

    /// The closed half-edge mesh underlying all regions
    mesh: DualMesh,

    /// All map regions (indexed by region ID = point index)
    regions: Vec<MapRegion<T>>,

    /// Number of exterior padding regions (IDs below this are not terrain)
    exterior_count: usize,

    /// Spatial index over region sites (optional, requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl IslandMap<RegionAttributes> {
    /// Generate a map with the default island shaper
    ///
    /// This is the most common way to create a map: the built-in
    /// [`IslandShaper`] assigns elevation, biomes and rivers, seeded from
    /// `config.shaper_seed`.
    pub fn generate(config: MapConfig) -> Result<Self> {
        let shaper = IslandShaper::new(config.shaper_seed);
        Self::generate_with_shaper(config, &shaper)
    }
}

impl<T: Clone> IslandMap<T> {
    /// Generate a map with a custom region shaper
    ///
    /// This allows custom attribute types and shaping logic — for example
    /// an elevation source based on a noise field instead of the mesh
    /// heuristics. The shaper is invoked once with the completed mesh and
    /// all raw regions.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration fails validation, and
    /// `GenerationFailed` if fewer than 3 usable points survive sampling
    /// or the triangulation comes out empty (degenerate input).
    pub fn generate_with_shaper<S>(config: MapConfig, shaper: &S) -> Result<Self>
    where
        S: RegionShaper<Output = T>,
    {
        config.validate()?;
        let total_start = Instant::now();
        let bounds = config.bounds();

        let stage_start = Instant::now();
        let sampled = sample_island_points(&config)?;
        eprintln!(
            "[mapgen] Sampled {} points ({} fixed, {} exterior) in {:?}",
            sampled.len(),
            sampled.fixed_count,
            sampled.exterior_count,
            stage_start.elapsed()
        );
        if sampled.len() < 3 {
            return Err(MapgenError::GenerationFailed(format!(
                "only {} usable points after sampling",
                sampled.len()
            )));
        }

        let stage_start = Instant::now();
        let triangulation = triangulate(&sampled.points);
        eprintln!(
            "[mapgen] Triangulated {} triangles in {:?}",
            triangulation.triangle_count(),
            stage_start.elapsed()
        );
        if triangulation.is_empty() {
            return Err(MapgenError::GenerationFailed(
                "triangulation is empty (degenerate point set)".to_string(),
            ));
        }

        let stage_start = Instant::now();
        let mesh = DualMesh::from_triangulation(&sampled.points, &triangulation);
        let raw_regions = extract_regions(&mesh);
        eprintln!(
            "[mapgen] Built dual mesh: {} solid / {} total triangles, {} regions in {:?}",
            mesh.solid_triangle_count(),
            mesh.triangle_count(),
            raw_regions.len(),
            stage_start.elapsed()
        );

        let stage_start = Instant::now();
        let attributes = shaper.shape(&mesh, &raw_regions, sampled.exterior_count, &bounds);
        debug_assert_eq!(attributes.len(), raw_regions.len());
        eprintln!("[mapgen] Shaped regions in {:?}", stage_start.elapsed());

        let regions: Vec<MapRegion<T>> = raw_regions
            .into_iter()
            .zip(attributes)
            .map(|(raw, attrs)| {
                MapRegion::new(
                    raw.id,
                    raw.site,
                    attrs,
                    raw.neighbors,
                    raw.polygon,
                    raw.boundary,
                )
            })
            .collect();

        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let sites: Vec<DVec2> = regions.iter().map(|r| r.site).collect();
            SpatialIndex::new(&sites)
        };

        eprintln!(
            "[mapgen] Finished: {} regions in {:?}",
            regions.len(),
            total_start.elapsed()
        );

        Ok(Self {
            config,
            mesh,
            regions,
            exterior_count: sampled.exterior_count,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Get the configuration used to generate this map
    #[inline]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Get the domain rectangle
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.config.bounds()
    }

    /// Get the underlying closed dual mesh
    #[inline]
    pub fn mesh(&self) -> &DualMesh {
        &self.mesh
    }

    /// Get the number of regions on this map
    #[inline]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Number of exterior padding regions
    ///
    /// Region IDs below this count lie outside the domain and exist only
    /// to pad the triangulation.
    #[inline]
    pub fn exterior_count(&self) -> usize {
        self.exterior_count
    }

    /// True if a region is sampling padding rather than terrain
    #[inline]
    pub fn is_padding_region(&self, id: usize) -> bool {
        id < self.exterior_count
    }

    /// Get a region by ID
    ///
    /// Returns `None` if the region ID is out of bounds.
    #[inline]
    pub fn region(&self, id: usize) -> Option<&MapRegion<T>> {
        self.regions.get(id)
    }

    /// Get a region by ID, with a typed error for invalid IDs
    ///
    /// # Errors
    ///
    /// Returns `RegionNotFound` if the ID is out of bounds.
    pub fn try_region(&self, id: usize) -> Result<&MapRegion<T>> {
        self.regions.get(id).ok_or(MapgenError::RegionNotFound(id))
    }

    /// Get all regions as a slice
    #[inline]
    pub fn regions(&self) -> &[MapRegion<T>] {
        &self.regions
    }

    /// Get neighbor IDs for a region
    ///
    /// Returns an empty slice if the region ID is invalid.
    pub fn neighbors(&self, region_id: usize) -> &[usize] {
        self.regions
            .get(region_id)
            .map(|r| r.neighbors.as_slice())
            .unwrap_or(&[])
    }

    /// Find the region containing a position (requires spatial-index feature)
    ///
    /// Nearest-site lookup, which for a Voronoi tessellation is exact
    /// containment. Positions near or beyond the map edge may resolve to a
    /// padding region; check [`Self::is_padding_region`] before treating
    /// the result as terrain.
    #[cfg(feature = "spatial-index")]
    pub fn region_at(&self, position: DVec2) -> usize {
        self.spatial_index.find_nearest(position)
    }

    /// Find regions within a given hop count from a center region (BFS)
    ///
    /// Returns the IDs of all regions reachable within `hops` adjacency
    /// steps, including the center region. Returns an empty vec if
    /// `center_id` is invalid.
    pub fn regions_within_hops(&self, center_id: usize, hops: usize) -> Vec<usize> {
        if center_id >= self.regions.len() {
            return vec![];
        }

        let mut visited = std::collections::HashSet::new();
        let mut current = vec![center_id];
        visited.insert(center_id);

        for _ in 0..hops {
            let mut next = Vec::new();
            for &region_id in &current {
                for &neighbor in self.neighbors(region_id) {
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            current = next;
        }

        visited.into_iter().collect()
    }
}
