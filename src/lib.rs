//! Dual-mesh island map generation
//!
//! A standalone library for turning a rectangular domain into a
//! topologically consistent planar dual graph — Delaunay triangulation plus
//! Voronoi regions — used as the substrate for island terrain, suitable for
//! any game engine (Bevy, Godot, etc.)
//!
//! The pipeline runs strictly one direction: boundary frame points feed a
//! Poisson-disc sampler, the sampled set is triangulated with incremental
//! Bowyer–Watson, the triangulation is wrapped into a half-edge mesh closed
//! by ghost triangles (so neighbor traversal never special-cases the map
//! edge), Voronoi cells are read off the triangle circumcenters, and a
//! shaper assigns elevation, biomes and rivers to the resulting regions.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use island_mapgen::*;
//!
//! // Generate an island
//! let config = MapConfigBuilder::new()
//!     .seed(42)
//!     .map_size(MapSize::Medium)
//!     .spacing(8.0).unwrap()
//!     .build().unwrap();
//!
//! let map = IslandMap::generate(config).unwrap();
//!
//! // Walk the regions for rendering
//! for region in map.regions() {
//!     if map.is_padding_region(region.id) {
//!         continue; // outside the domain, never terrain
//!     }
//!     println!("region {}: {:?}, {} vertices",
//!         region.id, region.attributes.biome, region.vertex_count());
//! }
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-region lookups using a KD-tree
//! - `serde`: Enables serialization support for configuration, mesh, and regions

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod sampling;
pub mod triangulation;
pub mod mesh;
pub mod region;
pub mod shaper;
pub mod map;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{MapgenError, Result};
pub use config::{MapConfig, MapConfigBuilder, MapSize};
pub use geometry::Rect;
pub use sampling::{sample_island_points, SampledPoints};
pub use triangulation::{triangulate, Triangulation, EMPTY};
pub use mesh::{extract_regions, DualMesh, RawRegion};
pub use region::MapRegion;
pub use shaper::{Biome, IslandShaper, RegionAttributes, RegionShaper};
pub use map::IslandMap;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
