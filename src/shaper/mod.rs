//! Island shaping: elevation, biome and river assignment
//!
//! The consumer side of the mesh pipeline. A [`RegionShaper`] turns the raw
//! Voronoi regions into attributed terrain; [`IslandShaper`] is the default
//! implementation, building a seeded island: a harmonic land mask with
//! radial falloff, ocean flood fill from the map edge, coastline detection,
//! distance-from-coast elevation, and rivers descending from the interior.
//!
//! The shaping heuristics are deliberately simple compared to the mesh
//! core; alternative elevation sources (e.g. a noise-field height sampler)
//! can plug in through the [`RegionShaper`] trait without touching the
//! pipeline.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use std::f64::consts::TAU;

use crate::geometry::Rect;
use crate::mesh::{DualMesh, RawRegion};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Biome classification for island regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Biome {
    /// Open water connected to the map edge
    #[default]
    Ocean,
    /// Enclosed water
    Lake,
    /// Land bordering the ocean
    Beach,
    /// Low, open land
    Grassland,
    /// Mid-elevation land
    Forest,
    /// High interior land
    Mountain,
}

impl Biome {
    /// Check if this biome is water
    pub fn is_water(&self) -> bool {
        matches!(self, Biome::Ocean | Biome::Lake)
    }

    /// Check if this biome is walkable land
    pub fn is_land(&self) -> bool {
        !self.is_water()
    }
}

/// Terrain attributes assigned to one region
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegionAttributes {
    /// True for any water (ocean or lake)
    pub water: bool,
    /// True for water connected to the map edge
    pub ocean: bool,
    /// True for land adjacent to ocean
    pub coast: bool,
    /// Normalized elevation: 0.0 at sea level / coast, 1.0 at the highest
    /// interior region; always 0.0 for water
    pub elevation: f64,
    /// River flux through this region (0 = no river)
    pub river: u32,
    /// Biome classification derived from the other attributes
    pub biome: Biome,
}

/// Trait for assigning attributes to the extracted Voronoi regions
///
/// Implementors receive the completed mesh, the raw regions, and the count
/// of exterior padding regions (IDs below it are outside the domain and
/// must never become terrain). The output vector must have one entry per
/// raw region.
pub trait RegionShaper {
    /// The attribute type produced for each region
    type Output;

    /// Assign attributes to every region
    fn shape(
        &self,
        mesh: &DualMesh,
        regions: &[RawRegion],
        exterior_count: usize,
        bounds: &Rect,
    ) -> Vec<Self::Output>;
}

/// Default island shaper
///
/// Deterministic for a given seed. The land mask is a sum of seeded
/// sinusoidal waves (amplitude-weighted, frequencies doubling per octave)
/// biased toward land in the middle of the map and pulled down by a radial
/// falloff toward the edges, which yields one connected island shape with
/// irregular coastline. Padding and mesh-boundary regions are always water.
pub struct IslandShaper {
    /// Seed for the wave phases and river sources
    pub seed: u64,
    /// Strength of the wave noise relative to the bias (default 0.35)
    pub amplitude: f64,
    /// Constant land bias; higher values make a bigger island (default 0.3)
    pub bias: f64,
    /// Radial falloff factor pulling the edges underwater (default 1.1)
    pub falloff: f64,
    /// Number of wave octaves (default 4)
    pub octaves: usize,
    /// Number of river source regions (default 12)
    pub river_sources: usize,
    /// Elevation above which land is mountain (default 0.7)
    pub mountain_threshold: f64,
    /// Elevation above which land is forest (default 0.35)
    pub forest_threshold: f64,
}

impl Default for IslandShaper {
    fn default() -> Self {
        Self {
            seed: 0,
            amplitude: 0.35,
            bias: 0.3,
            falloff: 1.1,
            octaves: 4,
            river_sources: 12,
            mountain_threshold: 0.7,
            forest_threshold: 0.35,
        }
    }
}

impl IslandShaper {
    /// Create a new shaper with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }
}

/// One sinusoidal component of the land mask
struct Wave {
    direction: DVec2,
    frequency: f64,
    phase: f64,
    amplitude: f64,
}

impl IslandShaper {
    fn make_waves(&self, rng: &mut ChaCha8Rng) -> Vec<Wave> {
        (0..self.octaves)
            .map(|octave| {
                let angle = rng.gen::<f64>() * TAU;
                let phase = rng.gen::<f64>() * TAU;
                Wave {
                    direction: DVec2::new(angle.cos(), angle.sin()),
                    frequency: 2.5 * (1 << octave) as f64,
                    phase,
                    amplitude: 1.0 / (1 << octave) as f64,
                }
            })
            .collect()
    }

    /// Land-mask value at a site; positive means land
    ///
    /// `q` is the site in normalized coordinates (domain center at origin,
    /// shorter half-extent scaled to 1).
    fn land_value(&self, q: DVec2, waves: &[Wave]) -> f64 {
        let mut noise = 0.0;
        let mut norm = 0.0;
        for wave in waves {
            noise += wave.amplitude * (wave.direction.dot(q) * wave.frequency + wave.phase).sin();
            norm += wave.amplitude;
        }
        if norm > 0.0 {
            noise /= norm;
        }
        self.bias + self.amplitude * noise - self.falloff * q.length_squared()
    }
}

impl RegionShaper for IslandShaper {
    type Output = RegionAttributes;

    fn shape(
        &self,
        _mesh: &DualMesh,
        regions: &[RawRegion],
        exterior_count: usize,
        bounds: &Rect,
    ) -> Vec<RegionAttributes> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let waves = self.make_waves(&mut rng);

        let center = bounds.center();
        let scale = 2.0 / bounds.width.min(bounds.height);

        let mut attrs = vec![RegionAttributes::default(); regions.len()];

        // Pass 1: land mask. Padding and mesh-boundary regions are forced
        // to water so the island is always enclosed by ocean.
        for region in regions {
            let forced_water = region.id < exterior_count || region.boundary;
            let q = (region.site - center) * scale;
            attrs[region.id].water =
                forced_water || !region.site.is_finite() || self.land_value(q, &waves) <= 0.0;
        }

        // Pass 2: ocean flood fill from the padding frame through water.
        let mut queue: VecDeque<usize> = (0..exterior_count.min(regions.len())).collect();
        for &id in queue.iter() {
            attrs[id].ocean = true;
        }
        while let Some(id) = queue.pop_front() {
            for &n in &regions[id].neighbors {
                if attrs[n].water && !attrs[n].ocean {
                    attrs[n].ocean = true;
                    queue.push_back(n);
                }
            }
        }

        // Pass 3: coast = land adjacent to ocean.
        for region in regions {
            if !attrs[region.id].water {
                attrs[region.id].coast =
                    region.neighbors.iter().any(|&n| attrs[n].ocean);
            }
        }

        // Pass 4: elevation = BFS distance from the coast over land,
        // normalized to [0, 1].
        let mut depth = vec![usize::MAX; regions.len()];
        let mut queue: VecDeque<usize> = VecDeque::new();
        for region in regions {
            if attrs[region.id].coast {
                depth[region.id] = 0;
                queue.push_back(region.id);
            }
        }
        let mut max_depth = 0;
        while let Some(id) = queue.pop_front() {
            for &n in &regions[id].neighbors {
                if !attrs[n].water && depth[n] == usize::MAX {
                    depth[n] = depth[id] + 1;
                    max_depth = max_depth.max(depth[n]);
                    queue.push_back(n);
                }
            }
        }
        for region in regions {
            let id = region.id;
            // usize::MAX depth is water (or land cut off from any coast).
            attrs[id].elevation = if depth[id] == usize::MAX || max_depth == 0 {
                0.0
            } else {
                depth[id] as f64 / max_depth as f64
            };
        }

        // Pass 5: rivers descend from high interior regions to water along
        // steepest-descent neighbors, accumulating flux.
        let mut candidates: Vec<usize> = regions
            .iter()
            .map(|r| r.id)
            .filter(|&id| attrs[id].elevation >= 0.5)
            .collect();
        for _ in 0..self.river_sources {
            if candidates.is_empty() {
                break;
            }
            let pick = rng.gen_range(0..candidates.len());
            let mut current = candidates.swap_remove(pick);
            let mut guard = regions.len();
            while !attrs[current].water && guard > 0 {
                attrs[current].river += 1;
                guard -= 1;
                let next = regions[current]
                    .neighbors
                    .iter()
                    .copied()
                    .min_by(|&a, &b| {
                        attrs[a]
                            .elevation
                            .total_cmp(&attrs[b].elevation)
                            .then(a.cmp(&b))
                    });
                match next {
                    Some(n) if attrs[n].elevation <= attrs[current].elevation => current = n,
                    _ => break,
                }
            }
        }

        // Pass 6: biome classification.
        for region in regions {
            let a = &mut attrs[region.id];
            a.biome = if a.ocean {
                Biome::Ocean
            } else if a.water {
                Biome::Lake
            } else if a.coast {
                Biome::Beach
            } else if a.elevation > self.mountain_threshold {
                Biome::Mountain
            } else if a.elevation > self.forest_threshold {
                Biome::Forest
            } else {
                Biome::Grassland
            };
        }

        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MapConfigBuilder, MapSize};
    use crate::mesh::{extract_regions, DualMesh};
    use crate::sampling::sample_island_points;
    use crate::triangulation::triangulate;

    struct Shaped {
        regions: Vec<RawRegion>,
        attrs: Vec<RegionAttributes>,
        exterior_count: usize,
    }

    fn shape_map(seed: u64) -> Shaped {
        let config = MapConfigBuilder::new()
            .seed(seed)
            .map_size(MapSize::Tiny)
            .spacing(10.0)
            .unwrap()
            .build()
            .unwrap();
        let sampled = sample_island_points(&config).unwrap();
        let triangulation = triangulate(&sampled.points);
        let mesh = DualMesh::from_triangulation(&sampled.points, &triangulation);
        let regions = extract_regions(&mesh);
        let shaper = IslandShaper::new(seed);
        let attrs = shaper.shape(&mesh, &regions, sampled.exterior_count, &config.bounds());
        Shaped {
            regions,
            attrs,
            exterior_count: sampled.exterior_count,
        }
    }

    #[test]
    fn test_one_attribute_per_region() {
        let shaped = shape_map(42);
        assert_eq!(shaped.attrs.len(), shaped.regions.len());
    }

    #[test]
    fn test_padding_regions_are_ocean() {
        let shaped = shape_map(42);
        for id in 0..shaped.exterior_count {
            assert!(shaped.attrs[id].water, "padding region {} not water", id);
            assert!(shaped.attrs[id].ocean, "padding region {} not ocean", id);
        }
    }

    #[test]
    fn test_boundary_regions_are_water() {
        let shaped = shape_map(42);
        for region in &shaped.regions {
            if region.boundary {
                assert!(shaped.attrs[region.id].water);
            }
        }
    }

    #[test]
    fn test_island_has_land_and_ocean() {
        let shaped = shape_map(42);
        let land = shaped.attrs.iter().filter(|a| !a.water).count();
        let ocean = shaped.attrs.iter().filter(|a| a.ocean).count();
        assert!(land > 0, "island should have some land");
        assert!(ocean > 0, "island should have some ocean");
    }

    #[test]
    fn test_coast_is_land_next_to_ocean() {
        let shaped = shape_map(42);
        for region in &shaped.regions {
            let a = shaped.attrs[region.id];
            if a.coast {
                assert!(!a.water);
                assert!(region.neighbors.iter().any(|&n| shaped.attrs[n].ocean));
            }
        }
    }

    #[test]
    fn test_elevation_zero_on_water_normalized_on_land() {
        let shaped = shape_map(42);
        for a in &shaped.attrs {
            if a.water {
                assert_eq!(a.elevation, 0.0);
            } else {
                assert!((0.0..=1.0).contains(&a.elevation));
            }
        }
    }

    #[test]
    fn test_rivers_touch_only_land() {
        let shaped = shape_map(42);
        for a in &shaped.attrs {
            if a.river > 0 {
                assert!(!a.water, "river flux recorded on water");
            }
        }
    }

    #[test]
    fn test_biome_consistency() {
        let shaped = shape_map(42);
        for a in &shaped.attrs {
            match a.biome {
                Biome::Ocean => assert!(a.ocean),
                Biome::Lake => assert!(a.water && !a.ocean),
                Biome::Beach => assert!(a.coast),
                Biome::Grassland | Biome::Forest | Biome::Mountain => assert!(!a.water),
            }
            assert_eq!(a.biome.is_water(), a.water);
        }
    }

    #[test]
    fn test_determinism() {
        let a = shape_map(7);
        let b = shape_map(7);
        assert_eq!(a.attrs, b.attrs);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = shape_map(1);
        let b = shape_map(2);
        assert_ne!(a.attrs, b.attrs);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_attributes_serialization() {
        let attrs = RegionAttributes {
            water: false,
            ocean: false,
            coast: true,
            elevation: 0.25,
            river: 2,
            biome: Biome::Beach,
        };
        let json = serde_json::to_string(&attrs).unwrap();
        let restored: RegionAttributes = serde_json::from_str(&json).unwrap();
        assert_eq!(attrs, restored);
    }

    #[test]
    fn test_biome_helpers() {
        assert!(Biome::Ocean.is_water());
        assert!(Biome::Lake.is_water());
        assert!(Biome::Beach.is_land());
        assert!(Biome::Grassland.is_land());
        assert!(Biome::Forest.is_land());
        assert!(Biome::Mountain.is_land());
    }
}
