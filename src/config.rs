//! Island Map Configuration and Builder
//!
//! This module provides configuration types for deterministic island map generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MapgenError, Result};
use crate::geometry::Rect;

/// Default number of candidate offsets per active point in the Poisson-disc
/// sampler (Bridson's recommended k).
pub const DEFAULT_SAMPLE_ATTEMPTS: u32 = 30;

/// Map size presets matching the existing game's size system
///
/// Each size maps to a specific domain rectangle; combined with the point
/// spacing this determines the region count.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapSize {
    /// Tiny map: 200x200 units (~450 regions at default spacing)
    Tiny,
    /// Small map: 400x400 units (~1,800 regions)
    Small,
    /// Medium map: 600x600 units (~4,000 regions, default)
    Medium,
    /// Large map: 1000x1000 units (~11,000 regions)
    Large,
    /// Custom domain extents in world units
    Custom {
        /// Domain width in world units
        width: f64,
        /// Domain height in world units
        height: f64,
    },
}

impl MapSize {
    /// Get the domain width for this map size
    pub fn width(self) -> f64 {
        match self {
            MapSize::Tiny => 200.0,
            MapSize::Small => 400.0,
            MapSize::Medium => 600.0,
            MapSize::Large => 1000.0,
            MapSize::Custom { width, .. } => width,
        }
    }

    /// Get the domain height for this map size
    pub fn height(self) -> f64 {
        match self {
            MapSize::Tiny => 200.0,
            MapSize::Small => 400.0,
            MapSize::Medium => 600.0,
            MapSize::Large => 1000.0,
            MapSize::Custom { height, .. } => height,
        }
    }

    /// Get a human-readable name for this map size
    pub fn name(self) -> &'static str {
        match self {
            MapSize::Tiny => "Tiny",
            MapSize::Small => "Small",
            MapSize::Medium => "Medium",
            MapSize::Large => "Large",
            MapSize::Custom { .. } => "Custom",
        }
    }
}

impl Default for MapSize {
    fn default() -> Self {
        MapSize::Medium
    }
}

/// Configuration for deterministic island map generation
///
/// This configuration is serializable and can be shared between client and
/// server. The same configuration always produces the identical map.
///
/// # Serialization
///
/// Only the configuration is serialized (a few dozen bytes), not the
/// generated mesh. The map is regenerated from the configuration when
/// loading a save file.
///
/// # Example
///
/// ```rust
/// use island_mapgen::*;
///
/// let config = MapConfigBuilder::new()
///     .seed(42)
///     .map_size(MapSize::Small)
///     .build()
///     .unwrap();
///
/// // Config is serializable (with "serde" feature)
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: MapConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config.seed, restored.seed);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    /// Random seed for deterministic point sampling
    ///
    /// The same seed (with same map_size and spacing) will always produce
    /// the exact same mesh with identical region positions.
    pub seed: u64,

    /// Map size preset (determines the domain rectangle)
    pub map_size: MapSize,

    /// Minimum distance between sampled points, in world units
    ///
    /// Smaller spacing produces more, finer regions. The region count grows
    /// roughly with `(width * height) / spacing^2`.
    pub spacing: f64,

    /// Candidate attempts per active point in the Poisson-disc sampler
    ///
    /// Higher values make the point set denser (more maximal) at the cost
    /// of generation time. 30 is the conventional sweet spot.
    pub sample_attempts: u32,

    /// Random seed for island shaping (separate from the sampling seed)
    ///
    /// This allows the same region layout with different land shapes.
    pub shaper_seed: u64,
}

impl MapConfig {
    /// Get the domain rectangle for this configuration (origin at 0,0)
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.map_size.width(), self.map_size.height())
    }

    /// Validate the configuration before generation
    ///
    /// Checks the invariants the pipeline depends on: finite positive
    /// spacing, a non-degenerate domain, and a spacing small enough that
    /// the boundary frame leaves room for interior samples.
    pub fn validate(&self) -> Result<()> {
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(MapgenError::InvalidConfig(format!(
                "spacing must be positive and finite (got {})",
                self.spacing
            )));
        }
        let bounds = self.bounds();
        if bounds.is_degenerate() {
            return Err(MapgenError::InvalidConfig(format!(
                "domain must have positive finite extents (got {}x{})",
                bounds.width, bounds.height
            )));
        }
        if self.spacing * 4.0 > bounds.width.min(bounds.height) {
            return Err(MapgenError::InvalidConfig(format!(
                "spacing {} too large for {}x{} domain",
                self.spacing, bounds.width, bounds.height
            )));
        }
        if self.sample_attempts == 0 {
            return Err(MapgenError::InvalidConfig(
                "sample_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfigBuilder::new().build().unwrap()
    }
}

/// Builder for creating MapConfig with validation
///
/// Uses the builder pattern to create configurations with sensible defaults.
///
/// # Example
///
/// ```rust
/// use island_mapgen::*;
///
/// // Use defaults
/// let config = MapConfigBuilder::new().build().unwrap();
///
/// // Customize
/// let config = MapConfigBuilder::new()
///     .seed(12345)
///     .map_size(MapSize::Small)
///     .spacing(8.0)
///     .unwrap()
///     .shaper_seed(67890)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct MapConfigBuilder {
    seed: Option<u64>,
    map_size: MapSize,
    spacing: f64,
    sample_attempts: u32,
    shaper_seed: Option<u64>,
}

impl MapConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - map_size: Medium (600x600 units)
    /// - spacing: 10.0 units
    /// - sample_attempts: 30
    /// - shaper_seed: Same as seed
    pub fn new() -> Self {
        Self {
            seed: None,
            map_size: MapSize::default(),
            spacing: 10.0,
            sample_attempts: DEFAULT_SAMPLE_ATTEMPTS,
            shaper_seed: None,
        }
    }

    /// Set the random seed for point sampling
    ///
    /// Using the same seed with the same other parameters will produce
    /// an identical mesh every time.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the map size preset
    pub fn map_size(mut self, size: MapSize) -> Self {
        self.map_size = size;
        self
    }

    /// Set the minimum distance between sampled points
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if spacing is not positive and finite.
    pub fn spacing(mut self, spacing: f64) -> Result<Self> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(MapgenError::InvalidConfig(format!(
                "spacing must be positive and finite (got {})",
                spacing
            )));
        }
        self.spacing = spacing;
        Ok(self)
    }

    /// Set the candidate attempts per active point
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if attempts is 0 or > 1000 (excessive).
    pub fn sample_attempts(mut self, attempts: u32) -> Result<Self> {
        if attempts == 0 || attempts > 1000 {
            return Err(MapgenError::InvalidConfig(format!(
                "sample_attempts must be in 1..=1000 (got {})",
                attempts
            )));
        }
        self.sample_attempts = attempts;
        Ok(self)
    }

    /// Set a separate shaper seed
    ///
    /// If not set, the shaper seed will match the sampling seed. Setting a
    /// different shaper seed allows the same region layout with a different
    /// island shape.
    pub fn shaper_seed(mut self, seed: u64) -> Self {
        self.shaper_seed = Some(seed);
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the spacing does not fit the chosen
    /// domain (the boundary frame needs `spacing * 4 <= min(width, height)`).
    pub fn build(self) -> Result<MapConfig> {
        let seed = self.seed.unwrap_or_else(rand::random);
        let shaper_seed = self.shaper_seed.unwrap_or(seed);

        let config = MapConfig {
            seed,
            map_size: self.map_size,
            spacing: self.spacing,
            sample_attempts: self.sample_attempts,
            shaper_seed,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for MapConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
