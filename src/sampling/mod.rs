//! Point sampling for the island mesh
//!
//! Combines the deterministic boundary frame with Poisson-disc sampling to
//! produce the final point set fed to the triangulator. Exterior padding
//! points come first in the output, then the interior boundary points, then
//! the random interior samples — consumers use the recorded prefix counts to
//! tell padding regions apart from real terrain.

mod boundary;
mod poisson;

pub use boundary::boundary_points;
pub use poisson::sample_poisson;

use glam::DVec2;

use crate::config::MapConfig;
use crate::error::Result;

/// The sampled point set with its prefix structure
///
/// Points are ordered: `[0, exterior_count)` are exterior padding points
/// (outside the domain), `[exterior_count, fixed_count)` are interior
/// boundary points, and `[fixed_count, len)` are Poisson-disc samples.
/// Region IDs inherit this ordering, so `id < exterior_count` identifies a
/// padding region that must never be rendered as terrain.
#[derive(Debug, Clone)]
pub struct SampledPoints {
    /// All sampled points, fixed boundary prefix first
    pub points: Vec<DVec2>,
    /// Number of exterior padding points at the front of `points`
    pub exterior_count: usize,
    /// Number of fixed (exterior + interior boundary) points at the front
    pub fixed_count: usize,
}

impl SampledPoints {
    /// Total number of points
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if no points were produced
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Sample the full island point set for a configuration
///
/// Generates the boundary frame, admits it as fixed seeds (exterior first),
/// then fills the interior with Poisson-disc samples. Deterministic for a
/// given configuration.
pub fn sample_island_points(config: &MapConfig) -> Result<SampledPoints> {
    let bounds = config.bounds();
    let (interior, exterior) = boundary_points(&bounds, config.spacing);

    let mut fixed = exterior.clone();
    fixed.extend_from_slice(&interior);

    let points = sample_poisson(
        bounds,
        config.spacing,
        config.sample_attempts,
        config.seed,
        &fixed,
    )?;

    // The sampler admits valid fixed points as a prefix in input order but
    // may skip near-duplicates; walk both lists to find how many of each
    // group actually survived validation.
    let mut exterior_count = 0;
    let mut fixed_count = 0;
    let mut fi = 0;
    for p in &points {
        let mut matched = None;
        while fi < fixed.len() {
            let candidate = fi;
            fi += 1;
            if fixed[candidate] == *p {
                matched = Some(candidate);
                break;
            }
        }
        match matched {
            Some(index) => {
                fixed_count += 1;
                if index < exterior.len() {
                    exterior_count += 1;
                }
            }
            // First sampled (non-fixed) point ends the prefix.
            None => break,
        }
    }

    Ok(SampledPoints {
        points,
        exterior_count,
        fixed_count,
    })
}
