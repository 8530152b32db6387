//! Poisson-disc sampling (Bridson's dart throwing)
//!
//! Produces a blue-noise point set with a minimum-distance guarantee. The
//! sampler supports externally supplied fixed points (the boundary frame)
//! which are admitted before any random sampling so the final mesh has a
//! well-formed perimeter.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::TAU;

use crate::error::{MapgenError, Result};
use crate::geometry::Rect;

/// Uniform acceleration grid holding at most one sample index per cell
///
/// Cell size is `spacing / sqrt(2)` so any two points inside one cell are
/// closer than `spacing`; one occupant per cell is therefore sufficient.
/// The grid covers the domain expanded by a margin so fixed points placed
/// just outside the rectangle still participate in distance checks.
struct SampleGrid {
    origin: DVec2,
    cell_size: f64,
    cols: usize,
    rows: usize,
    cells: Vec<usize>,
}

/// Sentinel for an unoccupied grid cell
const UNOCCUPIED: usize = usize::MAX;

impl SampleGrid {
    fn new(coverage: Rect, spacing: f64) -> Self {
        let cell_size = spacing / std::f64::consts::SQRT_2;
        let cols = (coverage.width / cell_size).ceil() as usize + 1;
        let rows = (coverage.height / cell_size).ceil() as usize + 1;
        Self {
            origin: coverage.min(),
            cell_size,
            cols,
            rows,
            cells: vec![UNOCCUPIED; cols * rows],
        }
    }

    /// Grid cell containing a point, or None if outside coverage
    fn cell_of(&self, p: DVec2) -> Option<(usize, usize)> {
        let col = ((p.x - self.origin.x) / self.cell_size).floor();
        let row = ((p.y - self.origin.y) / self.cell_size).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some((col, row))
    }

    fn occupant(&self, col: usize, row: usize) -> usize {
        self.cells[row * self.cols + col]
    }

    fn insert(&mut self, col: usize, row: usize, index: usize) {
        self.cells[row * self.cols + col] = index;
    }

    /// Check that no accepted point within `spacing` exists near `candidate`
    ///
    /// Scans the 5x5 cell neighborhood around the candidate's cell; with
    /// cell size `spacing / sqrt(2)` any conflicting point must lie inside
    /// that window.
    fn is_clear(&self, candidate: DVec2, spacing: f64, points: &[DVec2]) -> bool {
        let Some((col, row)) = self.cell_of(candidate) else {
            return false;
        };
        let spacing_sq = spacing * spacing;
        let col_min = col.saturating_sub(2);
        let row_min = row.saturating_sub(2);
        let col_max = (col + 2).min(self.cols - 1);
        let row_max = (row + 2).min(self.rows - 1);
        for r in row_min..=row_max {
            for c in col_min..=col_max {
                let occupant = self.occupant(c, r);
                if occupant != UNOCCUPIED
                    && (points[occupant] - candidate).length_squared() < spacing_sq
                {
                    return false;
                }
            }
        }
        true
    }
}

/// Generate a blue-noise point set over `bounds` with minimum distance `spacing`
///
/// Implements Bridson's Poisson-disc sampling: maintain an active list of
/// accepted points; repeatedly pick a random active point and attempt up to
/// `attempts` candidates in the annulus `[spacing, 2*spacing)` around it;
/// accept the first candidate that lies inside `bounds` and has no accepted
/// point within `spacing`; retire the active point when no candidate fits.
///
/// `fixed` points are validated and admitted first, in order, and seed the
/// active list; they may lie outside `bounds` (up to `2 * spacing` away) so
/// an exterior padding frame can take part in distance checks. A fixed point
/// whose grid cell is already occupied is skipped (near-duplicate input).
///
/// The output is a pure function of the inputs: the same `(bounds, spacing,
/// attempts, seed, fixed)` always yields the identical point list, with the
/// admitted fixed points as a prefix.
///
/// # Errors
///
/// Returns `InvalidConfig` for non-positive/non-finite spacing, a degenerate
/// domain, or zero attempts; these are caller contract violations detected
/// before any sampling work.
pub fn sample_poisson(
    bounds: Rect,
    spacing: f64,
    attempts: u32,
    seed: u64,
    fixed: &[DVec2],
) -> Result<Vec<DVec2>> {
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(MapgenError::InvalidConfig(format!(
            "sampling spacing must be positive and finite (got {})",
            spacing
        )));
    }
    if bounds.is_degenerate() {
        return Err(MapgenError::InvalidConfig(
            "sampling domain must have positive finite extents".to_string(),
        ));
    }
    if attempts == 0 {
        return Err(MapgenError::InvalidConfig(
            "sampling attempts must be at least 1".to_string(),
        ));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    // Coverage extends beyond the domain so exterior fixed points are indexed.
    let coverage = bounds.expanded(2.0 * spacing);
    let mut grid = SampleGrid::new(coverage, spacing);

    let mut points: Vec<DVec2> = Vec::new();
    let mut active: Vec<usize> = Vec::new();

    // Admit fixed points first; they keep their input order.
    for &p in fixed {
        if !p.is_finite() {
            continue;
        }
        let Some((col, row)) = grid.cell_of(p) else {
            continue;
        };
        if grid.occupant(col, row) != UNOCCUPIED {
            continue;
        }
        let index = points.len();
        points.push(p);
        grid.insert(col, row, index);
        active.push(index);
    }

    // Without fixed seeds, start from one random interior point.
    if points.is_empty() {
        let start = DVec2::new(
            bounds.x + rng.gen::<f64>() * bounds.width,
            bounds.y + rng.gen::<f64>() * bounds.height,
        );
        if let Some((col, row)) = grid.cell_of(start) {
            points.push(start);
            grid.insert(col, row, 0);
            active.push(0);
        }
    }

    while !active.is_empty() {
        let pick = rng.gen_range(0..active.len());
        let base = points[active[pick]];

        let mut accepted = false;
        for _ in 0..attempts {
            let angle = rng.gen::<f64>() * TAU;
            let radius = spacing * (1.0 + rng.gen::<f64>());
            let candidate = base + DVec2::new(angle.cos(), angle.sin()) * radius;

            if !bounds.contains(candidate) {
                continue;
            }
            if !grid.is_clear(candidate, spacing, &points) {
                continue;
            }
            let Some((col, row)) = grid.cell_of(candidate) else {
                continue;
            };
            let index = points.len();
            points.push(candidate);
            grid.insert(col, row, index);
            active.push(index);
            accepted = true;
            break;
        }

        if !accepted {
            // Retired from the active list; the point stays in the output.
            active.swap_remove(pick);
        }
    }

    Ok(points)
}
