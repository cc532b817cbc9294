//! # Spatial neighbour indices
//!
//! Both analysis pipelines ask a spatial index for "who could be within
//! the cutoff of whom". The index never filters by exact distance: it
//! only narrows the candidate set, and callers do the precise geometry.
//!
//! - [`CellList`] divides the periodic box into a grid of cells whose side
//!   is at least the cutoff. Any pair closer than the cutoff is then found
//!   in the same or an adjacent cell (27-cell stencil, wrapped through the
//!   periodic boundaries).
//! - [`AllPairs`] reports every pair. It is O(N^2) and exists as the
//!   reference the cell list is benchmarked and checked against.
//!
//! With fewer than three cells along an axis the wrapped stencil would
//! visit the same cell more than once, so the stencil is deduplicated.
//!
//! Indices are snapshot-scoped: nothing is fresh until `refresh_all` has
//! been called with the current particle positions.

use crate::error::{AnalysisError, Result};
use crate::simulation::periodic_box::{CuboidBox, PeriodicBox};
use crate::simulation::states::{NVec3, Particle};

/// Candidate-neighbour service consumed by the analyses
pub trait SpatialIndex {
    /// Radius the index guarantees not to miss
    fn cutoff(&self) -> f64;

    /// Rebuild the index from the current positions of all particles
    fn refresh_all(&mut self, particles: &[Particle]);

    /// Move a single particle to `position`
    fn refresh_one(&mut self, index: usize, position: &NVec3);

    /// Every unordered pair `(i, j)`, `i < j`, that may be within the cutoff.
    /// Sorted, each pair reported once.
    fn candidate_pairs(&self) -> Vec<(usize, usize)>;

    /// Indices of all particles that may be within the cutoff of `point`
    fn neighbors_of(&self, point: &NVec3) -> Vec<usize>;
}

/// Periodic linked-cell index over a [`CuboidBox`]
#[derive(Debug, Clone)]
pub struct CellList {
    cutoff: f64,
    sim_box: CuboidBox,
    n_cells: [usize; 3],
    cell_size: NVec3,
    cells: Vec<Vec<usize>>,     // particle indices per cell
    particle_cell: Vec<usize>,  // cell of every particle
    stencils: Vec<Vec<usize>>,  // deduplicated neighbour cells per cell
}

impl CellList {
    /// Build an empty cell list for `sim_box` able to resolve `cutoff`.
    pub fn new(sim_box: &CuboidBox, cutoff: f64) -> Result<Self> {
        if !(cutoff.is_finite() && cutoff > 0.0) {
            return Err(AnalysisError::config(format!(
                "cell list cutoff must be positive, got {cutoff}"
            )));
        }

        let sides = sim_box.side_lengths();
        let mut n_cells = [1usize; 3];
        let mut cell_size = NVec3::zeros();
        for k in 0..3 {
            n_cells[k] = ((sides[k] / cutoff).floor() as usize).max(1);
            cell_size[k] = sides[k] / n_cells[k] as f64;
        }

        let total = n_cells[0] * n_cells[1] * n_cells[2];
        let stencils = (0..total).map(|c| build_stencil(c, n_cells)).collect();

        log::debug!(
            "cell list: cutoff {cutoff}, {}x{}x{} cells",
            n_cells[0], n_cells[1], n_cells[2]
        );

        Ok(Self {
            cutoff,
            sim_box: sim_box.clone(),
            n_cells,
            cell_size,
            cells: vec![Vec::new(); total],
            particle_cell: Vec::new(),
            stencils,
        })
    }

    /// Number of cells along each axis
    pub fn n_cells(&self) -> [usize; 3] {
        self.n_cells
    }

    fn cell_of(&self, p: &NVec3) -> usize {
        let w = self.sim_box.wrap(p);
        let mut idx = [0usize; 3];
        for k in 0..3 {
            // wrap() can return exactly L for tiny negative inputs
            idx[k] = ((w[k] / self.cell_size[k]) as usize).min(self.n_cells[k] - 1);
        }
        flat_index(idx, self.n_cells)
    }
}

impl SpatialIndex for CellList {
    fn cutoff(&self) -> f64 {
        self.cutoff
    }

    fn refresh_all(&mut self, particles: &[Particle]) {
        for cell in self.cells.iter_mut() {
            cell.clear();
        }
        self.particle_cell.clear();
        self.particle_cell.reserve(particles.len());

        for (i, p) in particles.iter().enumerate() {
            let c = self.cell_of(&p.x);
            self.cells[c].push(i);
            self.particle_cell.push(c);
        }
    }

    fn refresh_one(&mut self, index: usize, position: &NVec3) {
        let new_cell = self.cell_of(position);
        if index >= self.particle_cell.len() {
            // unseen index: grow the table so the particle becomes queryable
            let old_len = self.particle_cell.len();
            self.particle_cell.resize(index + 1, usize::MAX);
            log::debug!("cell list grew from {old_len} to {} slots", index + 1);
        }

        let old_cell = self.particle_cell[index];
        if old_cell == new_cell {
            return;
        }
        if old_cell != usize::MAX {
            self.cells[old_cell].retain(|&j| j != index);
        }
        self.cells[new_cell].push(index);
        self.particle_cell[index] = new_cell;
    }

    fn candidate_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (c, members) in self.cells.iter().enumerate() {
            for &nc in &self.stencils[c] {
                for &a in members {
                    for &b in &self.cells[nc] {
                        if a < b {
                            pairs.push((a, b));
                        }
                    }
                }
            }
        }
        pairs.sort_unstable();
        pairs
    }

    fn neighbors_of(&self, point: &NVec3) -> Vec<usize> {
        let c = self.cell_of(point);
        self.stencils[c]
            .iter()
            .flat_map(|&nc| self.cells[nc].iter().copied())
            .collect()
    }
}

/// Brute-force index: every particle is a candidate neighbour of everything
#[derive(Debug, Clone, Default)]
pub struct AllPairs {
    cutoff: f64,
    n: usize,
}

impl AllPairs {
    pub fn new(cutoff: f64) -> Self {
        Self { cutoff, n: 0 }
    }
}

impl SpatialIndex for AllPairs {
    fn cutoff(&self) -> f64 {
        self.cutoff
    }

    fn refresh_all(&mut self, particles: &[Particle]) {
        self.n = particles.len();
    }

    fn refresh_one(&mut self, index: usize, _position: &NVec3) {
        self.n = self.n.max(index + 1);
    }

    fn candidate_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::with_capacity(self.n * self.n.saturating_sub(1) / 2);
        for i in 0..self.n {
            for j in (i + 1)..self.n {
                pairs.push((i, j));
            }
        }
        pairs
    }

    fn neighbors_of(&self, _point: &NVec3) -> Vec<usize> {
        (0..self.n).collect()
    }
}

// helpers ===========================================================================

fn flat_index(idx: [usize; 3], n: [usize; 3]) -> usize {
    (idx[2] * n[1] + idx[1]) * n[0] + idx[0]
}

/// Cells adjacent to `cell` (itself included) through periodic wrapping,
/// each listed once
fn build_stencil(cell: usize, n: [usize; 3]) -> Vec<usize> {
    let ix = cell % n[0];
    let iy = (cell / n[0]) % n[1];
    let iz = cell / (n[0] * n[1]);

    let mut out = Vec::with_capacity(27);
    for dz in -1i64..=1 {
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                let jx = (ix as i64 + dx).rem_euclid(n[0] as i64) as usize;
                let jy = (iy as i64 + dy).rem_euclid(n[1] as i64) as usize;
                let jz = (iz as i64 + dz).rem_euclid(n[2] as i64) as usize;
                out.push(flat_index([jx, jy, jz], n));
            }
        }
    }
    out.sort_unstable();
    out.dedup();
    out
}
