//! # Cavity size distribution by random probe insertion
//!
//! For every snapshot a fixed number of probe points is dropped uniformly
//! into the box. For each probe the nearest particle centre is looked up
//! through the spatial index:
//!
//! - if any centre lies within `sqrt(overlap_sqr_distance)` the probe sits
//!   inside a particle and the trial is discarded,
//! - otherwise, if the nearest centre is closer than `max_distance`, the
//!   surface distance `d - particle_radius` is binned.
//!
//! The snapshot histogram is normalised by the full trial count, including
//! discarded trials, and added to a running total. The sampler reports,
//! per bin, the probe diameter `2 * (bin + 0.5) * bin_width`, the running
//! average over all processed snapshots and this snapshot's probability.
//!
//! The running state belongs to one [`CavitySampler`]; independent runs use
//! independent samplers and [`CavitySampler::reset`] starts over.

use std::f64::consts::PI;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{AnalysisError, Result};
use crate::simulation::cell_list::SpatialIndex;
use crate::simulation::periodic_box::PeriodicBox;
use crate::simulation::states::{NVec3, Particle};

/// Volume of a unit-diameter sphere, the reference probe for auto trials
const PROBE_VOLUME: f64 = PI / 6.0;

/// Auto trial count: this many trials per probe volume of box
const TRIALS_PER_PROBE_VOLUME: usize = 50;

/// Settings of the cavity sampler
#[derive(Debug, Clone)]
pub struct CavityConfig {
    pub n_bins: usize,
    pub max_distance: f64,
    pub tries: usize, // 0 = derive from the box volume
    pub particle_radius: f64,
    pub overlap_sqr_distance: f64,
}

impl Default for CavityConfig {
    fn default() -> Self {
        Self {
            n_bins: 20,
            max_distance: 2.0,
            tries: 0,
            particle_radius: 0.5,
            overlap_sqr_distance: 0.5,
        }
    }
}

impl CavityConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_bins == 0 {
            return Err(AnalysisError::config("n_bins must be positive"));
        }
        if !(self.max_distance.is_finite() && self.max_distance > 0.0) {
            return Err(AnalysisError::config(format!("max_distance must be positive, got {}", self.max_distance)));
        }
        if !(self.particle_radius.is_finite() && self.particle_radius >= 0.0) {
            return Err(AnalysisError::config(format!("particle_radius must be >= 0, got {}", self.particle_radius)));
        }
        if !(self.overlap_sqr_distance.is_finite() && self.overlap_sqr_distance >= 0.0) {
            return Err(AnalysisError::config(format!(
                "overlap_sqr_distance must be >= 0, got {}",
                self.overlap_sqr_distance
            )));
        }
        // probes between the overlap shell and the particle surface would be
        // neither binned nor discarded
        if self.particle_radius * self.particle_radius > self.overlap_sqr_distance {
            return Err(AnalysisError::config(format!(
                "particle_radius^2 ({}) must not exceed overlap_sqr_distance ({})",
                self.particle_radius * self.particle_radius,
                self.overlap_sqr_distance
            )));
        }
        Ok(())
    }

    pub fn bin_width(&self) -> f64 {
        self.max_distance / self.n_bins as f64
    }
}

/// One histogram bin of a snapshot report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CavityBin {
    pub diameter: f64,
    pub running_average: f64,
    pub probability: f64,
}

/// Result of one snapshot
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CavityReport {
    pub bins: Vec<CavityBin>,
    pub accepted: usize, // trials that landed in a bin
    pub discarded: usize, // trials that overlapped a particle
}

impl fmt::Display for CavityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.bins {
            writeln!(f, "{} {} {}", b.diameter, b.running_average, b.probability)?;
        }
        Ok(())
    }
}

/// Monte Carlo estimator of the cavity size distribution
#[derive(Debug, Clone)]
pub struct CavitySampler<R: Rng = ChaCha8Rng> {
    config: CavityConfig,
    tries: usize,
    total_histo: Vec<f64>,
    n_confs: usize,
    rng: R,
}

impl CavitySampler<ChaCha8Rng> {
    /// Sampler seeded from `seed`, or from system entropy when `None`
    pub fn new(config: CavityConfig, sim_box: &dyn PeriodicBox, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, sim_box, rng)
    }
}

impl<R: Rng> CavitySampler<R> {
    pub fn with_rng(config: CavityConfig, sim_box: &dyn PeriodicBox, rng: R) -> Result<Self> {
        config.validate()?;

        let tries = if config.tries > 0 {
            config.tries
        } else {
            let derived = (sim_box.volume() / PROBE_VOLUME) as usize * TRIALS_PER_PROBE_VOLUME;
            if derived == 0 {
                log::warn!("cavity sampler: box volume {} too small, using a single trial", sim_box.volume());
            }
            derived.max(1)
        };
        log::info!("cavity sampler: tries = {tries}, {} bins up to {}", config.n_bins, config.max_distance);

        Ok(Self {
            total_histo: vec![0.0; config.n_bins],
            config,
            tries,
            n_confs: 0,
            rng,
        })
    }

    pub fn config(&self) -> &CavityConfig {
        &self.config
    }

    /// Trials per snapshot
    pub fn tries(&self) -> usize {
        self.tries
    }

    /// Snapshots folded into the running histogram
    pub fn n_confs(&self) -> usize {
        self.n_confs
    }

    /// Sum of the per-snapshot probabilities so far
    pub fn total_histogram(&self) -> &[f64] {
        &self.total_histo
    }

    /// Running histogram divided by the snapshot count
    pub fn running_average(&self) -> Vec<f64> {
        if self.n_confs == 0 {
            return vec![0.0; self.total_histo.len()];
        }
        self.total_histo.iter().map(|t| t / self.n_confs as f64).collect()
    }

    /// Forget every processed snapshot
    pub fn reset(&mut self) {
        self.total_histo.iter_mut().for_each(|t| *t = 0.0);
        self.n_confs = 0;
    }

    /// Sample the current snapshot and fold it into the running histogram.
    pub fn compute(
        &mut self,
        particles: &[Particle],
        sim_box: &dyn PeriodicBox,
        index: &mut dyn SpatialIndex,
    ) -> Result<CavityReport> {
        if index.cutoff() < self.config.max_distance {
            return Err(AnalysisError::IndexCutoff { required: self.config.max_distance, actual: index.cutoff() });
        }

        index.refresh_all(particles);

        let bin_width = self.config.bin_width();
        let sqr_max = self.config.max_distance * self.config.max_distance;
        let sides = sim_box.side_lengths();

        // built aside and merged at the end, so an aborted snapshot leaves
        // the running totals untouched
        let mut partial = vec![0.0; self.config.n_bins];
        let mut accepted = 0;
        let mut discarded = 0;

        for _ in 0..self.tries {
            let probe = NVec3::new(
                self.rng.gen::<f64>() * sides.x,
                self.rng.gen::<f64>() * sides.y,
                self.rng.gen::<f64>() * sides.z,
            );

            let mut sqr_min = f64::INFINITY;
            let mut overlap = false;
            for j in index.neighbors_of(&probe) {
                let sqr_r = sim_box.sqr_min_image_distance(&probe, &particles[j].x);
                if sqr_r <= self.config.overlap_sqr_distance {
                    overlap = true;
                    break;
                }
                sqr_min = sqr_min.min(sqr_r);
            }

            if overlap {
                discarded += 1;
                continue;
            }
            if sqr_min < sqr_max {
                let surface = sqr_min.sqrt() - self.config.particle_radius;
                if surface < self.config.max_distance {
                    let bin = ((surface / bin_width) as usize).min(self.config.n_bins - 1);
                    partial[bin] += 1.0;
                    accepted += 1;
                }
            }
        }

        for p in partial.iter_mut() {
            *p /= self.tries as f64;
        }
        for (t, p) in self.total_histo.iter_mut().zip(&partial) {
            *t += p;
        }
        self.n_confs += 1;

        log::debug!(
            "cavity sampler: snapshot {}, {accepted} binned, {discarded} overlapping of {}",
            self.n_confs, self.tries
        );

        let bins = partial
            .iter()
            .zip(&self.total_histo)
            .enumerate()
            .map(|(i, (&probability, &total))| CavityBin {
                diameter: 2.0 * (i as f64 + 0.5) * bin_width,
                running_average: total / self.n_confs as f64,
                probability,
            })
            .collect();

        Ok(CavityReport { bins, accepted, discarded })
    }
}
