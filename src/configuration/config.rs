//! Configuration types for loading analysis scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of an
//! analysis run. A scenario consists of:
//!
//! - [`BoxConfig`]       – periodic box side lengths
//! - [`NematicSection`]  – optional cluster / nematic order settings
//! - [`CavitySection`]   – optional cavity sampler settings
//! - [`SnapshotConfig`]  – particle records of every snapshot, in order
//! - [`ScenarioConfig`]  – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! sim_box:
//!   sides: [10.0, 10.0, 10.0]
//!
//! nematic:
//!   reference_axis: 2       # 0..5 -> v1 v2 v3 vT1 vT2 vT3
//!   rod_length: 1.0
//!   distance_cutoff: 0.5
//!   angle_cutoff: 0.1       # radians
//!   min_cluster_size: 2     # clusters need more members than this
//!
//! cavity:
//!   n_bins: 20
//!   max_distance: 2.0
//!   tries: 0                # 0 -> derived from the box volume
//!   seed: 42
//!
//! snapshots:
//!   - particles:
//!       - x: [1.0, 1.0, 1.0]
//!         axes: [[0, 1, 0], [0, 0, 1], [1, 0, 0]]   # rows v1, v2, v3
//!       - x: [1.0, 1.3, 1.0]
//! ```
//!
//! Everything is checked when the scenario is built, not while analysing.

use serde::Deserialize;

use crate::analysis::cavity::CavityConfig;
use crate::analysis::contacts::ContactCriteria;
use crate::analysis::nematic::{NematicConfig, ReferenceAxis};
use crate::error::{AnalysisError, Result};
use crate::simulation::states::{NVec3, Particle, Snapshot};

/// Periodic box
#[derive(Deserialize, Debug, Clone)]
pub struct BoxConfig {
    pub sides: Vec<f64>, // Lx, Ly, Lz
}

impl BoxConfig {
    pub fn sides(&self) -> Result<NVec3> {
        vec3(&self.sides, "sim_box.sides")
    }
}

/// Cluster and nematic order settings
#[derive(Deserialize, Debug, Clone)]
pub struct NematicSection {
    pub reference_axis: i64, // numeric axis selector, 0..6
    pub rod_length: f64,
    pub distance_cutoff: f64,
    pub angle_cutoff: f64,
    #[serde(default = "default_min_cluster_size")]
    pub min_cluster_size: usize,
}

fn default_min_cluster_size() -> usize {
    5
}

impl NematicSection {
    pub fn to_config(&self) -> Result<NematicConfig> {
        let config = NematicConfig {
            reference_axis: ReferenceAxis::from_index(self.reference_axis)?,
            contacts: ContactCriteria {
                rod_length: self.rod_length,
                distance_cutoff: self.distance_cutoff,
                angle_cutoff: self.angle_cutoff,
            },
            min_cluster_size: self.min_cluster_size,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Cavity sampler settings
#[derive(Deserialize, Debug, Clone)]
pub struct CavitySection {
    pub n_bins: usize,
    pub max_distance: f64,
    #[serde(default)]
    pub tries: usize,
    pub particle_radius: Option<f64>,
    pub overlap_sqr_distance: Option<f64>,
    pub seed: Option<u64>, // deterministic runs when set
}

impl CavitySection {
    pub fn to_config(&self) -> Result<CavityConfig> {
        let defaults = CavityConfig::default();
        let config = CavityConfig {
            n_bins: self.n_bins,
            max_distance: self.max_distance,
            tries: self.tries,
            particle_radius: self.particle_radius.unwrap_or(defaults.particle_radius),
            overlap_sqr_distance: self.overlap_sqr_distance.unwrap_or(defaults.overlap_sqr_distance),
        };
        config.validate()?;
        Ok(config)
    }
}

/// One particle record
#[derive(Deserialize, Debug, Clone)]
pub struct ParticleConfig {
    pub x: Vec<f64>,               // position
    pub axes: Option<Vec<Vec<f64>>>, // body axes v1, v2, v3; identity if absent
    pub species: Option<u32>,
}

impl ParticleConfig {
    pub fn to_particle(&self) -> Result<Particle> {
        let x = vec3(&self.x, "particle x")?;
        let mut p = match &self.axes {
            None => Particle::new(x),
            Some(axes) if axes.len() == 3 => Particle::with_axes(
                x,
                vec3(&axes[0], "particle axes")?,
                vec3(&axes[1], "particle axes")?,
                vec3(&axes[2], "particle axes")?,
            ),
            Some(axes) => {
                return Err(AnalysisError::config(format!("particle axes need 3 rows, got {}", axes.len())));
            }
        };
        p.species = self.species;
        Ok(p)
    }
}

/// Particle records of one snapshot
#[derive(Deserialize, Debug, Clone)]
pub struct SnapshotConfig {
    #[serde(default)]
    pub particles: Vec<ParticleConfig>,
}

impl SnapshotConfig {
    pub fn to_snapshot(&self) -> Result<Snapshot> {
        let particles = self
            .particles
            .iter()
            .map(ParticleConfig::to_particle)
            .collect::<Result<Vec<_>>>()?;
        Ok(Snapshot { particles })
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub sim_box: BoxConfig,
    pub nematic: Option<NematicSection>,
    pub cavity: Option<CavitySection>,
    #[serde(default)]
    pub snapshots: Vec<SnapshotConfig>,
}

fn vec3(v: &[f64], what: &str) -> Result<NVec3> {
    match v {
        [x, y, z] => Ok(NVec3::new(*x, *y, *z)),
        _ => Err(AnalysisError::config(format!("{what} needs 3 components, got {}", v.len()))),
    }
}
