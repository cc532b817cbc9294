//! Cluster-resolved nematic order parameter
//!
//! Each snapshot is split into contact clusters (see [`crate::analysis::contacts`]
//! and [`crate::analysis::clusters`]). For every cluster with more than
//! `min_cluster_size` members a director is built from the members' long
//! axes, and each member contributes `P2(cos theta) = 1.5 cos^2 - 0.5`, where
//! theta is the angle between the director and the member's reference axis.
//!
//! Output per snapshot: total / N, total / (clusters * N), clusters.

use std::fmt;

use crate::analysis::clusters::ClusterPartition;
use crate::analysis::contacts::{build_contacts, ContactCriteria};
use crate::error::{AnalysisError, Result};
use crate::simulation::cell_list::SpatialIndex;
use crate::simulation::periodic_box::PeriodicBox;
use crate::simulation::states::{NVec3, Particle};

/// Cosines are kept this far away from +-1 before squaring
const COS_EPSILON: f64 = f32::EPSILON as f64;

/// Directors shorter than this are treated as undefined
const MIN_DIRECTOR_NORM: f64 = 1.0e-9;

/// Body axis compared against the cluster director
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceAxis {
    V1,
    V2,
    V3,
    TransposedV1, // column 1 of the orientation frame
    TransposedV2,
    TransposedV3,
}

impl ReferenceAxis {
    /// Map the numeric option `0..6` onto an axis
    pub fn from_index(i: i64) -> Result<Self> {
        match i {
            0 => Ok(ReferenceAxis::V1),
            1 => Ok(ReferenceAxis::V2),
            2 => Ok(ReferenceAxis::V3),
            3 => Ok(ReferenceAxis::TransposedV1),
            4 => Ok(ReferenceAxis::TransposedV2),
            5 => Ok(ReferenceAxis::TransposedV3),
            _ => Err(AnalysisError::config(format!("reference axis must be in 0..6, got {i}"))),
        }
    }

    pub fn of(&self, p: &Particle) -> NVec3 {
        match self {
            ReferenceAxis::V1 => p.axis(0),
            ReferenceAxis::V2 => p.axis(1),
            ReferenceAxis::V3 => p.axis(2),
            ReferenceAxis::TransposedV1 => p.transposed_axis(0),
            ReferenceAxis::TransposedV2 => p.transposed_axis(1),
            ReferenceAxis::TransposedV3 => p.transposed_axis(2),
        }
    }
}

/// Settings of the nematic evaluator
#[derive(Debug, Clone)]
pub struct NematicConfig {
    pub reference_axis: ReferenceAxis,
    pub contacts: ContactCriteria,
    pub min_cluster_size: usize, // clusters need strictly more members
}

impl NematicConfig {
    pub fn validate(&self) -> Result<()> {
        self.contacts.validate()?;
        if self.min_cluster_size == 0 {
            return Err(AnalysisError::config("min_cluster_size must be positive"));
        }
        Ok(())
    }
}

/// Order of one qualifying cluster
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOrder {
    pub size: usize,
    pub order_sum: f64,
    pub director: NVec3,
}

impl ClusterOrder {
    /// Mean per-member order
    pub fn mean(&self) -> f64 {
        self.order_sum / self.size as f64
    }
}

/// Result of one snapshot
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NematicReport {
    pub normalized_order: f64,  // total / N
    pub per_cluster_order: f64, // total / (n_clusters * N)
    pub n_clusters: usize,
    pub clusters: Vec<ClusterOrder>,
}

impl fmt::Display for NematicReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.normalized_order, self.per_cluster_order, self.n_clusters)
    }
}

/// Nematic order evaluator
#[derive(Debug, Clone)]
pub struct NematicOrder {
    config: NematicConfig,
}

impl NematicOrder {
    pub fn new(config: NematicConfig) -> Result<Self> {
        config.validate()?;
        log::info!("nematic order: using reference axis {:?}", config.reference_axis);
        Ok(Self { config })
    }

    pub fn config(&self) -> &NematicConfig {
        &self.config
    }

    /// Contact clusters of the current snapshot
    pub fn build_clusters(
        &self,
        particles: &[Particle],
        sim_box: &dyn PeriodicBox,
        index: &mut dyn SpatialIndex,
    ) -> Result<ClusterPartition> {
        let contacts = build_contacts(particles, sim_box, index, &self.config.contacts)?;
        log::debug!("nematic order: {} contacts among {} particles", contacts.len(), particles.len());
        ClusterPartition::from_contacts(particles.len(), &contacts)
    }

    /// Analyse the current snapshot.
    pub fn compute(
        &self,
        particles: &[Particle],
        sim_box: &dyn PeriodicBox,
        index: &mut dyn SpatialIndex,
    ) -> Result<NematicReport> {
        let partition = self.build_clusters(particles, sim_box, index)?;
        self.evaluate(particles, &partition)
    }

    /// Order of an already partitioned snapshot
    pub fn evaluate(&self, particles: &[Particle], partition: &ClusterPartition) -> Result<NematicReport> {
        let n = particles.len();
        if partition.n_particles() != n {
            return Err(AnalysisError::PartitionMismatch { partition: partition.n_particles(), particles: n });
        }
        let mut overall = 0.0;
        let mut clusters = Vec::new();

        for members in partition.clusters() {
            if members.len() <= self.config.min_cluster_size {
                continue;
            }

            let Some(director) = director(particles, members) else {
                log::warn!(
                    "nematic order: cluster of {} starting at {} has no defined director, skipped",
                    members.len(), members[0]
                );
                continue;
            };

            let order_sum: f64 = members
                .iter()
                .map(|&i| p2(director.dot(&self.config.reference_axis.of(&particles[i]))))
                .sum();

            overall += order_sum;
            clusters.push(ClusterOrder { size: members.len(), order_sum, director });
        }

        let n_clusters = clusters.len();
        if n_clusters == 0 {
            return Ok(NematicReport::default());
        }

        Ok(NematicReport {
            normalized_order: overall / n as f64,
            per_cluster_order: overall / n_clusters as f64 / n as f64,
            n_clusters,
            clusters,
        })
    }
}

/// Normalised sum of the members' long axes
fn director(particles: &[Particle], members: &[usize]) -> Option<NVec3> {
    let sum: NVec3 = members.iter().map(|&i| particles[i].rod_axis()).sum();
    let norm = sum.norm();
    if norm < MIN_DIRECTOR_NORM * members.len() as f64 {
        return None;
    }
    Some(sum / norm)
}

/// Second Legendre polynomial of a cosine, kept strictly inside (-1, 1)
fn p2(cos: f64) -> f64 {
    let c = if cos.abs() >= 1.0 { (1.0 - COS_EPSILON).copysign(cos) } else { cos };
    1.5 * c * c - 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn p2_limits() {
        assert_abs_diff_eq!(p2(1.0), 1.0, epsilon = 1e-6);
        assert!(p2(1.0) < 1.0);
        assert_abs_diff_eq!(p2(-1.0 - 1e-12), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p2(0.0), -0.5, epsilon = 1e-12);
    }

    #[test]
    fn reference_axis_bounds() {
        assert_eq!(ReferenceAxis::from_index(5).unwrap(), ReferenceAxis::TransposedV3);
        assert!(ReferenceAxis::from_index(6).is_err());
        assert!(ReferenceAxis::from_index(-1).is_err());
    }

    #[test]
    fn partition_of_other_snapshot_is_rejected() {
        let order = NematicOrder::new(NematicConfig {
            reference_axis: ReferenceAxis::V3,
            contacts: ContactCriteria { rod_length: 1.0, distance_cutoff: 0.5, angle_cutoff: 0.1 },
            min_cluster_size: 1,
        })
        .unwrap();
        let two = vec![Particle::new(NVec3::zeros()), Particle::new(NVec3::x())];

        let larger = ClusterPartition::from_contacts(4, &[(0, 1), (2, 3)]).unwrap();
        let err = order.evaluate(&two, &larger).unwrap_err();
        assert!(matches!(err, AnalysisError::PartitionMismatch { partition: 4, particles: 2 }));

        let smaller = ClusterPartition::from_contacts(1, &[]).unwrap();
        assert!(order.evaluate(&two, &smaller).is_err());

        let matching = ClusterPartition::from_contacts(2, &[(0, 1)]).unwrap();
        assert_eq!(order.evaluate(&two, &matching).unwrap().n_clusters, 1);
    }

    #[test]
    fn antiparallel_rods_have_no_director() {
        let a = Particle::with_axes(NVec3::zeros(), NVec3::y(), NVec3::z(), NVec3::x());
        let b = Particle::with_axes(NVec3::zeros(), NVec3::y(), -NVec3::z(), -NVec3::x());
        assert!(director(&[a, b], &[0, 1]).is_none());
    }
}
