//! Contact graph between rod-like particles
//!
//! Two particles are in contact when their rods come closer than
//! `distance_cutoff` and their long axes are within `angle_cutoff` of each
//! other (sense ignored). Candidates come from a [`SpatialIndex`] whose
//! cutoff must be at least `rod_length + distance_cutoff`.

use crate::analysis::geometry::{axis_angle, spherocylinder_distance};
use crate::error::{AnalysisError, Result};
use crate::simulation::cell_list::SpatialIndex;
use crate::simulation::periodic_box::PeriodicBox;
use crate::simulation::states::{NVec3, Particle};

/// Proximity and alignment thresholds for a contact
#[derive(Debug, Clone, Copy)]
pub struct ContactCriteria {
    pub rod_length: f64,      // length of the rod segment
    pub distance_cutoff: f64, // max closest-approach distance
    pub angle_cutoff: f64,    // max angle between long axes (radians)
}

impl ContactCriteria {
    pub fn validate(&self) -> Result<()> {
        if !(self.rod_length.is_finite() && self.rod_length >= 0.0) {
            return Err(AnalysisError::config(format!("rod_length must be >= 0, got {}", self.rod_length)));
        }
        if !(self.distance_cutoff.is_finite() && self.distance_cutoff > 0.0) {
            return Err(AnalysisError::config(format!("distance_cutoff must be positive, got {}", self.distance_cutoff)));
        }
        if !(self.angle_cutoff.is_finite() && self.angle_cutoff > 0.0) {
            return Err(AnalysisError::config(format!("angle_cutoff must be positive, got {}", self.angle_cutoff)));
        }
        Ok(())
    }

    /// Neighbour radius the spatial index has to resolve
    pub fn search_radius(&self) -> f64 {
        self.rod_length + self.distance_cutoff
    }

    /// Contact predicate for two particles separated by the min-image vector `r`
    pub fn is_contact(&self, p: &Particle, q: &Particle, r: &NVec3) -> bool {
        let u1 = p.rod_axis();
        let u2 = q.rod_axis();
        spherocylinder_distance(r, &u1, &u2, self.rod_length) < self.distance_cutoff
            && axis_angle(&u1, &u2) < self.angle_cutoff
    }
}

/// Refresh `index` and return all contacts as sorted `(i, j)` pairs, `i < j`.
pub fn build_contacts(
    particles: &[Particle],
    sim_box: &dyn PeriodicBox,
    index: &mut dyn SpatialIndex,
    criteria: &ContactCriteria,
) -> Result<Vec<(usize, usize)>> {
    let required = criteria.search_radius();
    if index.cutoff() < required {
        return Err(AnalysisError::IndexCutoff { required, actual: index.cutoff() });
    }

    index.refresh_all(particles);

    let mut contacts: Vec<(usize, usize)> = index
        .candidate_pairs()
        .into_iter()
        .filter(|&(i, j)| {
            let (p, q) = (&particles[i], &particles[j]);
            let r = sim_box.min_image_vector(&p.x, &q.x);
            criteria.is_contact(p, q, &r)
        })
        .collect();

    // candidate order is index-specific
    contacts.sort_unstable();
    Ok(contacts)
}
