//! Periodic simulation box
//!
//! The analyses only need minimum-image displacements and the box volume,
//! so they talk to the box through [`PeriodicBox`]. [`CuboidBox`] is the
//! orthorhombic implementation used by scenarios and tests.

use crate::error::{AnalysisError, Result};
use crate::simulation::states::NVec3;

/// Minimum-image geometry of a periodic box
pub trait PeriodicBox {
    /// Displacement from `a` to the nearest periodic image of `b`
    fn min_image_vector(&self, a: &NVec3, b: &NVec3) -> NVec3;

    /// Squared length of [`PeriodicBox::min_image_vector`]
    fn sqr_min_image_distance(&self, a: &NVec3, b: &NVec3) -> f64 {
        self.min_image_vector(a, b).norm_squared()
    }

    fn volume(&self) -> f64;

    fn side_lengths(&self) -> NVec3;
}

/// Orthorhombic box with periodic boundaries along all three axes
#[derive(Debug, Clone)]
pub struct CuboidBox {
    sides: NVec3,
}

impl CuboidBox {
    pub fn new(sides: NVec3) -> Result<Self> {
        if sides.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(AnalysisError::config(format!(
                "box sides must be positive and finite, got [{}, {}, {}]",
                sides.x, sides.y, sides.z
            )));
        }
        Ok(Self { sides })
    }

    /// Cubic box of side `l`
    pub fn cubic(l: f64) -> Result<Self> {
        Self::new(NVec3::new(l, l, l))
    }

    /// Fold `p` back into `[0, L)` along every axis
    pub fn wrap(&self, p: &NVec3) -> NVec3 {
        NVec3::new(
            p.x - self.sides.x * (p.x / self.sides.x).floor(),
            p.y - self.sides.y * (p.y / self.sides.y).floor(),
            p.z - self.sides.z * (p.z / self.sides.z).floor(),
        )
    }
}

impl PeriodicBox for CuboidBox {
    fn min_image_vector(&self, a: &NVec3, b: &NVec3) -> NVec3 {
        let mut r = b - a;
        for k in 0..3 {
            r[k] -= self.sides[k] * (r[k] / self.sides[k]).round();
        }
        r
    }

    fn volume(&self) -> f64 {
        self.sides.x * self.sides.y * self.sides.z
    }

    fn side_lengths(&self) -> NVec3 {
        self.sides
    }
}
