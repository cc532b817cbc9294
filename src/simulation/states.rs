//! Core state types for one analysed snapshot.
//!
//! A `Particle` carries a position and an orientation frame whose rows are
//! the three body axes `v1`, `v2`, `v3`. `v3` is the long (rod) axis.
//! A `Snapshot` is the ordered particle list handed to the analyses; the
//! position in the list is the particle index.

use nalgebra::{Matrix3, Vector3};
pub type NVec3 = Vector3<f64>;
pub type NMat3 = Matrix3<f64>;

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: NVec3, // position
    pub orientation: NMat3, // rows are the body axes v1, v2, v3
    pub species: Option<u32>, // optional type tag
}

impl Particle {
    /// Particle at `x` with the identity frame (v3 along z)
    pub fn new(x: NVec3) -> Self {
        Self {
            x,
            orientation: NMat3::identity(),
            species: None,
        }
    }

    /// Particle at `x` whose body axes are `v1`, `v2`, `v3`
    pub fn with_axes(x: NVec3, v1: NVec3, v2: NVec3, v3: NVec3) -> Self {
        Self {
            x,
            orientation: NMat3::from_rows(&[v1.transpose(), v2.transpose(), v3.transpose()]),
            species: None,
        }
    }

    /// Body axis `k` (0, 1, 2), i.e. row `k` of the orientation frame
    pub fn axis(&self, k: usize) -> NVec3 {
        self.orientation.row(k).transpose()
    }

    /// Axis `k` of the transposed frame, i.e. column `k` of the orientation
    pub fn transposed_axis(&self, k: usize) -> NVec3 {
        self.orientation.column(k).into_owned()
    }

    /// Long body axis used for rod geometry and directors
    pub fn rod_axis(&self) -> NVec3 {
        self.axis(2)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub particles: Vec<Particle>, // index-stable particle records
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
