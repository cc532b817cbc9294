pub mod error;
pub mod simulation;
pub mod analysis;
pub mod configuration;
pub mod benchmark;

pub use error::{AnalysisError, Result};

pub use simulation::states::{Particle, Snapshot, NVec3, NMat3};
pub use simulation::periodic_box::{PeriodicBox, CuboidBox};
pub use simulation::cell_list::{SpatialIndex, CellList, AllPairs};
pub use simulation::scenario::{Scenario, SnapshotReport};

pub use analysis::geometry::{spherocylinder_distance, axis_angle};
pub use analysis::contacts::{ContactCriteria, build_contacts};
pub use analysis::clusters::{ClusterPartition, UnionFind};
pub use analysis::nematic::{NematicOrder, NematicConfig, NematicReport, ClusterOrder, ReferenceAxis};
pub use analysis::cavity::{CavitySampler, CavityConfig, CavityReport, CavityBin};

pub use configuration::config::{ScenarioConfig, BoxConfig, NematicSection, CavitySection, SnapshotConfig, ParticleConfig};

pub use benchmark::benchmark::{bench_contacts, bench_cavity};
