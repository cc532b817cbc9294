//! Build fully-initialized analysis scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! (`Scenario`) containing:
//! - the periodic box (`CuboidBox`)
//! - the snapshots to analyse, in order
//! - the nematic evaluator with its own cell list, if configured
//! - the cavity sampler with its own cell list, if configured
//!
//! Every option is validated here, so `run` only fails on per-snapshot
//! problems.

use crate::analysis::cavity::{CavityReport, CavitySampler};
use crate::analysis::nematic::{NematicOrder, NematicReport};
use crate::configuration::config::ScenarioConfig;
use crate::error::{AnalysisError, Result};
use crate::simulation::cell_list::CellList;
use crate::simulation::periodic_box::CuboidBox;
use crate::simulation::states::Snapshot;

/// Nematic evaluator bundled with the index it queries
pub struct NematicStage {
    pub order: NematicOrder,
    pub cells: CellList,
}

/// Cavity sampler bundled with the index it queries
pub struct CavityStage {
    pub sampler: CavitySampler,
    pub cells: CellList,
}

/// Output of one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotReport {
    pub snapshot: usize,
    pub nematic: Option<NematicReport>,
    pub cavity: Option<CavityReport>,
}

pub struct Scenario {
    pub sim_box: CuboidBox,
    pub snapshots: Vec<Snapshot>,
    pub nematic: Option<NematicStage>,
    pub cavity: Option<CavityStage>,
}

impl Scenario {
    pub fn build(cfg: ScenarioConfig) -> Result<Self> {
        let sim_box = CuboidBox::new(cfg.sim_box.sides()?)?;

        // Snapshots: map `SnapshotConfig` -> runtime `Snapshot`
        let snapshots = cfg
            .snapshots
            .iter()
            .map(|s| s.to_snapshot())
            .collect::<Result<Vec<_>>>()?;

        let nematic = match &cfg.nematic {
            Some(section) => {
                let config = section.to_config()?;
                let cells = CellList::new(&sim_box, config.contacts.search_radius())?;
                Some(NematicStage { order: NematicOrder::new(config)?, cells })
            }
            None => None,
        };

        let cavity = match &cfg.cavity {
            Some(section) => {
                let config = section.to_config()?;
                let cells = CellList::new(&sim_box, config.max_distance)?;
                Some(CavityStage { sampler: CavitySampler::new(config, &sim_box, section.seed)?, cells })
            }
            None => None,
        };

        log::info!(
            "scenario: {} snapshots, nematic {}, cavity {}",
            snapshots.len(),
            if nematic.is_some() { "on" } else { "off" },
            if cavity.is_some() { "on" } else { "off" },
        );

        Ok(Self { sim_box, snapshots, nematic, cavity })
    }

    /// Analyse snapshot `i`
    pub fn analyse(&mut self, i: usize) -> Result<SnapshotReport> {
        let particles = &self
            .snapshots
            .get(i)
            .ok_or(AnalysisError::SnapshotOutOfRange { index: i, len: self.snapshots.len() })?
            .particles;

        // nematic first: a failure here must not advance the cavity totals
        let nematic = match self.nematic.as_mut() {
            Some(stage) => Some(stage.order.compute(particles, &self.sim_box, &mut stage.cells)?),
            None => None,
        };

        let cavity = match self.cavity.as_mut() {
            Some(stage) => Some(stage.sampler.compute(particles, &self.sim_box, &mut stage.cells)?),
            None => None,
        };

        Ok(SnapshotReport { snapshot: i, nematic, cavity })
    }

    /// Analyse every snapshot in order
    pub fn run(&mut self) -> Result<Vec<SnapshotReport>> {
        (0..self.snapshots.len()).map(|i| self.analyse(i)).collect()
    }
}
