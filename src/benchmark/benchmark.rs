//! Timing harness for the analysis pipelines
//!
//! Prints plain tables; the CSV variant can be pasted straight into a
//! spreadsheet to graph.

use std::time::Instant;

use crate::analysis::cavity::{CavityConfig, CavitySampler};
use crate::analysis::contacts::{build_contacts, ContactCriteria};
use crate::error::Result;
use crate::simulation::cell_list::{AllPairs, CellList};
use crate::simulation::periodic_box::CuboidBox;
use crate::simulation::states::{NVec3, Particle};

/// Rods at a fixed number density, so the box grows with `n`
const DENSITY: f64 = 0.1;

fn make_criteria() -> ContactCriteria {
    ContactCriteria {
        rod_length: 1.0,
        distance_cutoff: 0.5,
        angle_cutoff: 0.3,
    }
}

/// Helper to build `n` deterministic rods in a cubic box at `DENSITY`
fn make_rods(n: usize) -> Result<(Vec<Particle>, CuboidBox)> {
    let side = (n as f64 / DENSITY).cbrt();
    let sim_box = CuboidBox::cubic(side)?;

    let particles = (0..n)
        .map(|i| {
            let i_f = i as f64;
            // deterministic positions, no rand needed
            let x = NVec3::new(
                (0.5 + 0.5 * (i_f * 0.37).sin()) * side,
                (0.5 + 0.5 * (i_f * 0.13).cos()) * side,
                (0.5 + 0.5 * (i_f * 0.07).sin()) * side,
            );
            let v3 = NVec3::new(1.0, 0.1 * (i_f * 0.11).sin(), 0.1 * (i_f * 0.17).cos()).normalize();
            let v1 = v3.cross(&NVec3::z()).normalize();
            let v2 = v3.cross(&v1);
            Particle::with_axes(x, v1, v2, v3)
        })
        .collect();

    Ok((particles, sim_box))
}

/// Contact graph construction: brute force vs cell list
pub fn bench_contacts() -> Result<()> {
    let ns = [200, 400, 800, 1600, 3200, 6400];
    let criteria = make_criteria();

    for n in ns {
        let (particles, sim_box) = make_rods(n)?;

        let mut all_pairs = AllPairs::new(criteria.search_radius());
        let mut cells = CellList::new(&sim_box, criteria.search_radius())?;

        // Warm up
        build_contacts(&particles, &sim_box, &mut all_pairs, &criteria)?;
        build_contacts(&particles, &sim_box, &mut cells, &criteria)?;

        // Time brute force
        let t0 = Instant::now();
        let direct = build_contacts(&particles, &sim_box, &mut all_pairs, &criteria)?;
        let dt_direct = t0.elapsed().as_secs_f64();

        // Time cell list
        let t1 = Instant::now();
        let celled = build_contacts(&particles, &sim_box, &mut cells, &criteria)?;
        let dt_cells = t1.elapsed().as_secs_f64();

        println!(
            "N = {n:5}, all pairs = {:8.6} s, cells = {:8.6} s, contacts = {} / {}",
            dt_direct,
            dt_cells,
            direct.len(),
            celled.len()
        );
    }

    Ok(())
}

/// Cavity sampler throughput, CSV: N,tries,ms_per_snapshot
pub fn bench_cavity() -> Result<()> {
    println!("N,tries,ms");

    for n in (500..=4000).step_by(500) {
        let (particles, sim_box) = make_rods(n)?;
        let config = CavityConfig {
            tries: 20_000,
            ..CavityConfig::default()
        };
        let mut cells = CellList::new(&sim_box, config.max_distance)?;
        let mut sampler = CavitySampler::new(config, &sim_box, Some(42))?;

        let snapshots = 3;
        let t0 = Instant::now();
        for _ in 0..snapshots {
            sampler.compute(&particles, &sim_box, &mut cells)?;
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / snapshots as f64;

        println!("{},{},{:.6}", n, sampler.tries(), ms);
    }

    Ok(())
}
