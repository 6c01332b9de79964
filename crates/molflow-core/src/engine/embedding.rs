use crate::core::models::graph::MoleculeGraph;
use crate::engine::config::EmbeddingConfig;
use crate::engine::progress::{Phase, Progress, ProgressReporter};
use itertools::Itertools;
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;
use tracing::{debug, instrument, trace};

/// Assigns 3D coordinates to every atom of `graph` with the default parameters.
///
/// The relaxation is deterministic: the same graph always yields the same coordinates.
/// Atom and bond identity are untouched; only positions change.
pub fn embed(graph: &mut MoleculeGraph) {
    embed_with(graph, &EmbeddingConfig::default(), &ProgressReporter::new());
}

/// Assigns 3D coordinates to every atom of `graph` using `config`.
///
/// Atoms are seeded on an expanding spiral, then relaxed for `config.iterations` steps of
/// pairwise inverse-square repulsion plus a linear spring along every bond. The result is
/// not normalized.
#[instrument(level = "debug", skip_all, fields(atoms = graph.atom_count(), bonds = graph.bond_count()))]
pub fn embed_with(graph: &mut MoleculeGraph, config: &EmbeddingConfig, reporter: &ProgressReporter) {
    let n = graph.atom_count();
    if n == 0 {
        return;
    }

    let mut positions = seed_positions(n, config);
    if n > 1 {
        reporter.report(Progress::PhaseStart(Phase::Embedding));
        reporter.report(Progress::StepsStart {
            total: config.iterations as u64,
        });
        let mut forces = vec![Vector3::zeros(); n];
        for iter in 0..config.iterations {
            accumulate_forces(graph, &positions, config, &mut forces);
            let damping = config.damping_at(iter);
            for (position, force) in positions.iter_mut().zip(&forces) {
                *position += force * damping;
            }
            if iter % 60 == 0 {
                trace!(iter, damping, "Relaxation step.");
            }
            reporter.report(Progress::Step);
        }
        reporter.report(Progress::StepsFinish);
        reporter.report(Progress::PhaseFinish(Phase::Embedding));
    }

    for (atom, position) in graph.atoms_mut().iter_mut().zip(positions) {
        atom.position = position;
    }
    debug!("Embedding finished.");
}

/// Spiral seed coordinates for `n` atoms. A lone atom sits at the origin.
pub(crate) fn seed_positions(n: usize, config: &EmbeddingConfig) -> Vec<Point3<f64>> {
    if n == 1 {
        return vec![Point3::origin()];
    }
    let max_radius = config.spiral_radius_factor * (n as f64).sqrt();
    (0..n)
        .map(|i| {
            let t = i as f64 / n as f64;
            let angle = t * 4.0 * PI;
            let radius = t * max_radius;
            Point3::new(
                angle.cos() * radius,
                angle.sin() * radius,
                (t - 0.5) * config.z_spread,
            )
        })
        .collect()
}

fn accumulate_forces(
    graph: &MoleculeGraph,
    positions: &[Point3<f64>],
    config: &EmbeddingConfig,
    forces: &mut [Vector3<f64>],
) {
    forces.fill(Vector3::zeros());

    for (i, j) in (0..positions.len()).tuple_combinations() {
        let delta = positions[i] - positions[j];
        let dist = delta.norm().max(config.distance_floor);
        let direction = delta / dist;
        let mut magnitude = config.repulsion_strength / (dist * dist);
        if dist < config.min_separation {
            magnitude += (config.min_separation - dist) * config.overlap_push;
        }
        let push = direction * magnitude;
        forces[i] += push;
        forces[j] -= push;
    }

    for bond in graph.bonds() {
        let delta = positions[bond.to] - positions[bond.from];
        let dist = delta.norm().max(config.distance_floor);
        let direction = delta / dist;
        let pull = direction * ((dist - config.ideal_bond_length) * config.spring_constant);
        forces[bond.from] += pull;
        forces[bond.to] -= pull;
    }
}
