use crate::core::models::graph::MoleculeGraph;
use crate::core::notation::{ParseWarning, parse_with_report};
use crate::engine::config::{EmbeddingConfig, LayoutConfig};
use crate::engine::embedding::embed_with;
use crate::engine::error::EngineError;
use crate::engine::normalize::normalize;
use crate::engine::progress::{Phase, Progress, ProgressReporter};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Where the coordinates of a graph come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoordinateSource {
    /// Computed by the embedding engine.
    #[default]
    Computed,
    /// Supplied by an external structure source.
    ExternallySupplied,
    /// Suggested by a generative service.
    AiSuggested,
}

/// A structural-notation string plus an optional display name. The name is carried
/// through for labelling only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub notation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl LayoutRequest {
    pub fn new(notation: impl Into<String>) -> Self {
        Self {
            notation: notation.into(),
            display_name: None,
        }
    }

    pub fn named(notation: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            notation: notation.into(),
            display_name: Some(display_name.into()),
        }
    }
}

/// A finished layout together with the request it answers.
#[derive(Debug, Clone)]
pub struct Layout {
    pub request: LayoutRequest,
    pub graph: MoleculeGraph,
    pub warnings: Vec<ParseWarning>,
}

/// Parses, embeds and normalizes `input` with the default configuration.
///
/// Never fails: malformed notation produces a partial or empty graph.
pub fn layout(input: &str) -> MoleculeGraph {
    let mut graph = parse_with_report(input).graph;
    embed_with(
        &mut graph,
        &EmbeddingConfig::default(),
        &ProgressReporter::new(),
    );
    normalize(&mut graph);
    graph
}

/// Parses, embeds and normalizes `input` with `config`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidConfig`] if the embedding configuration is invalid.
pub fn build_layout(
    input: &str,
    config: &LayoutConfig,
    reporter: &ProgressReporter,
) -> Result<MoleculeGraph, EngineError> {
    run(&LayoutRequest::new(input), config, reporter).map(|layout| layout.graph)
}

/// Runs the layout pipeline for a single request, keeping parse warnings.
#[instrument(skip_all, name = "layout_workflow", fields(notation = %request.notation))]
pub fn run(
    request: &LayoutRequest,
    config: &LayoutConfig,
    reporter: &ProgressReporter,
) -> Result<Layout, EngineError> {
    config.embedding.validate()?;

    let report = reporter.phase(Phase::Parsing, || parse_with_report(&request.notation));
    if !report.is_clean() {
        warn!(
            warnings = report.warnings.len(),
            "Notation contained unsupported or malformed tokens."
        );
        reporter.report(Progress::Notice(format!(
            "{} token(s) of '{}' were skipped or repaired",
            report.warnings.len(),
            request.notation
        )));
    }

    let mut graph = report.graph;
    prepare_graph(&mut graph, CoordinateSource::Computed, &config.embedding, reporter);

    info!(
        atoms = graph.atom_count(),
        bonds = graph.bond_count(),
        "Layout complete."
    );
    Ok(Layout {
        request: request.clone(),
        graph,
        warnings: report.warnings,
    })
}

/// Brings a graph into the normalized viewing frame.
///
/// Only [`CoordinateSource::Computed`] graphs are embedded; externally supplied and
/// suggested coordinates are kept and only normalized.
pub fn prepare_graph(
    graph: &mut MoleculeGraph,
    source: CoordinateSource,
    config: &EmbeddingConfig,
    reporter: &ProgressReporter,
) {
    if source == CoordinateSource::Computed {
        embed_with(graph, config, reporter);
    }
    reporter.phase(Phase::Normalization, || normalize(graph));
}

/// Lays out a batch of independent requests, in parallel when the `parallel` feature is
/// enabled. Results keep the order of `requests`.
#[instrument(skip_all, name = "batch_layout_workflow", fields(count = requests.len()))]
pub fn build_layouts(
    requests: &[LayoutRequest],
    config: &LayoutConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<Layout>, EngineError> {
    config.embedding.validate()?;
    reporter.report(Progress::PhaseStart(Phase::BatchLayout));
    reporter.report(Progress::StepsStart {
        total: requests.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = requests.iter();

    #[cfg(feature = "parallel")]
    let iterator = requests.par_iter();

    let results: Vec<Result<Layout, EngineError>> = iterator
        .map(|request| {
            let layout = run(request, config, &ProgressReporter::new());
            reporter.report(Progress::Step);
            layout
        })
        .collect();

    reporter.report(Progress::StepsFinish);
    reporter.report(Progress::PhaseFinish(Phase::BatchLayout));

    let layouts = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    info!(molecules = layouts.len(), "Batch layout complete.");
    Ok(layouts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::engine::normalize::bounding_box;
    use crate::engine::projection::project;
    use nalgebra::Point3;

    #[test]
    fn ethanol_end_to_end() {
        let graph = layout("CCO");
        assert_eq!(graph.atom_count(), 3);

        let cc = graph.bond_length(0).unwrap();
        let co = graph.bond_length(1).unwrap();
        assert!((cc - co).abs() < 0.1 * cc);

        let primitives = project(&graph, 0.0, 0.0, 100.0);
        let points: Vec<(f64, f64)> = primitives
            .iter()
            .filter_map(|p| p.as_atom())
            .map(|m| (m.view_x, m.view_y))
            .collect();
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|(x, y)| x.is_finite() && y.is_finite()));
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let (dx, dy) = (points[i].0 - points[j].0, points[i].1 - points[j].1);
                assert!(dx.hypot(dy) > 1.0);
            }
        }
    }

    #[test]
    fn layout_output_is_normalized() {
        let graph = layout("CN1C=NC2=C1C(=O)N(C(=O)N2C)C");
        let bb = bounding_box(&graph).unwrap();
        assert!((bb.max_extent() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn malformed_input_still_lays_out() {
        let request = LayoutRequest::new("C(C)))?=");
        let result = run(&request, &LayoutConfig::default(), &ProgressReporter::new()).unwrap();
        assert_eq!(result.graph.atom_count(), 2);
        assert!(!result.warnings.is_empty());

        assert!(layout("").is_empty());
    }

    #[test]
    fn build_layout_rejects_invalid_configuration() {
        let mut config = LayoutConfig::default();
        config.embedding.ideal_bond_length = f64::INFINITY;
        let result = build_layout("CC", &config, &ProgressReporter::new());
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }

    #[test]
    fn batch_preserves_request_order_and_names() {
        let requests = vec![
            LayoutRequest::named("CCO", "ethanol"),
            LayoutRequest::new("C#N"),
            LayoutRequest::named("c1ccccc1", "benzene"),
        ];
        let layouts =
            build_layouts(&requests, &LayoutConfig::default(), &ProgressReporter::new()).unwrap();
        let counts: Vec<usize> = layouts.iter().map(|l| l.graph.atom_count()).collect();
        assert_eq!(counts, vec![3, 2, 6]);
        assert_eq!(layouts[0].request.display_name.as_deref(), Some("ethanol"));
        assert_eq!(layouts[1].request.display_name, None);
        assert_eq!(layouts[2].graph, layout("c1ccccc1"));
    }

    #[test]
    fn supplied_coordinates_are_normalized_not_embedded() {
        let mut graph = MoleculeGraph::new();
        graph.add_atom(Atom::with_position("C", Point3::new(0.0, 0.0, 0.0)));
        graph.add_atom(Atom::with_position("O", Point3::new(4.0, 0.0, 0.0)));
        graph
            .add_bond(0, 1, crate::core::models::topology::BondOrder::Double)
            .unwrap();

        for source in [
            CoordinateSource::ExternallySupplied,
            CoordinateSource::AiSuggested,
        ] {
            let mut supplied = graph.clone();
            prepare_graph(
                &mut supplied,
                source,
                &EmbeddingConfig::default(),
                &ProgressReporter::new(),
            );
            assert_eq!(supplied.atoms()[0].position, Point3::new(-1.0, 0.0, 0.0));
            assert_eq!(supplied.atoms()[1].position, Point3::new(1.0, 0.0, 0.0));
        }

        let mut computed = graph.clone();
        prepare_graph(
            &mut computed,
            CoordinateSource::Computed,
            &EmbeddingConfig::default(),
            &ProgressReporter::new(),
        );
        assert_ne!(computed.atoms()[1].position, Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn run_reports_each_pipeline_phase() {
        use std::sync::Mutex;
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if !matches!(event, Progress::Step) {
                seen.lock().unwrap().push(event);
            }
        }));
        run(&LayoutRequest::new("C?O"), &LayoutConfig::default(), &reporter).unwrap();
        drop(reporter);

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen[0], Progress::PhaseStart(Phase::Parsing));
        assert_eq!(seen[1], Progress::PhaseFinish(Phase::Parsing));
        assert!(matches!(&seen[2], Progress::Notice(text) if text.contains("C?O")));
        assert_eq!(
            seen[3..],
            [
                Progress::PhaseStart(Phase::Embedding),
                Progress::StepsStart { total: 240 },
                Progress::StepsFinish,
                Progress::PhaseFinish(Phase::Embedding),
                Progress::PhaseStart(Phase::Normalization),
                Progress::PhaseFinish(Phase::Normalization),
            ]
        );
    }
}
