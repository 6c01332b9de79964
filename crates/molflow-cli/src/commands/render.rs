use crate::cli::{RenderArgs, SuppliedSource};
use crate::config::{AppConfig, FlagOverrides, build_config};
use crate::error::{CliError, Result};
use crate::svg::SvgRenderer;
use crate::utils::progress::CliProgressHandler;
use molflow::{
    core::io::{json::JsonFile, traits::MoleculeFile, xyz::XyzFile},
    core::models::graph::MoleculeGraph,
    engine::progress::ProgressReporter,
    engine::projection::Projector,
    workflows::{
        self,
        layout::{CoordinateSource, LayoutRequest},
        render::render_frame,
    },
};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

pub async fn run(args: RenderArgs) -> Result<()> {
    let flags = FlagOverrides {
        width: args.width,
        height: args.height,
        scale: args.scale,
        pitch: args.pitch,
        yaw: args.yaw,
    };
    let config = build_config(&args.config, &flags)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let graph = match (&args.coords, &args.notation) {
        (Some(path), _) => {
            let source = match args.source {
                SuppliedSource::External => CoordinateSource::ExternallySupplied,
                SuppliedSource::Ai => CoordinateSource::AiSuggested,
            };
            info!("Loading supplied coordinates from {:?}", path);
            let mut graph = read_coordinates(path)?;
            workflows::layout::prepare_graph(&mut graph, source, &config.layout.embedding, &reporter);
            graph
        }
        (None, Some(notation)) => {
            let request = LayoutRequest::new(notation);
            tokio::task::block_in_place(|| {
                workflows::layout::run(&request, &config.layout, &reporter)
            })?
            .graph
        }
        (None, None) => {
            return Err(CliError::Argument(
                "Either a notation or --coords must be given".to_string(),
            ));
        }
    };
    progress_handler.clear();

    if graph.is_empty() {
        warn!("The molecule has no atoms; writing an empty frame.");
    }

    let (document, primitive_count) = render_svg(&graph, &config);
    fs::write(&args.output, document)?;
    eprintln!(
        "✓ Frame with {} primitive(s) written to: {}",
        primitive_count,
        args.output.display()
    );

    if let Some(path) = &args.primitives {
        write_primitives(&graph, &config, path)?;
        info!("Render primitives written to {:?}", path);
    }

    Ok(())
}

fn read_coordinates(path: &Path) -> Result<MoleculeGraph> {
    let is_xyz = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xyz"));

    let graph = if is_xyz {
        XyzFile::read_from_path(path).map(|(graph, _)| graph).map_err(anyhow::Error::from)
    } else {
        JsonFile::read_from_path(path).map(|(graph, _)| graph).map_err(anyhow::Error::from)
    };
    graph.map_err(|source| CliError::FileParsing {
        path: path.to_path_buf(),
        source,
    })
}

fn render_svg(graph: &MoleculeGraph, config: &AppConfig) -> (String, usize) {
    let settings = &config.render;
    let projector = Projector::new(settings.projection.clone());
    let mut svg = SvgRenderer::new(settings);
    let drawn = render_frame(graph, &settings.camera, &projector, settings.view_scale, &mut svg);
    (svg.into_document(), drawn)
}

fn write_primitives(graph: &MoleculeGraph, config: &AppConfig, path: &Path) -> Result<()> {
    let settings = &config.render;
    let primitives = Projector::new(settings.projection.clone()).project(
        graph,
        &settings.camera,
        settings.view_scale,
    );
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &primitives).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    writer.flush()?;
    Ok(())
}
