use crate::cli::{LayoutArgs, OutputFormat};
use crate::config::{FlagOverrides, build_config};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use molflow::{
    core::io::{
        json::{JsonFile, JsonMetadata},
        traits::MoleculeFile,
        xyz::{XyzFile, XyzMetadata},
    },
    core::models::graph::MoleculeGraph,
    engine::progress::ProgressReporter,
    workflows::{self, layout::LayoutRequest},
};
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};

pub async fn run(args: LayoutArgs) -> Result<()> {
    let config = build_config(&args.config, &FlagOverrides::default())?;
    let request = match &args.name {
        Some(name) => LayoutRequest::named(&args.notation, name),
        None => LayoutRequest::new(&args.notation),
    };

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the layout workflow...");
    let layout =
        tokio::task::block_in_place(|| workflows::layout::run(&request, &config.layout, &reporter))?;
    progress_handler.clear();

    for warning in &layout.warnings {
        warn!("{}", warning);
    }
    if layout.graph.is_empty() {
        warn!("No atoms were recognized in '{}'.", args.notation);
    }

    match &args.output {
        Some(path) => {
            write_graph(&layout.graph, args.name.clone(), args.format, path)?;
            eprintln!(
                "✓ Layout of {} atom(s) written to: {}",
                layout.graph.atom_count(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_graph_to(&layout.graph, args.name.clone(), args.format, &mut handle)?;
            handle.flush()?;
        }
    }

    Ok(())
}

fn write_graph(
    graph: &MoleculeGraph,
    name: Option<String>,
    format: OutputFormat,
    path: &Path,
) -> Result<()> {
    let result = match format {
        OutputFormat::Json => JsonFile::write_to_path(graph, &JsonMetadata { name }, path)
            .map_err(anyhow::Error::from),
        OutputFormat::Xyz => XyzFile::write_to_path(
            graph,
            &XyzMetadata {
                comment: name.unwrap_or_default(),
            },
            path,
        )
        .map_err(anyhow::Error::from),
    };
    result.map_err(|source| CliError::FileParsing {
        path: path.to_path_buf(),
        source,
    })
}

fn write_graph_to(
    graph: &MoleculeGraph,
    name: Option<String>,
    format: OutputFormat,
    writer: &mut impl Write,
) -> Result<()> {
    match format {
        OutputFormat::Json => JsonFile::write_to(graph, &JsonMetadata { name }, writer)
            .map_err(|e| CliError::Other(e.into())),
        OutputFormat::Xyz => XyzFile::write_to(
            graph,
            &XyzMetadata {
                comment: name.unwrap_or_default(),
            },
            writer,
        )
        .map_err(|e| CliError::Other(e.into())),
    }
}
