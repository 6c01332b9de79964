use crate::cli::BatchArgs;
use crate::config::{FlagOverrides, build_config};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use molflow::{
    core::io::{
        json::{JsonFile, JsonMetadata},
        traits::MoleculeFile,
    },
    engine::progress::ProgressReporter,
    workflows::{self, layout::LayoutRequest},
};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub async fn run(args: BatchArgs) -> Result<()> {
    let config = build_config(&args.config, &FlagOverrides::default())?;

    info!("Reading molecule list from {:?}", &args.input);
    let content = fs::read_to_string(&args.input)?;
    let requests = parse_requests(&content);
    if requests.is_empty() {
        warn!("No molecules listed in {:?}.", &args.input);
        return Err(CliError::Argument(format!(
            "'{}' contains no molecule entries",
            args.input.display()
        )));
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    eprintln!("Laying out {} molecule(s)...", requests.len());
    let layouts = tokio::task::block_in_place(|| {
        workflows::layout::build_layouts(&requests, &config.layout, &reporter)
    })?;
    progress_handler.clear();

    fs::create_dir_all(&args.output)?;
    let mut used_names = HashSet::new();
    for (i, layout) in layouts.iter().enumerate() {
        let stem = unique_stem(
            output_stem(layout.request.display_name.as_deref(), i + 1),
            &mut used_names,
        );
        let path: PathBuf = args.output.join(format!("{}.json", stem));
        if !layout.warnings.is_empty() {
            warn!(
                "'{}' parsed with {} warning(s).",
                layout.request.notation,
                layout.warnings.len()
            );
        }
        debug!("Writing {:?}", &path);
        JsonFile::write_to_path(
            &layout.graph,
            &JsonMetadata {
                name: layout.request.display_name.clone(),
            },
            &path,
        )
        .map_err(|e| CliError::FileParsing {
            path: path.clone(),
            source: e.into(),
        })?;
    }

    eprintln!(
        "✓ {} layout(s) written to: {}",
        layouts.len(),
        args.output.display()
    );
    Ok(())
}

/// One request per non-blank line that does not start with `#`. The first
/// whitespace-separated token is the notation; the rest of the line is the name.
fn parse_requests(content: &str) -> Vec<LayoutRequest> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| match line.split_once(char::is_whitespace) {
            Some((notation, name)) if !name.trim().is_empty() => {
                LayoutRequest::named(notation, name.trim())
            }
            _ => LayoutRequest::new(line.split_whitespace().next().unwrap_or(line)),
        })
        .collect()
}

fn output_stem(name: Option<&str>, index: usize) -> String {
    let sanitized: String = name
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let sanitized = sanitized.trim_matches('-');
    if sanitized.is_empty() {
        format!("molecule-{:03}", index)
    } else {
        sanitized.to_string()
    }
}

fn unique_stem(stem: String, used: &mut HashSet<String>) -> String {
    if used.insert(stem.clone()) {
        return stem;
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{}-{}", stem, suffix);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ConfigArgs;

    #[test]
    fn list_parsing_skips_comments_and_blank_lines() {
        let requests = parse_requests("# solvents\nCCO ethanol\n\n  O  \nCC(=O)O acetic acid\n");
        assert_eq!(
            requests,
            vec![
                LayoutRequest::named("CCO", "ethanol"),
                LayoutRequest::new("O"),
                LayoutRequest::named("CC(=O)O", "acetic acid"),
            ]
        );
    }

    #[test]
    fn output_stems_are_sanitized_and_numbered() {
        assert_eq!(output_stem(Some("Acetic Acid"), 1), "acetic-acid");
        assert_eq!(output_stem(Some("///"), 7), "molecule-007");
        assert_eq!(output_stem(None, 12), "molecule-012");
    }

    #[test]
    fn repeated_stems_get_suffixes() {
        let mut used = HashSet::new();
        assert_eq!(unique_stem("water".into(), &mut used), "water");
        assert_eq!(unique_stem("water".into(), &mut used), "water-2");
        assert_eq!(unique_stem("water".into(), &mut used), "water-3");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn writes_one_graph_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("molecules.txt");
        fs::write(&input, "CCO ethanol\nC#N\nC1CCCCC1 cyclohexane\n").unwrap();
        let output = dir.path().join("out");

        run(BatchArgs {
            input,
            output: output.clone(),
            config: ConfigArgs::default(),
        })
        .await
        .unwrap();

        let (ethanol, metadata) = JsonFile::read_from_path(output.join("ethanol.json")).unwrap();
        assert_eq!(ethanol.atom_count(), 3);
        assert_eq!(metadata.name.as_deref(), Some("ethanol"));
        let (nitrile, _) = JsonFile::read_from_path(output.join("molecule-002.json")).unwrap();
        assert_eq!(nitrile.bond_count(), 1);
        assert!(output.join("cyclohexane.json").exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_list_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.txt");
        fs::write(&input, "# nothing here\n\n").unwrap();
        let result = run(BatchArgs {
            input,
            output: dir.path().join("out"),
            config: ConfigArgs::default(),
        })
        .await;
        assert!(matches!(result, Err(CliError::Argument(_))));
    }
}
