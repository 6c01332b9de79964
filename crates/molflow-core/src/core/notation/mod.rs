//! # Structural Notation Module
//!
//! A deliberately permissive parser for SMILES-like line notation. It recognises element
//! atoms (including case-folded aromatic atoms and bracket atoms), bond-order symbols,
//! single-digit ring closures, branches and component separators. Everything else is
//! skipped with a [`ParseWarning`].
//!
//! Parsing never fails: malformed input yields a partial or empty graph so the caller
//! always has something to render. Atoms are created at the origin; coordinates are
//! assigned later by the embedding engine.

mod parser;
mod warning;

pub use parser::ParseReport;
pub use warning::ParseWarning;

use crate::core::models::graph::MoleculeGraph;
use parser::NotationParser;
use tracing::{debug, instrument};

/// Parses structural notation into a molecule graph, logging any warnings.
///
/// # Examples
///
/// ```
/// use molflow::core::notation::parse;
///
/// let graph = parse("C1CCCCC1");
/// assert_eq!(graph.atom_count(), 6);
/// assert_eq!(graph.bond_count(), 6);
/// ```
pub fn parse(input: &str) -> MoleculeGraph {
    parse_with_report(input).graph
}

/// Parses structural notation and returns the graph together with every warning raised.
#[instrument(level = "debug", skip_all, fields(len = input.len()))]
pub fn parse_with_report(input: &str) -> ParseReport {
    let report = NotationParser::new(input).run();
    if !report.is_clean() {
        debug!(
            warnings = report.warnings.len(),
            "Structural notation parsed with warnings."
        );
        for warning in &report.warnings {
            debug!("{}", warning);
        }
    }
    report
}
