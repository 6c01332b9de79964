use crate::core::models::graph::MoleculeGraph;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing molecule graph file formats.
///
/// Implementors handle format-specific parsing and serialization over generic streams;
/// the path-based helpers are thin wrappers for callers that work with files.
pub trait MoleculeFile {
    /// Format-specific data carried alongside the graph (titles, display names).
    type Metadata: Default;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a molecule graph and its metadata from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<(MoleculeGraph, Self::Metadata), Self::Error>;

    /// Writes a molecule graph and metadata to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(
        graph: &MoleculeGraph,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Writes a molecule graph with default metadata.
    fn write_graph_to(graph: &MoleculeGraph, writer: &mut impl Write) -> Result<(), Self::Error> {
        Self::write_to(graph, &Self::Metadata::default(), writer)
    }

    fn read_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<(MoleculeGraph, Self::Metadata), Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    fn write_to_path<P: AsRef<Path>>(
        graph: &MoleculeGraph,
        metadata: &Self::Metadata,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(graph, metadata, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
