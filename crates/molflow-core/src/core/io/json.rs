use crate::core::io::traits::MoleculeFile;
use crate::core::models::atom::Atom;
use crate::core::models::graph::MoleculeGraph;
use crate::core::models::topology::Bond;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonMetadata {
    /// Optional display name; not used by any layout algorithm.
    pub name: Option<String>,
}

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid molecule document: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    atoms: &'a [Atom],
    bonds: &'a [Bond],
}

#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    name: Option<String>,
    #[serde(flatten)]
    graph: MoleculeGraph,
}

/// The molecule data contract as a JSON document:
/// `{ "name"?, "atoms": [{ element, x, y, z }], "bonds": [{ from, to, order }] }`.
pub struct JsonFile;

impl MoleculeFile for JsonFile {
    type Metadata = JsonMetadata;
    type Error = JsonError;

    fn read_from(reader: &mut impl BufRead) -> Result<(MoleculeGraph, Self::Metadata), Self::Error> {
        let document: Document = serde_json::from_reader(reader)?;
        Ok((
            document.graph,
            JsonMetadata {
                name: document.name,
            },
        ))
    }

    fn write_to(
        graph: &MoleculeGraph,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let document = DocumentRef {
            name: metadata.name.as_deref(),
            atoms: graph.atoms(),
            bonds: graph.bonds(),
        };
        serde_json::to_writer_pretty(&mut *writer, &document)?;
        writeln!(writer)?;
        Ok(())
    }
}
