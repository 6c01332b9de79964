use crate::core::io::traits::MoleculeFile;
use crate::core::models::atom::Atom;
use crate::core::models::graph::MoleculeGraph;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XyzMetadata {
    /// The free-text second line of the file.
    pub comment: String,
}

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("Header declares {declared} atoms but the file contains {found}")]
    AtomCountMismatch { declared: usize, found: usize },
}

#[derive(Debug, Error)]
pub enum XyzParseErrorKind {
    #[error("Missing atom count header")]
    MissingHeader,
    #[error("Invalid atom count '{0}'")]
    InvalidCount(String),
    #[error("Atom record needs an element and three coordinates")]
    IncompleteRecord,
    #[error("Invalid coordinate '{0}'")]
    InvalidFloat(String),
    #[error("Coordinate '{0}' is not a finite number")]
    NonFiniteCoordinate(String),
}

/// The plain XYZ coordinate format. It carries no connectivity, so graphs read from it
/// have no bonds; bonds are dropped on write.
pub struct XyzFile;

fn parse_coordinate(value: &str, line: usize) -> Result<f64, XyzError> {
    let parsed: f64 = value.parse().map_err(|_| XyzError::Parse {
        line,
        kind: XyzParseErrorKind::InvalidFloat(value.to_string()),
    })?;
    if !parsed.is_finite() {
        return Err(XyzError::Parse {
            line,
            kind: XyzParseErrorKind::NonFiniteCoordinate(value.to_string()),
        });
    }
    Ok(parsed)
}

impl MoleculeFile for XyzFile {
    type Metadata = XyzMetadata;
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead) -> Result<(MoleculeGraph, Self::Metadata), Self::Error> {
        let mut lines = reader.lines().enumerate();

        let declared = match lines.next() {
            Some((_, header)) => {
                let header = header?;
                let trimmed = header.trim();
                trimmed.parse::<usize>().map_err(|_| XyzError::Parse {
                    line: 1,
                    kind: XyzParseErrorKind::InvalidCount(trimmed.to_string()),
                })?
            }
            None => {
                return Err(XyzError::Parse {
                    line: 1,
                    kind: XyzParseErrorKind::MissingHeader,
                });
            }
        };

        let comment = match lines.next() {
            Some((_, line)) => line?.trim_end().to_string(),
            None => String::new(),
        };

        let mut graph = MoleculeGraph::new();
        for (index, line) in lines {
            let line = line?;
            let line_num = index + 1;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 {
                return Err(XyzError::Parse {
                    line: line_num,
                    kind: XyzParseErrorKind::IncompleteRecord,
                });
            }
            let position = Point3::new(
                parse_coordinate(fields[1], line_num)?,
                parse_coordinate(fields[2], line_num)?,
                parse_coordinate(fields[3], line_num)?,
            );
            graph.add_atom(Atom::with_position(fields[0], position));
        }

        if graph.atom_count() != declared {
            return Err(XyzError::AtomCountMismatch {
                declared,
                found: graph.atom_count(),
            });
        }

        Ok((graph, XyzMetadata { comment }))
    }

    fn write_to(
        graph: &MoleculeGraph,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        writeln!(writer, "{}", graph.atom_count())?;
        writeln!(writer, "{}", metadata.comment.replace('\n', " "))?;
        for atom in graph.atoms() {
            writeln!(
                writer,
                "{:<2} {:>12.6} {:>12.6} {:>12.6}",
                atom.element,
                atom.x(),
                atom.y(),
                atom.z()
            )?;
        }
        Ok(())
    }
}
