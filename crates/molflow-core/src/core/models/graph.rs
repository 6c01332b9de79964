use super::atom::Atom;
use super::topology::{Bond, BondOrder};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum GraphError {
    #[error("Bond references atom {index}, but the graph only has {atom_count} atoms")]
    AtomIndexOutOfRange { index: usize, atom_count: usize },
    #[error("Bond would connect atom {0} to itself")]
    SelfBond(usize),
}

/// A molecule as an ordered list of atoms and an ordered list of bonds between them.
///
/// Every bond references two distinct, existing atoms; the constructors enforce this so
/// downstream stages can index atoms without checking. Duplicate bonds between the same
/// pair of atoms are kept as-is.
///
/// The graph is built by the parser, mutated in place by the embedding engine and the
/// normalizer, and treated as immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphRecord")]
pub struct MoleculeGraph {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
}

#[derive(Deserialize)]
struct GraphRecord {
    atoms: Vec<Atom>,
    #[serde(default)]
    bonds: Vec<Bond>,
}

impl TryFrom<GraphRecord> for MoleculeGraph {
    type Error = GraphError;

    fn try_from(record: GraphRecord) -> Result<Self, Self::Error> {
        let mut graph = MoleculeGraph {
            atoms: record.atoms,
            bonds: Vec::with_capacity(record.bonds.len()),
        };
        for bond in record.bonds {
            graph.add_bond(bond.from, bond.to, bond.order)?;
        }
        Ok(graph)
    }
}

impl MoleculeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from atoms and bonds, validating every bond.
    pub fn from_parts(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Result<Self, GraphError> {
        GraphRecord { atoms, bonds }.try_into()
    }

    /// Appends an atom and returns its index.
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.atoms.len() - 1
    }

    /// Appends a bond between two existing, distinct atoms and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::AtomIndexOutOfRange`] if either index does not reference an
    /// atom, or [`GraphError::SelfBond`] if both indices are equal.
    pub fn add_bond(
        &mut self,
        from: usize,
        to: usize,
        order: BondOrder,
    ) -> Result<usize, GraphError> {
        let atom_count = self.atoms.len();
        for index in [from, to] {
            if index >= atom_count {
                return Err(GraphError::AtomIndexOutOfRange { index, atom_count });
            }
        }
        if from == to {
            return Err(GraphError::SelfBond(from));
        }
        self.bonds.push(Bond::new(from, to, order));
        Ok(self.bonds.len() - 1)
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Mutable access to the atoms. The slice cannot grow or shrink, so bond indices
    /// stay valid.
    pub fn atoms_mut(&mut self) -> &mut [Atom] {
        &mut self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn bond(&self, index: usize) -> Option<&Bond> {
        self.bonds.get(index)
    }

    /// The most recently added bond, which the parser's bond-order symbols rewrite.
    pub fn last_bond_mut(&mut self) -> Option<&mut Bond> {
        self.bonds.last_mut()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.atoms.iter().map(|a| a.position).collect()
    }

    /// Indices of the atoms bonded to `atom`, in bond order. Duplicate bonds yield
    /// duplicate neighbours.
    pub fn neighbors(&self, atom: usize) -> impl Iterator<Item = usize> + '_ {
        self.bonds.iter().filter_map(move |b| b.partner(atom))
    }

    /// Euclidean length of the bond at `index`.
    pub fn bond_length(&self, index: usize) -> Option<f64> {
        let bond = self.bonds.get(index)?;
        let a = &self.atoms[bond.from];
        let b = &self.atoms[bond.to];
        Some((b.position - a.position).norm())
    }

    /// Pairs of bond indices `(first, duplicate)` that join the same two atoms.
    pub fn duplicate_bonds(&self) -> Vec<(usize, usize)> {
        let mut duplicates = Vec::new();
        for (i, a) in self.bonds.iter().enumerate() {
            for (j, b) in self.bonds.iter().enumerate().skip(i + 1) {
                if a.joins_same_pair(b) {
                    duplicates.push((i, j));
                }
            }
        }
        duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ethanol() -> MoleculeGraph {
        let mut graph = MoleculeGraph::new();
        let c1 = graph.add_atom(Atom::new("C"));
        let c2 = graph.add_atom(Atom::new("C"));
        let o = graph.add_atom(Atom::new("O"));
        graph.add_bond(c1, c2, BondOrder::Single).unwrap();
        graph.add_bond(c2, o, BondOrder::Single).unwrap();
        graph
    }

    #[test]
    fn add_atom_returns_sequential_indices() {
        let mut graph = MoleculeGraph::new();
        assert_eq!(graph.add_atom(Atom::new("C")), 0);
        assert_eq!(graph.add_atom(Atom::new("N")), 1);
        assert_eq!(graph.atom_count(), 2);
        assert!(!graph.is_empty());
    }

    #[test]
    fn add_bond_rejects_out_of_range_indices() {
        let mut graph = ethanol();
        assert_eq!(
            graph.add_bond(0, 3, BondOrder::Single),
            Err(GraphError::AtomIndexOutOfRange {
                index: 3,
                atom_count: 3
            })
        );
        assert_eq!(graph.bond_count(), 2);
    }

    #[test]
    fn add_bond_rejects_self_bonds() {
        let mut graph = ethanol();
        assert_eq!(
            graph.add_bond(1, 1, BondOrder::Double),
            Err(GraphError::SelfBond(1))
        );
    }

    #[test]
    fn duplicate_bonds_are_kept_and_reported() {
        let mut graph = ethanol();
        graph.add_bond(1, 0, BondOrder::Single).unwrap();
        assert_eq!(graph.bond_count(), 3);
        assert_eq!(graph.duplicate_bonds(), vec![(0, 2)]);
    }

    #[test]
    fn neighbors_follow_bond_order() {
        let graph = ethanol();
        assert_eq!(graph.neighbors(1).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(graph.neighbors(2).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn bond_length_measures_atom_distance() {
        let mut graph = ethanol();
        graph.atoms_mut()[1].position = Point3::new(3.0, 4.0, 0.0);
        assert_eq!(graph.bond_length(0), Some(5.0));
        assert_eq!(graph.bond_length(9), None);
    }

    #[test]
    fn json_round_trip_matches_data_contract() {
        let graph = ethanol();
        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json["atoms"][2]["element"], "O");
        assert_eq!(json["bonds"][1]["order"], 1);

        let back: MoleculeGraph = serde_json::from_value(json).unwrap();
        assert_eq!(back, graph);
    }

    #[test]
    fn deserialization_validates_bond_indices() {
        let json = serde_json::json!({
            "atoms": [{ "element": "C", "x": 0.0, "y": 0.0, "z": 0.0 }],
            "bonds": [{ "from": 0, "to": 1, "order": 1 }]
        });
        assert!(serde_json::from_value::<MoleculeGraph>(json).is_err());
    }
}
