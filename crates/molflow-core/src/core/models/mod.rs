//! # Core Models Module
//!
//! Data structures used to represent molecules throughout molflow.
//!
//! ## Key Components
//!
//! - [`atom`] - A single atom: element symbol and 3D position
//! - [`topology`] - Bonds and bond orders
//! - [`graph`] - The `MoleculeGraph`, an ordered list of atoms and bonds with index
//!   invariants
//! - [`element`] - Static element table (names, colours, display radii)
//!
//! ## Usage
//!
//! ```
//! use molflow::core::models::atom::Atom;
//! use molflow::core::models::graph::MoleculeGraph;
//! use molflow::core::models::topology::BondOrder;
//!
//! let mut graph = MoleculeGraph::new();
//! let c = graph.add_atom(Atom::new("C"));
//! let o = graph.add_atom(Atom::new("O"));
//! graph.add_bond(c, o, BondOrder::Double).unwrap();
//! assert_eq!(graph.bond_count(), 1);
//! ```

pub mod atom;
pub mod element;
pub mod graph;
pub mod topology;
