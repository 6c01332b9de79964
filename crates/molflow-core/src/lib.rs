//! # molflow Core Library
//!
//! Turns line-notation chemical strings into 3D atomic arrangements, and turns those
//! arrangements into depth-ordered 2D render primitives for an interactive viewer.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture so that every stage can be tested in
//! isolation and reused by different front-ends.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`MoleculeGraph`, `Atom`, `Bond`),
//!   the permissive structural-notation parser, element data and file formats.
//!
//! - **[`engine`]: The Logic Core.** The force-directed embedding engine, the normalizer,
//!   the perspective projector with painter's-algorithm depth sorting, a layout cache and
//!   a background layout worker with generation-based result superseding.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures built on the engine: the
//!   parse, embed and normalize layout pipeline, the injected rendering port and an
//!   interactive viewer session that projects the cached graph on every rotation.
//!
//! ## Quick Start
//!
//! ```
//! use molflow::engine::projection::project;
//! use molflow::workflows::layout::layout;
//!
//! let graph = layout("CCO");
//! let primitives = project(&graph, 15.0, 30.0, 100.0);
//! assert_eq!(graph.atom_count(), 3);
//! assert!(!primitives.is_empty());
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
