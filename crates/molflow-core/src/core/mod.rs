//! # Core Module
//!
//! This module provides the fundamental data structures and stateless algorithms of
//! molflow: the molecular graph model, the structural-notation parser and the file
//! formats used to exchange graphs with downstream collaborators.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, bonds, the molecule graph and
//!   the static element table
//! - **Structural Notation** ([`notation`]) - Lenient line-notation parser producing
//!   graphs with zeroed coordinates
//! - **File I/O** ([`io`]) - JSON and XYZ readers/writers over generic streams
//! - **Utilities** ([`utils`]) - Geometry helpers shared by the engine
//!
//! Nothing in this module touches the network or holds global mutable state.

pub mod io;
pub mod models;
pub mod notation;
pub mod utils;
