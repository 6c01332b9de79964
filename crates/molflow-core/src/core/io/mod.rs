//! Provides input/output functionality for molecule graph file formats.
//!
//! The JSON format is the primary data contract (atoms with element and coordinates,
//! bonds with endpoint indices and order). XYZ is supported for exchanging coordinates
//! with other tools; it carries no bonds.

pub mod json;
pub mod traits;
pub mod xyz;
