//! # Engine Module
//!
//! The computational stages of the layout pipeline and the machinery that schedules them.
//!
//! ## Overview
//!
//! A parsed molecule graph has every atom at the origin. The engine turns it into a
//! viewable arrangement in three stages: force-directed embedding assigns 3D coordinates,
//! normalization centres and rescales them into a canonical box, and projection rotates,
//! perspective-projects and depth-sorts the result into 2D draw primitives. The first two
//! stages run once per input; projection runs on every camera change.
//!
//! ## Architecture
//!
//! - **Embedding** ([`embedding`]) - Deterministic spiral seeding plus damped relaxation
//!   under pairwise repulsion and bond springs
//! - **Normalization** ([`normalize`]) - Bounding-box centring and uniform scaling
//! - **Projection** ([`projection`]) - Rotation, perspective, painter's ordering and
//!   multi-order bond offsets
//! - **Configuration** ([`config`]) - Tunable constants with validated builders
//! - **Caching** ([`cache`]) - Shared normalized layouts keyed by input string
//! - **Background Work** ([`worker`]) - Generation-tagged off-thread layout
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-level error type

pub mod cache;
pub mod config;
pub mod embedding;
pub mod error;
pub mod normalize;
pub mod progress;
pub mod projection;
pub mod worker;
