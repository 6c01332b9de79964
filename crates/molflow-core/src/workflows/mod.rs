//! # Workflows Module
//!
//! High-level entry points that combine the core models and the engine stages into
//! complete procedures.
//!
//! ## Overview
//!
//! Workflows are what front-ends call. They validate configuration, report progress,
//! log what happened and return results in a form ready for display or export.
//!
//! ## Architecture
//!
//! - **Layout Workflow** ([`layout`]) - Parse, embed and normalize one input or a batch
//!   of inputs; prepare externally supplied coordinates
//! - **Rendering** ([`render`]) - The injected [`render::RenderPort`] and frame replay
//! - **Viewer Session** ([`session`]) - Cached layouts, background offloading and camera
//!   handling for interactive use

pub mod layout;
pub mod render;
pub mod session;
