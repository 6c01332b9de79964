//! Layered configuration: command-line flags, then `--set KEY=VALUE` overrides, then
//! the TOML config file, then built-in defaults.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{FlagOverrides, build_config};
pub use models::{AppConfig, RenderSettings};
