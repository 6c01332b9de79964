use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileEmbeddingConfig {
    pub iterations: Option<usize>,
    pub ideal_bond_length: Option<f64>,
    pub min_separation: Option<f64>,
    pub spring_constant: Option<f64>,
    pub repulsion_strength: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileRenderConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub scale: Option<f64>,
    pub pitch: Option<f64>,
    pub yaw: Option<f64>,
    pub atom_radius: Option<f64>,
    pub bond_width: Option<f64>,
    pub background: Option<String>,
}

/// The TOML configuration file. Every key is optional; missing keys fall back to the
/// built-in defaults.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub embedding: Option<FileEmbeddingConfig>,
    pub render: Option<FileRenderConfig>,
    pub offload_threshold: Option<usize>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
