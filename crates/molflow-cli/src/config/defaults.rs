use molflow::engine::config::{EmbeddingConfig, LayoutConfig, ProjectionConfig};

/// Built-in values used when neither the command line nor a config file sets them.
pub struct DefaultsConfig {
    pub embedding: EmbeddingConfig,
    pub offload_threshold: usize,
    pub width: u32,
    pub height: u32,
    pub scale: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub atom_radius: f64,
    pub bond_width: f64,
    pub background: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let layout = LayoutConfig::default();
        let projection = ProjectionConfig::default();
        Self {
            embedding: layout.embedding,
            offload_threshold: layout.offload_threshold,
            width: 600,
            height: 600,
            scale: 200.0,
            pitch: 15.0,
            yaw: 30.0,
            atom_radius: projection.atom_radius,
            bond_width: projection.bond_width,
            background: "#ffffff".to_string(),
        }
    }
}
