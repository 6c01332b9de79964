use molflow::engine::config::{LayoutConfig, ProjectionConfig};
use molflow::engine::projection::Camera;

/// Image and camera settings for a rendered frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub view_scale: f64,
    pub camera: Camera,
    /// Centred on the image.
    pub projection: ProjectionConfig,
    pub background: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub layout: LayoutConfig,
    pub render: RenderSettings,
}
