use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::graph::GraphError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    InvalidConfig {
        #[from]
        source: ConfigError,
    },

    #[error("Invalid molecule graph: {source}")]
    Graph {
        #[from]
        source: GraphError,
    },

    #[error("Camera input must be finite (pitch: {pitch}, yaw: {yaw})")]
    InvalidCamera { pitch: f64, yaw: f64 },

    #[error("Failed to start layout worker: {0}")]
    WorkerSpawn(std::io::Error),

    #[error("Layout worker disconnected")]
    WorkerDisconnected,
}
