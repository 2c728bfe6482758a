use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub import: ImportConfig,
    pub scene: SceneConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Load every Nth frame (1 = all frames).
    pub frame_stride: usize,
    /// Elevation assigned to agents when the source supplies 2D positions.
    pub agent_elevation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    pub agents_collection: String,
    pub geometry_collection: String,
    pub marker_prefix: String,
    pub path_prefix: String,
    pub boundary_prefix: String,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            import: ImportConfig {
                frame_stride: 1,
                agent_elevation: 0.0,
            },
            scene: SceneConfig {
                agents_collection: "JuPedSim_Agents".to_string(),
                geometry_collection: "JuPedSim_Geometry".to_string(),
                marker_prefix: "Agent_".to_string(),
                path_prefix: "Path_".to_string(),
                boundary_prefix: "Boundary_".to_string(),
            },
        }
    }
}
