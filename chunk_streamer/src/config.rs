//! Streamer settings

use object_pool::prelude::{Config, PoolConfig};
use serde::{Deserialize, Serialize};

/// How the demo streams terrain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamerConfig {
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Side length of one square chunk
    pub chunk_width: f32,
    /// Distance from the viewer that must be covered by chunks
    pub view_range: f32,
    /// Simulated frames
    pub ticks: u32,
    /// Viewer speed along +X per tick
    pub viewer_speed: f32,
    /// Random sideways drift per tick
    pub viewer_jitter: f32,
    /// Policy of the chunk pool
    pub chunk_pool: PoolConfig,
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            chunk_width: 20.0,
            view_range: 30.0,
            ticks: 120,
            viewer_speed: 2.5,
            viewer_jitter: 1.0,
            chunk_pool: PoolConfig::new(16),
        }
    }
}

impl Config for StreamerConfig {}
