//! Scene configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::SceneError;

/// Configuration for a scene runtime.
///
/// Every field has a default, so a JSON file only needs to name what it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Status orb / timer refresh interval in seconds of scene time (default: 0.5)
    pub status_interval_secs: f64,

    /// Stats refetch interval in seconds of scene time (default: 30)
    pub stats_interval_secs: f64,

    /// Activation poll budget (default: 20)
    pub activation_max_attempts: u32,

    /// Delay between activation polls in milliseconds (default: 500)
    pub activation_poll_interval_ms: u64,

    /// Looping placeholder shown when nothing is selected
    pub fallback_video_url: String,

    /// Fallback playback volume [0, 1] (default: 0.5)
    pub fallback_volume: f32,

    /// Live playback volume [0, 1] (default: 0.8)
    pub live_volume: f32,

    /// Decoration seed (None = draw from the context)
    pub seed: Option<u64>,

    /// Anchor of the hologram centre piece [x, y, z]
    pub hologram_center: [f64; 3],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            status_interval_secs: 0.5,
            stats_interval_secs: 30.0,
            activation_max_attempts: 20,
            activation_poll_interval_ms: 500,
            fallback_video_url: "https://media.thestatic.tv/fallback-loop.mp4".to_string(),
            fallback_volume: 0.5,
            live_volume: 0.8,
            seed: None,
            hologram_center: [8.0, 1.8, 8.0],
        }
    }
}

impl SceneConfig {
    /// Parses and validates a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, SceneError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Rejects values the runtime cannot work with.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.status_interval_secs.is_nan() || self.status_interval_secs <= 0.0 {
            return Err(SceneError::invalid("status_interval_secs must be > 0"));
        }
        if self.stats_interval_secs.is_nan() || self.stats_interval_secs <= 0.0 {
            return Err(SceneError::invalid("stats_interval_secs must be > 0"));
        }
        if self.activation_max_attempts == 0 {
            return Err(SceneError::invalid("activation_max_attempts must be >= 1"));
        }
        for (name, volume) in [
            ("fallback_volume", self.fallback_volume),
            ("live_volume", self.live_volume),
        ] {
            if !(0.0..=1.0).contains(&volume) {
                return Err(SceneError::invalid(format!("{name} must be within [0, 1]")));
            }
        }
        if self.fallback_video_url.trim().is_empty() {
            return Err(SceneError::invalid("fallback_video_url must not be empty"));
        }
        Ok(())
    }

    /// Poll interval as a Duration.
    pub fn activation_poll_interval(&self) -> Duration {
        Duration::from_millis(self.activation_poll_interval_ms)
    }
}
