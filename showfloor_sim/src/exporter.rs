//! JSON exporter for offline inspection of a run.
//!
//! Exports per-frame poses of every animated object together with the
//! panel and video state at that frame.

use showfloor_core::{AnimatedObject, MetricsSnapshot, SceneRuntime, VideoPresentation};
use showfloor_env::{Collaborator, SceneContext};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A single frame of simulation data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimFrame {
    /// Simulation time in seconds
    pub time_sec: f64,

    /// Poses of every animated object
    pub objects: Vec<ObjectPose>,

    /// Status line text
    pub status: String,

    /// Watch timer text
    pub timer: String,

    /// Video source on screen
    pub video: String,

    /// Events (activation, video switches, etc.)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<SimEvent>,
}

impl SimFrame {
    /// Captures the scene's current state.
    pub fn capture<Ctx, C>(scene: &SceneRuntime<Ctx, C>) -> Self
    where
        Ctx: SceneContext,
        C: Collaborator,
    {
        let panel = scene.status_panel();
        let video = match scene.video_state() {
            VideoPresentation::Fallback => "fallback".to_string(),
            VideoPresentation::Live { url } => url.clone(),
        };
        Self {
            time_sec: scene.clock().elapsed(),
            objects: scene.motion().iter().map(ObjectPose::from).collect(),
            status: panel.status.text.clone(),
            timer: panel.timer.text.clone(),
            video,
            events: Vec::new(),
        }
    }
}

/// Pose of one object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectPose {
    pub id: String,
    pub role: String,
    pub position: [f64; 3],
    /// Quaternion as [x, y, z, w]
    pub rotation: [f64; 4],
    pub scale: [f64; 3],
}

impl From<&AnimatedObject> for ObjectPose {
    fn from(object: &AnimatedObject) -> Self {
        let pose = object.transform();
        let q = pose.rotation.quaternion();
        Self {
            id: object.id.as_uuid().to_string(),
            role: object.role.clone(),
            position: [pose.position.x, pose.position.y, pose.position.z],
            rotation: [q.i, q.j, q.k, q.w],
            scale: [pose.scale.x, pose.scale.y, pose.scale.z],
        }
    }
}

/// Simulation event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimEvent {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl SimEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: None,
        }
    }
}

/// Complete simulation export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Duration in seconds
    pub duration_sec: f64,

    /// All frames
    pub frames: Vec<SimFrame>,

    /// Final results
    pub passed: bool,

    /// Scene counters at the end of the run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsSnapshot>,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            duration_sec: 0.0,
            frames: Vec::new(),
            passed: false,
            metrics: None,
        }
    }

    /// Adds a frame.
    pub fn add_frame(&mut self, frame: SimFrame) {
        self.duration_sec = frame.time_sec;
        self.frames.push(frame);
    }

    /// Attaches an event to the latest frame.
    pub fn add_event(&mut self, event: SimEvent) {
        if let Some(frame) = self.frames.last_mut() {
            frame.events.push(event);
        }
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, passed: bool, metrics: MetricsSnapshot) {
        self.passed = passed;
        self.metrics = Some(metrics);
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
