//! SimWorld - The simulation harness container.

use crate::collaborator::ScriptedCollaborator;
use crate::context::SimContext;
use crate::exporter::{SimEvent, SimExport, SimFrame};

use showfloor_core::{SceneConfig, SceneRuntime};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Master seed for determinism
    pub seed: u64,

    /// Frame rate in Hz
    pub tick_rate_hz: u32,

    /// Maximum simulation duration in seconds
    pub max_duration_secs: f64,

    /// Scheduler yields after every frame, so background tasks catch up
    pub settle_yields: usize,

    /// Scene configuration under test
    pub scene: SceneConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_rate_hz: 30,
            max_duration_secs: 10.0,
            settle_yields: 16,
            scene: SceneConfig::default(),
        }
    }
}

struct Recorder {
    export: SimExport,
    every: u64,
}

/// The SimWorld - one scene, its scripted SDK client and the virtual clock.
pub struct SimWorld {
    /// Configuration
    pub config: SimConfig,

    /// Shared simulation context (virtual clock)
    pub context: Arc<SimContext>,

    /// The scene under test
    pub scene: SceneRuntime<SimContext, ScriptedCollaborator>,

    /// Attached SDK client, if any
    collaborator: Option<Arc<ScriptedCollaborator>>,

    recorder: Option<Recorder>,

    /// Current tick count
    tick_count: u64,
}

impl SimWorld {
    /// Creates a new SimWorld with the given configuration.
    pub fn new(config: SimConfig) -> Self {
        let context = SimContext::shared(config.seed);
        let scene = SceneRuntime::new(Arc::clone(&context), config.scene.clone());

        Self {
            config,
            context,
            scene,
            collaborator: None,
            recorder: None,
            tick_count: 0,
        }
    }

    /// A fresh scripted client bound to this world's clock.
    pub fn scripted(&self) -> ScriptedCollaborator {
        ScriptedCollaborator::new(Arc::clone(&self.context))
    }

    /// Attaches the SDK client and lets the activation task take its first read.
    pub async fn attach(&mut self, collaborator: Arc<ScriptedCollaborator>) {
        self.scene.attach(Arc::clone(&collaborator));
        self.collaborator = Some(collaborator);
        self.settle().await;
    }

    pub fn collaborator(&self) -> Option<&Arc<ScriptedCollaborator>> {
        self.collaborator.as_ref()
    }

    /// Records every `every`-th frame into an export.
    pub fn enable_export(&mut self, scenario: &str, every: u64) {
        self.recorder = Some(Recorder {
            export: SimExport::new(scenario, self.config.seed),
            every: every.max(1),
        });
    }

    pub fn take_export(&mut self) -> Option<SimExport> {
        self.recorder.take().map(|r| r.export)
    }

    /// Adds an event to the export, if one is being recorded.
    pub fn note(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(t = self.time_secs(), "{}", message);
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.export.add_event(SimEvent::info(message));
        }
    }

    /// Lets spawned tasks run without advancing time.
    pub async fn settle(&self) {
        for _ in 0..self.config.settle_yields {
            tokio::task::yield_now().await;
        }
    }

    /// Runs one frame of `dt` seconds.
    ///
    /// Virtual time moves first so sleepers due this frame wake during the
    /// settle that follows the tick.
    pub async fn step(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.context.advance_time(Duration::from_secs_f64(dt));
        }
        self.scene.tick(dt);
        self.tick_count += 1;
        self.settle().await;

        if let Some(recorder) = self.recorder.as_mut() {
            if self.tick_count.is_multiple_of(recorder.every) {
                recorder.export.add_frame(SimFrame::capture(&self.scene));
            }
        }
    }

    /// Runs fixed-rate frames until `secs` of scene time have passed.
    pub async fn run_for(&mut self, secs: f64) -> u64 {
        let dt = self.dt();
        let frames = self.frames_in(secs);
        for _ in 0..frames {
            self.step(dt).await;
        }
        frames
    }

    /// Runs fixed-rate frames until `done` holds or `max_secs` pass.
    ///
    /// Returns the scene time at which `done` first held.
    pub async fn run_until<F>(&mut self, max_secs: f64, mut done: F) -> Option<f64>
    where
        F: FnMut(&Self) -> bool,
    {
        let dt = self.dt();
        let frames = self.frames_in(max_secs);
        for _ in 0..frames {
            if done(self) {
                return Some(self.scene.clock().elapsed());
            }
            self.step(dt).await;
        }
        done(self).then(|| self.scene.clock().elapsed())
    }

    /// Fixed frame delta.
    pub fn dt(&self) -> f64 {
        1.0 / f64::from(self.config.tick_rate_hz.max(1))
    }

    /// Number of fixed frames covering `secs`.
    pub fn frames_in(&self, secs: f64) -> u64 {
        (secs.max(0.0) * f64::from(self.config.tick_rate_hz.max(1))).round() as u64
    }

    /// Virtual time in seconds.
    pub fn time_secs(&self) -> f64 {
        Duration::from_nanos(self.context.time_ns()).as_secs_f64()
    }

    /// Returns the current tick count.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
