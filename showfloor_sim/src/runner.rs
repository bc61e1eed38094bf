//! Scenario runner - executes the simulation scenarios.
//!
//! Each scenario builds a fresh [`SimWorld`] on a single-threaded runtime,
//! drives it frame by frame and checks the scene's observable state.

use crate::collaborator::StatsScript;
use crate::error::SimError;
use crate::exporter::SimExport;
use crate::scenarios::ScenarioId;
use crate::world::{SimConfig, SimWorld};

use nalgebra::Vector3;
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use showfloor_core::{
    ActivationStatus, MetricsSnapshot, SceneConfig, Transform, VideoPresentation,
};
use showfloor_env::{GuideVideo, SceneContext};
use tracing::{debug, info, warn};

/// Results from running a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Whether scenario passed all assertions
    pub passed: bool,

    /// Total ticks executed
    pub total_ticks: u64,

    /// Final scene time in seconds
    pub final_time_secs: f64,

    /// Number of animated objects in the scene
    pub object_count: usize,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Metrics collected during run
    pub metrics: ScenarioMetrics,

    /// Recorded frames, when export was requested
    #[serde(skip)]
    pub export: Option<SimExport>,
}

impl ScenarioResult {
    fn aborted(scenario: ScenarioId, seed: u64, err: &SimError) -> Self {
        Self {
            scenario,
            seed,
            passed: false,
            total_ticks: 0,
            final_time_secs: 0.0,
            object_count: 0,
            failure_reason: Some(err.to_string()),
            metrics: ScenarioMetrics::default(),
            export: None,
        }
    }
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScenarioMetrics {
    /// Scene counters at the end of the run
    pub scene: MetricsSnapshot,

    /// Activation flag reads seen by the SDK client
    pub flag_reads: u32,

    /// Stats calls seen by the SDK client
    pub stats_calls: u32,

    /// Scene time at which the UI bootstrap completed
    pub activation_secs: Option<f64>,

    /// Background tasks spawned through the context
    pub spawned_tasks: u64,
}

/// Accumulates failed assertions.
#[derive(Default)]
struct Checks {
    failures: Vec<String>,
}

impl Checks {
    fn expect(&mut self, ok: bool, what: impl FnOnce() -> String) {
        if !ok {
            let message = what();
            warn!("check failed: {}", message);
            self.failures.push(message);
        }
    }

    fn into_reason(self) -> Option<String> {
        (!self.failures.is_empty()).then(|| self.failures.join("; "))
    }
}

/// Runs simulation scenarios.
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,

    /// Frame rate in Hz
    tick_rate_hz: u32,

    /// Maximum duration in seconds (scenarios extend this to their minimum)
    max_duration_secs: f64,

    /// Scene configuration under test
    scene: SceneConfig,

    /// Record every n-th frame, if set
    export_every: Option<u64>,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            tick_rate_hz: 30,
            max_duration_secs: 10.0,
            scene: SceneConfig::default(),
            export_every: None,
        }
    }

    /// Sets the frame rate.
    pub fn with_tick_rate(mut self, hz: u32) -> Self {
        self.tick_rate_hz = hz;
        self
    }

    /// Sets the maximum duration.
    pub fn with_duration(mut self, secs: f64) -> Self {
        self.max_duration_secs = secs;
        self
    }

    /// Runs every scenario against this scene configuration.
    pub fn with_scene_config(mut self, scene: SceneConfig) -> Self {
        self.scene = scene;
        self
    }

    /// Records every `every`-th frame into the result's export.
    pub fn with_export(mut self, every: u64) -> Self {
        self.export_every = Some(every);
        self
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);

        let runtime = match tokio::runtime::Builder::new_current_thread().build() {
            Ok(runtime) => runtime,
            Err(err) => {
                return ScenarioResult::aborted(scenario, self.seed, &SimError::Runtime(err))
            }
        };

        runtime.block_on(async {
            match scenario {
                ScenarioId::PaidActivation => self.run_paid_activation().await,
                ScenarioId::ActivationTimeout => self.run_activation_timeout().await,
                ScenarioId::StatsOutage => self.run_stats_outage().await,
                ScenarioId::VideoSwitch => self.run_video_switch().await,
                ScenarioId::FrameJitter => self.run_frame_jitter().await,
                ScenarioId::LateCollaborator => self.run_late_collaborator().await,
            }
        })
    }

    /// Scenario duration: the requested one, but never below what the
    /// scenario needs under the current scene configuration.
    fn duration_for(&self, scenario: ScenarioId) -> f64 {
        let needed = match scenario {
            ScenarioId::ActivationTimeout => {
                let polls = f64::from(self.scene.activation_max_attempts.saturating_sub(1));
                polls * self.scene.activation_poll_interval().as_secs_f64() + 1.0
            }
            ScenarioId::StatsOutage => self.scene.stats_interval_secs * 2.0 + 5.0,
            _ => 0.0,
        };
        self.max_duration_secs
            .max(scenario.min_duration_secs())
            .max(needed)
    }

    fn world(&self, scenario: ScenarioId) -> SimWorld {
        let mut world = SimWorld::new(SimConfig {
            seed: self.seed,
            tick_rate_hz: self.tick_rate_hz,
            max_duration_secs: self.duration_for(scenario),
            scene: self.scene.clone(),
            ..SimConfig::default()
        });
        if let Some(every) = self.export_every {
            world.enable_export(scenario.name(), every);
        }
        world
    }

    fn finish(
        &self,
        scenario: ScenarioId,
        mut world: SimWorld,
        checks: Checks,
        activation_secs: Option<f64>,
    ) -> ScenarioResult {
        let scene_metrics = world.scene.metrics();
        let (flag_reads, stats_calls) = world
            .collaborator()
            .map_or((0, 0), |c| (c.flag_reads(), c.stats_calls()));

        let failure_reason = checks.into_reason();
        let passed = failure_reason.is_none();

        let mut export = world.take_export();
        if let Some(export) = export.as_mut() {
            export.finalize(passed, scene_metrics);
        }

        ScenarioResult {
            scenario,
            seed: self.seed,
            passed,
            total_ticks: world.tick_count(),
            final_time_secs: world.scene.clock().elapsed(),
            object_count: world.scene.motion().len(),
            failure_reason,
            metrics: ScenarioMetrics {
                scene: scene_metrics,
                flag_reads,
                stats_calls,
                activation_secs,
                spawned_tasks: world.context.spawned_tasks(),
            },
            export,
        }
    }

    /// SIM-001: PaidActivation - the flag confirms on the third read.
    ///
    /// **Assertion**: exactly three reads, bootstrap once, paid signage, and
    /// the scene kept ticking through both poll intervals.
    async fn run_paid_activation(&self) -> ScenarioResult {
        info!("SIM-001: PaidActivation - confirm on poll 3");
        let scenario = ScenarioId::PaidActivation;
        let mut world = self.world(scenario);
        let duration = world.config.max_duration_secs;

        let collab = world.scripted().with_confirm_on_read(3).with_session_active(true).shared();
        world.attach(collab.clone()).await;

        let resolved_at = world
            .run_until(duration, |w| w.scene.activation().bootstrap.is_some())
            .await;
        let ticks_at_resolution = world.tick_count();
        world.note("activation resolved");
        let remaining = duration - world.scene.clock().elapsed();
        world.run_for(remaining).await;

        let mut checks = Checks::default();
        let status = world.scene.activation().status;
        checks.expect(status == Some(ActivationStatus::Confirmed { attempts: 3 }), || {
            format!("expected confirmation on poll 3, got {:?}", status)
        });
        checks.expect(collab.flag_reads() == 3, || {
            format!("flag read {} times, expected 3", collab.flag_reads())
        });
        let min_wait = 2.0 * world.config.scene.activation_poll_interval().as_secs_f64();
        checks.expect(resolved_at.is_some_and(|t| t >= min_wait - 1e-3), || {
            format!("resolved at {:?}, before two poll intervals ({:.2}s)", resolved_at, min_wait)
        });
        checks.expect(ticks_at_resolution >= world.frames_in(min_wait).saturating_sub(1), || {
            format!("only {} ticks ran while waiting", ticks_at_resolution)
        });
        checks.expect(world.scene.signage().is_paid_tier(), || "signage not relabeled".to_string());
        checks.expect(collab.guide_inits() == 1 && collab.chat_inits() == 1, || {
            format!("UI init counts guide={} chat={}", collab.guide_inits(), collab.chat_inits())
        });
        checks.expect(world.scene.metrics().activation_polls == 3, || {
            "activation polls not recorded".to_string()
        });

        info!(
            "✓ PaidActivation complete: resolved at {:.2}s after {} reads",
            resolved_at.unwrap_or(f64::NAN),
            collab.flag_reads()
        );
        self.finish(scenario, world, checks, resolved_at)
    }

    /// SIM-002: ActivationTimeout - the flag never confirms.
    ///
    /// **Assertion**: exactly `max_attempts` reads, no further reads after
    /// resolution, best-effort UI init, free-tier signage.
    async fn run_activation_timeout(&self) -> ScenarioResult {
        info!("SIM-002: ActivationTimeout - flag never confirms");
        let scenario = ScenarioId::ActivationTimeout;
        let mut world = self.world(scenario);
        let duration = world.config.max_duration_secs;
        let max_attempts = world.config.scene.activation_max_attempts;

        let collab = world.scripted().with_session_active(true).shared();
        world.attach(collab.clone()).await;

        let resolved_at = world
            .run_until(duration, |w| w.scene.activation().bootstrap.is_some())
            .await;
        world.note("activation exhausted");
        world.run_for(1.0).await;

        let mut checks = Checks::default();
        let status = world.scene.activation().status;
        checks.expect(
            status == Some(ActivationStatus::NotConfirmed { attempts: max_attempts }),
            || format!("expected {} unconfirmed polls, got {:?}", max_attempts, status),
        );
        checks.expect(collab.flag_reads() == max_attempts, || {
            format!("flag read {} times, expected {}", collab.flag_reads(), max_attempts)
        });
        let poll_secs = world.config.scene.activation_poll_interval().as_secs_f64();
        let min_wait = f64::from(max_attempts.saturating_sub(1)) * poll_secs;
        checks.expect(resolved_at.is_some_and(|t| t >= min_wait - 1e-3), || {
            format!("resolved at {:?}, expected no earlier than {:.2}s", resolved_at, min_wait)
        });
        checks.expect(!world.scene.signage().is_paid_tier(), || {
            "paid relabel ran without confirmation".to_string()
        });
        checks.expect(collab.guide_inits() == 1 && collab.chat_inits() == 1, || {
            "UI modules not initialized after exhaustion".to_string()
        });
        checks.expect(world.scene.status_panel().status.text == "SESSION: ACTIVE", || {
            format!("status panel shows {:?}", world.scene.status_panel().status.text)
        });
        checks.expect(world.scene.watch_seconds() >= min_wait, || {
            "watch timer stalled during the wait".to_string()
        });

        info!(
            "✓ ActivationTimeout complete: {} reads, resolved at {:?}",
            collab.flag_reads(),
            resolved_at
        );
        self.finish(scenario, world, checks, resolved_at)
    }

    /// SIM-003: StatsOutage - stats succeed once, then fail forever.
    ///
    /// **Assertion**: the first counters stay on the board through every
    /// later failure, and one fetch was issued per interval.
    async fn run_stats_outage(&self) -> ScenarioResult {
        info!("SIM-003: StatsOutage - stale counters survive failures");
        let scenario = ScenarioId::StatsOutage;
        let mut world = self.world(scenario);
        let duration = world.config.max_duration_secs;

        let script = StatsScript {
            fail_from_call: Some(1),
            ..StatsScript::default()
        };
        let expected = script.base.clone();
        let collab = world
            .scripted()
            .with_session_active(true)
            .with_stats_script(script)
            .shared();
        world.attach(collab.clone()).await;

        let frames = world.run_for(duration).await;
        // let the last in-flight fetch land
        world.run_for(1.0).await;

        let metrics = world.scene.metrics();
        let board = world.scene.stats_board();
        let interval = world.config.scene.stats_interval_secs;
        // one on the first active frame, then one per elapsed interval
        let min_fetches = (duration / interval).floor() as u64 + 1;

        let mut checks = Checks::default();
        checks.expect(metrics.stats_issued >= min_fetches, || {
            format!("{} fetches issued over {:.0}s", metrics.stats_issued, duration)
        });
        checks.expect(metrics.stats_applied == 1, || {
            format!("{} fetches applied", metrics.stats_applied)
        });
        checks.expect(metrics.stats_failed == metrics.stats_issued.saturating_sub(1), || {
            format!("{} of {} fetches failed", metrics.stats_failed, metrics.stats_issued)
        });
        checks.expect(u64::from(collab.stats_calls()) == metrics.stats_issued, || {
            "issued fetches do not match SDK calls".to_string()
        });
        checks.expect(board.visitors.text == format!("Visitors: {}", expected.unique_visitors), || {
            format!("visitors line is {:?}", board.visitors.text)
        });
        checks.expect(board.sessions.text == format!("Sessions: {}", expected.total_sessions), || {
            format!("sessions line is {:?}", board.sessions.text)
        });
        checks.expect(board.visitor_line.text == "You are visitor #7", || {
            format!("visitor line is {:?}", board.visitor_line.text)
        });
        checks.expect(world.tick_count() >= frames, || "frames were skipped".to_string());

        info!(
            "✓ StatsOutage complete: {} issued, {} applied, {} failed",
            metrics.stats_issued, metrics.stats_applied, metrics.stats_failed
        );
        self.finish(scenario, world, checks, None)
    }

    /// SIM-004: VideoSwitch - live, select, stop.
    ///
    /// **Assertion**: empty URLs are ignored, selection reaches the guide and
    /// heartbeat, and stop restores the exact initial fallback configuration.
    async fn run_video_switch(&self) -> ScenarioResult {
        info!("SIM-004: VideoSwitch - fallback ↔ live");
        let scenario = ScenarioId::VideoSwitch;
        let mut world = self.world(scenario);
        let duration = world.config.max_duration_secs;
        let live_url = "https://streams.thestatic.tv/live/main-stage.m3u8";

        let collab = world.scripted().with_session_active(true).shared();
        world.attach(collab.clone()).await;
        let initial = world.scene.video().applied().clone();
        let mut checks = Checks::default();

        world.run_for(0.5).await;
        checks.expect(!world.scene.on_video_play(""), || "empty URL was accepted".to_string());
        checks.expect(world.scene.on_video_play(live_url), || "live URL rejected".to_string());
        world.note("video live");

        world.run_for(0.5).await;
        let applied = world.scene.video().applied().clone();
        checks.expect(
            world.scene.video_state() == &VideoPresentation::Live { url: live_url.to_string() },
            || format!("expected live state, got {:?}", world.scene.video_state()),
        );
        checks.expect(!applied.playback.looping && applied.playback.src == live_url, || {
            format!("live playback misconfigured: {:?}", applied.playback)
        });
        checks.expect(applied.material.texture.player == world.scene.video().screen(), || {
            "material not bound to the screen".to_string()
        });

        let video = GuideVideo::new("vid-204", "Main Stage Keynote").with_channel("chan-main");
        world.scene.on_video_selected(&video);
        world.note("video selected");
        world.run_for(0.5).await;
        checks.expect(world.scene.video().label().text == video.name, || {
            format!("label shows {:?}", world.scene.video().label().text)
        });
        checks.expect(collab.current_video_id().as_deref() == Some("vid-204"), || {
            "guide did not receive the now-playing id".to_string()
        });
        checks.expect(collab.watched_channels() == ["chan-main"], || {
            format!("heartbeat channels {:?}", collab.watched_channels())
        });

        world.scene.on_video_stop();
        world.note("video stopped");
        let remaining = duration - world.scene.clock().elapsed();
        world.run_for(remaining).await;
        checks.expect(world.scene.video_state() == &VideoPresentation::Fallback, || {
            "stop did not return to fallback".to_string()
        });
        checks.expect(world.scene.video().applied() == &initial, || {
            "fallback configuration differs from the initial one".to_string()
        });
        checks.expect(world.scene.video().applications() == 3, || {
            format!("{} configurations applied, expected 3", world.scene.video().applications())
        });

        info!("✓ VideoSwitch complete");
        self.finish(scenario, world, checks, None)
    }

    /// SIM-005: FrameJitter - jittered dt vs. a fixed-step replay.
    ///
    /// Stateless motion depends only on elapsed time, so two runs that
    /// reach the same elapsed time through different frame sequences must
    /// agree on every non-spinning pose.
    async fn run_frame_jitter(&self) -> ScenarioResult {
        info!("SIM-005: FrameJitter - pose depends on elapsed time only");
        let scenario = ScenarioId::FrameJitter;
        let mut jittered = self.world(scenario);
        let mut replay = SimWorld::new(jittered.config.clone());
        let duration = jittered.config.max_duration_secs;
        let nominal = jittered.dt();

        let normal = match Normal::new(nominal, nominal * 0.4) {
            Ok(normal) => normal,
            Err(err) => {
                let err = SimError::Distribution(err.to_string());
                return ScenarioResult::aborted(scenario, self.seed, &err);
            }
        };
        let mut rng = jittered.context.derive_rng(0x4a17);

        let frames = jittered.frames_in(duration);
        for i in 0..frames {
            let dt = match i % 97 {
                13 => -nominal,
                47 => f64::NAN,
                _ => normal.sample(&mut rng).max(0.0),
            };
            jittered.step(dt).await;
        }

        let total = jittered.scene.clock().elapsed();
        let fixed = replay.dt();
        for _ in 0..(total / fixed).floor() as u64 {
            replay.step(fixed).await;
        }
        let rest = total - replay.scene.clock().elapsed();
        if rest > 0.0 {
            replay.step(rest).await;
        }

        let mut checks = Checks::default();
        let mut compared = 0usize;
        let mut mismatches = Vec::new();
        for (a, b) in jittered.scene.motion().iter().zip(replay.scene.motion().iter()) {
            if a.id != b.id {
                mismatches.push(format!("{} vs {}", a.id, b.id));
                continue;
            }
            if a.spin.is_some() {
                continue;
            }
            compared += 1;
            let gap = pose_gap(a.transform(), b.transform());
            if gap > 1e-6 {
                debug!(id = %a.id, role = %a.role, gap, "pose mismatch");
                mismatches.push(format!("{} {} off by {:.2e}", a.role, a.id, gap));
            }
        }

        checks.expect((replay.scene.clock().elapsed() - total).abs() < 1e-9, || {
            format!("replay reached {:.9}s, jittered {:.9}s", replay.scene.clock().elapsed(), total)
        });
        checks.expect(compared > 0, || "no stateless objects compared".to_string());
        checks.expect(mismatches.is_empty(), || mismatches.join(", "));

        info!("✓ FrameJitter complete: {} poses compared at t={:.3}s", compared, total);
        self.finish(scenario, jittered, checks, None)
    }

    /// SIM-006: LateCollaborator - frames before the SDK client exists.
    ///
    /// **Assertion**: nothing is composed and nothing is fetched until the
    /// client attaches; afterwards all three panels appear and activation
    /// proceeds normally.
    async fn run_late_collaborator(&self) -> ScenarioResult {
        info!("SIM-006: LateCollaborator - UI before SDK client");
        let scenario = ScenarioId::LateCollaborator;
        let mut world = self.world(scenario);
        let duration = world.config.max_duration_secs;
        let mut checks = Checks::default();

        let mut composed_early = 0u64;
        for _ in 0..world.frames_in(1.0) {
            let dt = world.dt();
            world.step(dt).await;
            if world.scene.compose_ui().is_some() {
                composed_early += 1;
            }
        }
        let early = GuideVideo::new("v-early", "Preshow").with_channel("chan-early");
        world.scene.on_video_selected(&early);
        checks.expect(composed_early == 0, || {
            format!("UI composed on {} early frames", composed_early)
        });
        checks.expect(world.scene.video().label().text == "Preshow", || {
            "early selection not labeled".to_string()
        });
        checks.expect(world.scene.watch_seconds() == 0.0, || {
            "watch time counted without a session".to_string()
        });
        checks.expect(world.scene.metrics().stats_issued == 0, || {
            "stats fetched without a session".to_string()
        });

        let collab = world
            .scripted()
            .with_confirm_on_read(1)
            .with_session_active(true)
            .with_admin_panel()
            .shared();
        world.attach(collab.clone()).await;
        world.note("collaborator attached");

        let panels = world.scene.compose_ui().map(|tree| tree.children.len());
        checks.expect(panels == Some(3), || format!("expected 3 panels, got {:?}", panels));

        let remaining = duration - world.scene.clock().elapsed();
        let resolved_at = world
            .run_until(remaining, |w| w.scene.activation().bootstrap.is_some())
            .await;
        let remaining = duration - world.scene.clock().elapsed();
        world.run_for(remaining).await;

        checks.expect(
            world.scene.activation().status == Some(ActivationStatus::Confirmed { attempts: 1 }),
            || format!("activation {:?}", world.scene.activation().status),
        );
        checks.expect(world.scene.signage().is_paid_tier(), || "signage not relabeled".to_string());
        checks.expect(world.scene.metrics().stats_issued >= 1, || {
            "no stats fetch after attach".to_string()
        });
        checks.expect(world.scene.watch_seconds() > 0.0, || {
            "watch timer idle after attach".to_string()
        });
        checks.expect(collab.watched_channels().is_empty(), || {
            "pre-attach selection leaked into the heartbeat".to_string()
        });
        checks.expect(collab.admin_inits() == 0, || "admin panel was initialized".to_string());

        info!("✓ LateCollaborator complete");
        self.finish(scenario, world, checks, resolved_at)
    }
}

/// Largest component-wise difference between two poses.
fn pose_gap(a: &Transform, b: &Transform) -> f64 {
    let position: Vector3<f64> = a.position - b.position;
    let scale: Vector3<f64> = a.scale - b.scale;
    position.amax().max(scale.amax()).max(a.rotation.angle_to(&b.rotation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paid_activation_scenario() {
        let result = ScenarioRunner::new(42).with_duration(2.0).run(ScenarioId::PaidActivation);
        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.metrics.flag_reads, 3);
        assert!(result.metrics.activation_secs.is_some());
    }

    #[test]
    fn test_activation_timeout_scenario() {
        let result = ScenarioRunner::new(42).run(ScenarioId::ActivationTimeout);
        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.metrics.flag_reads, 20);
        assert_eq!(result.metrics.scene.activation_polls, 20);
    }

    #[test]
    fn test_activation_timeout_follows_config() {
        let scene = SceneConfig {
            activation_max_attempts: 4,
            activation_poll_interval_ms: 250,
            ..SceneConfig::default()
        };
        let result = ScenarioRunner::new(9)
            .with_scene_config(scene)
            .run(ScenarioId::ActivationTimeout);
        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.metrics.flag_reads, 4);
    }

    #[test]
    fn test_stats_outage_scenario() {
        let result = ScenarioRunner::new(42).run(ScenarioId::StatsOutage);
        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.metrics.scene.stats_applied, 1);
        assert!(result.metrics.scene.stats_failed >= 2);
    }

    #[test]
    fn test_video_switch_scenario() {
        let result = ScenarioRunner::new(42).run(ScenarioId::VideoSwitch);
        assert!(result.passed, "{:?}", result.failure_reason);
    }

    #[test]
    fn test_frame_jitter_across_seeds() {
        for seed in [1, 42, 1234] {
            let result = ScenarioRunner::new(seed).with_duration(5.0).run(ScenarioId::FrameJitter);
            assert!(result.passed, "seed {}: {:?}", seed, result.failure_reason);
        }
    }

    #[test]
    fn test_late_collaborator_scenario() {
        let result = ScenarioRunner::new(42).run(ScenarioId::LateCollaborator);
        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.object_count, 20);
    }

    #[test]
    fn test_same_seed_same_result() {
        let a = ScenarioRunner::new(42).run(ScenarioId::StatsOutage);
        let b = ScenarioRunner::new(42).run(ScenarioId::StatsOutage);
        assert_eq!(a.total_ticks, b.total_ticks);
        assert_eq!(a.metrics.scene, b.metrics.scene);
        assert_eq!(a.final_time_secs, b.final_time_secs);
    }

    #[test]
    fn test_export_is_recorded_when_requested() {
        let result = ScenarioRunner::new(42).with_export(10).run(ScenarioId::VideoSwitch);
        let export = result.export.unwrap();
        assert_eq!(export.scenario, "video_switch");
        assert_eq!(export.passed, result.passed);
        assert!(export.frames.iter().any(|f| f.video != "fallback"));
        assert!(export.frames.iter().any(|f| !f.events.is_empty()));
        assert!(export.metrics.is_some());
    }
}
