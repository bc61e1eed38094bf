//! Scene Runtime - orchestrates the scene engines against the environment.
//!
//! `SceneRuntime` is the one object the renderer talks to. It owns the
//! animation clock and the motion set, throttles the status and stats
//! panels, and forwards SDK video events to the screen controller.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       SceneRuntime                          │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │              Context: SceneContext                    │   │
//! │  │  • spawn() → stats fetches, activation wait          │   │
//! │  │  • sleep() → activation poll interval                │   │
//! │  │  • derive_rng() → decoration parameters              │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                              │                               │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────────────┐   │
//! │  │ MOTION  │ │ STATUS  │ │  STATS  │ │  VIDEO / SIGNAGE│   │
//! │  └─────────┘ └─────────┘ └─────────┘ └─────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use showfloor_core::{SceneConfig, SceneRuntime};
//! use showfloor_env::TokioContext;
//!
//! let mut scene = SceneRuntime::new(TokioContext::shared(), SceneConfig::default());
//! scene.attach(sdk_client);
//!
//! // Per frame:
//! scene.tick(dt);
//! let ui = scene.compose_ui();
//! ```

use nalgebra::Vector3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use showfloor_env::{Collaborator, EntityId, GuideVideo, SceneContext, UiTree};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

use crate::activation::{await_activation, ActivationStatus, BootstrapReport, UiBootstrap};
use crate::clock::AnimationClock;
use crate::config::SceneConfig;
use crate::metrics::{MetricsSnapshot, SceneMetrics};
use crate::motion::MotionSet;
use crate::showroom;
use crate::signage::Signage;
use crate::stats::{fetch_and_apply, read_board, SharedStatsBoard, StatsBoard, StatsRefresher};
use crate::status::{StatusPanel, StatusRefresher, WatchTimer};
use crate::ui;
use crate::video::{VideoPresentation, VideoScreenController};

/// RNG stream used for the showroom decoration.
const SHOWROOM_STREAM: u64 = 0x5348_4f57;

/// Activation outcome shared with the background wait.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivationRecord {
    pub status: Option<ActivationStatus>,
    pub bootstrap: Option<BootstrapReport>,
}

/// The scene: all per-frame state plus handles to the SDK client.
///
/// Generic over the context and the collaborator so the same code runs in
/// a live client and in the simulation harness.
pub struct SceneRuntime<Ctx, C>
where
    Ctx: SceneContext,
    C: Collaborator,
{
    context: Arc<Ctx>,
    collaborator: Option<Arc<C>>,
    config: SceneConfig,
    clock: AnimationClock,
    motion: MotionSet,
    watch: WatchTimer,
    status: StatusRefresher,
    stats: StatsRefresher,
    board: SharedStatsBoard,
    signage: Arc<RwLock<Signage>>,
    video: VideoScreenController,
    bootstrap: Arc<UiBootstrap>,
    activation: Arc<RwLock<ActivationRecord>>,
    metrics: Arc<SceneMetrics>,
}

impl<Ctx, C> SceneRuntime<Ctx, C>
where
    Ctx: SceneContext,
    C: Collaborator,
{
    /// Builds the scene. The SDK client is attached later with [`attach`].
    ///
    /// [`attach`]: SceneRuntime::attach
    pub fn new(context: Arc<Ctx>, config: SceneConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => context.derive_rng(SHOWROOM_STREAM),
        };
        let id_base: u64 = rng.gen();
        let [x, y, z] = config.hologram_center;
        let motion = showroom::build(&mut rng, Vector3::new(x, y, z), id_base);
        let screen = EntityId::from_seed(rng.gen());

        info!(
            seed = context.seed(),
            objects = motion.len(),
            "scene constructed"
        );

        Self {
            collaborator: None,
            clock: AnimationClock::new(),
            motion,
            watch: WatchTimer::default(),
            status: StatusRefresher::new(config.status_interval_secs),
            stats: StatsRefresher::new(config.stats_interval_secs),
            board: Arc::new(RwLock::new(StatsBoard::default())),
            signage: Arc::new(RwLock::new(Signage::default())),
            video: VideoScreenController::new(screen, &config),
            bootstrap: Arc::new(UiBootstrap::new()),
            activation: Arc::new(RwLock::new(ActivationRecord::default())),
            metrics: Arc::new(SceneMetrics::default()),
            context,
            config,
        }
    }

    /// Hands the SDK client to the scene and starts the activation wait.
    ///
    /// The wait runs as a background task; ticks keep running meanwhile.
    /// Attaching a second client replaces the handle but does not restart
    /// the wait.
    pub fn attach(&mut self, collaborator: Arc<C>) {
        let first = self.collaborator.is_none();
        self.collaborator = Some(collaborator.clone());
        if !first {
            debug!("collaborator replaced; activation already started");
            return;
        }

        let ctx = Arc::clone(&self.context);
        let bootstrap = Arc::clone(&self.bootstrap);
        let signage = Arc::clone(&self.signage);
        let record = Arc::clone(&self.activation);
        let metrics = Arc::clone(&self.metrics);
        let max_attempts = self.config.activation_max_attempts;
        let interval_ms = self.config.activation_poll_interval_ms;

        self.context.spawn("activation", async move {
            let status =
                await_activation(ctx.as_ref(), collaborator.as_ref(), max_attempts, interval_ms)
                    .await;
            metrics.record_activation_polls(status.attempts());
            info!(
                confirmed = status.is_confirmed(),
                attempts = status.attempts(),
                "activation resolved"
            );
            record.write().unwrap_or_else(PoisonError::into_inner).status = Some(status);

            let report = bootstrap.complete(status, collaborator.as_ref(), &signage).await;
            if report.is_some() {
                record.write().unwrap_or_else(PoisonError::into_inner).bootstrap = report;
            }
        });
    }

    /// The per-frame callback.
    ///
    /// Never suspends and never fails. Stats fetches are spawned and land
    /// on the board whenever they complete.
    pub fn tick(&mut self, dt: f64) {
        let t = self.clock.advance(dt);
        let dt = self.clock.last_dt();
        self.metrics.record_tick();

        let session = self.collaborator.as_ref().and_then(|c| c.session());
        let active = session.as_ref().is_some_and(|s| s.is_session_active());

        self.watch.advance(dt, active);
        self.motion.update(t, dt);

        if self.status.maybe_refresh(t, active, self.watch.seconds()) {
            self.metrics.record_status_refresh();
        }

        if let Some(seq) = self.stats.next_fetch(t, active) {
            if let Some(session) = session {
                self.metrics.record_stats_issued();
                let board = Arc::downgrade(&self.board);
                let metrics = Arc::clone(&self.metrics);
                self.context.spawn("stats-fetch", async move {
                    let outcome = fetch_and_apply(session, board, seq).await;
                    metrics.record_fetch(outcome);
                });
            }
        }
    }

    /// The UI-composition callback.
    pub fn compose_ui(&self) -> Option<UiTree> {
        ui::compose_ui(self.collaborator.as_deref())
    }

    /// `onVideoPlay(url)`
    pub fn on_video_play(&mut self, url: &str) -> bool {
        self.video.play(url)
    }

    /// `onVideoStop()`
    pub fn on_video_stop(&mut self) {
        self.video.stop();
    }

    /// `onVideoSelected(video)`
    pub fn on_video_selected(&mut self, video: &GuideVideo) {
        self.video.select(video, self.collaborator.as_deref());
    }

    /// Drops the scene. In-flight fetches complete as no-ops.
    pub fn teardown(self) -> MetricsSnapshot {
        info!(ticks = self.clock.ticks(), "scene torn down");
        self.metrics.snapshot()
    }

    pub fn context(&self) -> &Arc<Ctx> {
        &self.context
    }

    pub fn collaborator(&self) -> Option<&Arc<C>> {
        self.collaborator.as_ref()
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn motion(&self) -> &MotionSet {
        &self.motion
    }

    pub fn watch_seconds(&self) -> f64 {
        self.watch.seconds()
    }

    pub fn status_panel(&self) -> &StatusPanel {
        self.status.panel()
    }

    /// A consistent copy of the stats panel.
    pub fn stats_board(&self) -> StatsBoard {
        read_board(&self.board)
    }

    pub fn signage(&self) -> Signage {
        self.signage.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn video(&self) -> &VideoScreenController {
        &self.video
    }

    pub fn video_state(&self) -> &VideoPresentation {
        self.video.state()
    }

    pub fn activation(&self) -> ActivationRecord {
        *self.activation.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrap.is_done()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn shared_metrics(&self) -> Arc<SceneMetrics> {
        Arc::clone(&self.metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeCollaborator, VirtualContext};
    use showfloor_env::SessionStats;

    fn scene() -> SceneRuntime<VirtualContext, FakeCollaborator> {
        let config = SceneConfig {
            seed: Some(11),
            ..SceneConfig::default()
        };
        SceneRuntime::new(Arc::new(VirtualContext::new()), config)
    }

    async fn settle() {
        for _ in 0..64 {
            tokio::task::yield_now().await;
        }
    }

    fn stats(visitors: u64) -> SessionStats {
        SessionStats {
            unique_visitors: visitors,
            total_sessions: visitors * 2,
            visitor_number: Some(visitors),
            is_first_visitor: None,
        }
    }

    #[test]
    fn test_seeded_scenes_are_identical() {
        let a = scene();
        let b = scene();
        let poses_a: Vec<_> = a.motion().iter().map(|o| (o.id, *o.transform())).collect();
        let poses_b: Vec<_> = b.motion().iter().map(|o| (o.id, *o.transform())).collect();
        assert_eq!(poses_a, poses_b);
        assert_eq!(a.video().screen(), b.video().screen());
    }

    #[test]
    fn test_tick_without_collaborator() {
        let mut scene = scene();
        for _ in 0..10 {
            scene.tick(0.1);
        }
        assert_eq!(scene.metrics().ticks, 10);
        assert_eq!(scene.watch_seconds(), 0.0);
        assert_eq!(scene.metrics().stats_issued, 0);
        assert_eq!(scene.compose_ui(), None);
        assert_eq!(scene.status_panel().status.text, "SESSION: INACTIVE");
    }

    #[tokio::test]
    async fn test_active_session_fetches_first_then_every_interval() {
        let mut scene = scene();
        let collaborator = Arc::new(FakeCollaborator::full());
        collaborator.set_session_active(true);
        collaborator.push_stats(Ok(Some(stats(5))));
        scene.attach(collaborator.clone());

        scene.tick(0.1);
        settle().await;
        assert_eq!(scene.metrics().stats_issued, 1);
        assert_eq!(scene.stats_board().visitors.text, "Visitors: 5");
        assert_eq!(scene.stats_board().applied_seq(), Some(1));

        // 0.1 + 299 * 0.1 = 30.0, not yet past the interval
        for _ in 0..299 {
            scene.tick(0.1);
        }
        assert_eq!(scene.metrics().stats_issued, 1);
        scene.tick(0.1);
        scene.tick(0.1);
        settle().await;
        assert_eq!(scene.metrics().stats_issued, 2);
        assert_eq!(collaborator.stats_calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_stale_counters() {
        let mut scene = scene();
        let collaborator = Arc::new(FakeCollaborator::full());
        collaborator.set_session_active(true);
        collaborator.push_stats(Ok(Some(stats(9))));
        collaborator.push_stats(Err(showfloor_env::EnvError::fetch("offline")));
        scene.attach(collaborator);

        scene.tick(0.1);
        settle().await;
        scene.tick(31.0);
        settle().await;

        let metrics = scene.metrics();
        assert_eq!(metrics.stats_applied, 1);
        assert_eq!(metrics.stats_failed, 1);
        assert_eq!(scene.stats_board().visitors.text, "Visitors: 9");
    }

    #[tokio::test]
    async fn test_fetch_after_teardown_is_discarded() {
        let mut scene = scene();
        let collaborator = Arc::new(FakeCollaborator::full());
        collaborator.set_session_active(true);
        collaborator.push_stats(Ok(Some(stats(3))));
        scene.attach(collaborator);
        let metrics = scene.shared_metrics();

        scene.tick(0.1);
        scene.teardown();
        settle().await;

        assert_eq!(metrics.snapshot().stats_discarded, 1);
    }

    #[tokio::test]
    async fn test_watch_time_only_counts_active_frames() {
        let mut scene = scene();
        let collaborator = Arc::new(FakeCollaborator::full());
        scene.attach(collaborator.clone());

        scene.tick(1.0);
        collaborator.set_session_active(true);
        scene.tick(2.0);
        scene.tick(-5.0);
        collaborator.set_session_active(false);
        scene.tick(4.0);

        assert_eq!(scene.watch_seconds(), 2.0);
    }

    #[tokio::test]
    async fn test_activation_confirms_and_bootstraps_once() {
        let mut scene = scene();
        let collaborator = Arc::new(FakeCollaborator::full());
        collaborator.set_confirmed(true);
        scene.attach(collaborator.clone());
        settle().await;

        let record = scene.activation();
        assert_eq!(record.status, Some(ActivationStatus::Confirmed { attempts: 1 }));
        assert!(record.bootstrap.is_some_and(|r| r.relabeled));
        assert!(scene.signage().is_paid_tier());
        assert!(scene.is_bootstrapped());

        scene.attach(collaborator.clone());
        settle().await;
        assert_eq!(collaborator.guide_inits(), 1);
        assert_eq!(collaborator.admin_inits(), 0);
    }

    #[tokio::test]
    async fn test_activation_timeout_keeps_free_tier() {
        let config = SceneConfig {
            activation_max_attempts: 4,
            seed: Some(1),
            ..SceneConfig::default()
        };
        let mut scene: SceneRuntime<_, FakeCollaborator> =
            SceneRuntime::new(Arc::new(VirtualContext::new()), config);
        let collaborator = Arc::new(FakeCollaborator::full());
        scene.attach(collaborator.clone());
        settle().await;

        assert_eq!(
            scene.activation().status,
            Some(ActivationStatus::NotConfirmed { attempts: 4 })
        );
        assert!(!scene.signage().is_paid_tier());
        assert_eq!(collaborator.chat_inits(), 1);
        assert_eq!(scene.metrics().activation_polls, 4);
    }

    #[tokio::test]
    async fn test_video_events_route_to_screen() {
        let mut scene = scene();
        let collaborator = Arc::new(FakeCollaborator::full());
        scene.attach(collaborator.clone());

        assert!(scene.on_video_play("https://live/1.m3u8"));
        assert!(matches!(scene.video_state(), VideoPresentation::Live { .. }));
        scene.on_video_selected(&GuideVideo::new("v", "Main Stage").with_channel("c1"));
        scene.on_video_stop();

        assert_eq!(scene.video_state(), &VideoPresentation::Fallback);
        assert_eq!(scene.video().label().text, "Main Stage");
        assert_eq!(collaborator.watched_channels(), vec!["c1".to_string()]);
        assert_eq!(scene.compose_ui().map(|t| t.children.len()), Some(3));
    }
}
