//! Showfloor Core - frame-driven scene animation and session-state sync
//!
//! The scene is a virtual showroom whose decorations animate every frame
//! and whose panels mirror a remote session:
//! 1. **Motion**: pure closed-form poses over elapsed time, plus cumulative spin
//! 2. **Activation**: bounded, cooperative wait for the paid tier to confirm
//! 3. **Panels**: throttled status/watch-time refresh and fire-and-forget stats
//! 4. **Video**: fallback loop vs. live stream on a single screen
//!
//! [`SceneRuntime`] ties these together behind one per-tick callback and one
//! UI-composition callback.

pub mod activation;
pub mod clock;
pub mod config;
pub mod error;
pub mod metrics;
pub mod motion;
pub mod runtime;
pub mod showroom;
pub mod signage;
pub mod stats;
pub mod status;
pub mod ui;
pub mod video;

#[cfg(test)]
mod test_support;

// Re-export key types for convenience
pub use activation::{
    await_activation, ActivationPoller, ActivationStatus, BootstrapReport, PollerState, UiBootstrap,
};
pub use clock::AnimationClock;
pub use config::SceneConfig;
pub use error::SceneError;
pub use metrics::{MetricsSnapshot, SceneMetrics};
pub use motion::{AnimatedObject, Motion, MotionSet, PulseMode, Spin, Transform, Wave};
pub use runtime::{ActivationRecord, SceneRuntime};
pub use signage::{Color4, Signage, TextLabel};
pub use stats::{FetchOutcome, StatsBoard, StatsRefresher, TelemetrySnapshot, VisitorIdentity};
pub use status::{format_mm_ss, StatusPanel, StatusRefresher, Throttle, WatchTimer};
pub use ui::compose_ui;
pub use video::{
    PlaybackConfig, ScreenConfiguration, ScreenMaterial, VideoPresentation, VideoScreenController,
};
