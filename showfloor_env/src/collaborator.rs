//! Boundary traits for the vendor SDK client.
//!
//! The scene core never owns the SDK. It talks to it through these traits,
//! and every optional feature is surfaced as `Option<Arc<dyn ...>>` so the
//! core checks for presence instead of relying on null short-circuits.
//!
//! # Call Flow
//!
//! ```text
//! SDK client                         Scene core
//!   |                                   |
//!   |<-- is_confirmed() (poll) ---------|  activation wait
//!   |<-- guide()/chat() .init() --------|  once, after activation
//!   |<-- session().get_stats() ---------|  every 30s (fire-and-forget)
//!   |--- onVideoPlay/Stop/Selected ---->|  video controller
//!   |<-- guide().set_current_video_id --|
//!   |<-- heartbeat().start_watching ----|
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::EnvError;
use crate::types::{SessionStats, UiComponent};

/// A remotely confirmed capability flag.
///
/// Reports `true` once the server has confirmed paid-tier features. Until
/// then (and forever, on the free tier) it reports `false`.
pub trait ActivationFlag: Send + Sync {
    fn is_confirmed(&self) -> bool;
}

impl<F> ActivationFlag for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_confirmed(&self) -> bool {
        self()
    }
}

/// Session tracking handle.
#[async_trait]
pub trait SessionHandle: Send + Sync {
    /// Whether the viewer's session is currently active.
    fn is_session_active(&self) -> bool;

    /// Fetches today's usage counters.
    ///
    /// # Returns
    /// * `Ok(Some(stats))` - Counters were fetched
    /// * `Ok(None)` - The server answered with nothing to show
    /// * `Err(_)` - Network or decoding failure
    async fn get_stats(&self) -> Result<Option<SessionStats>, EnvError>;
}

/// An SDK UI module (guide, chat, admin panel).
#[async_trait]
pub trait UiModule: Send + Sync {
    /// One-time module initialization.
    async fn init(&self) -> Result<(), EnvError>;

    /// The panel this module currently contributes, if any.
    fn component(&self) -> Option<UiComponent>;
}

/// The channel guide: a UI module that can show a "now playing" marker.
pub trait GuideHandle: UiModule {
    fn set_current_video_id(&self, video_id: &str);
}

/// Watch-time heartbeat tracker.
pub trait HeartbeatHandle: Send + Sync {
    fn start_watching(&self, channel_id: &str);
}

/// The vendor SDK client as seen by the scene core.
///
/// Every accessor may return `None`: features are enabled asynchronously
/// after the session starts, and some tiers never get them.
pub trait Collaborator: ActivationFlag + 'static {
    fn session(&self) -> Option<Arc<dyn SessionHandle>>;

    fn guide(&self) -> Option<Arc<dyn GuideHandle>>;

    fn chat(&self) -> Option<Arc<dyn UiModule>>;

    fn admin_panel(&self) -> Option<Arc<dyn UiModule>>;

    fn heartbeat(&self) -> Option<Arc<dyn HeartbeatHandle>>;
}
