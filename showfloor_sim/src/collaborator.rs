//! Scripted SDK client with fault injection.
//!
//! Stands in for the vendor SDK during simulation. Every behavior the scene
//! depends on is scripted up front (when the paid tier confirms, which stats
//! calls fail, how long they take) and every outbound call is recorded so
//! scenarios can assert on it.

use async_trait::async_trait;
use showfloor_env::{
    ActivationFlag, Collaborator, EnvError, GuideHandle, HeartbeatHandle, SceneContext,
    SessionHandle, SessionStats, UiComponent, UiModule,
};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;

use crate::context::SimContext;

/// Scripted stats responses.
#[derive(Debug, Clone)]
pub struct StatsScript {
    /// Counters returned by the first call; later calls grow from here
    pub base: SessionStats,

    /// Calls with index >= this fail
    pub fail_from_call: Option<u32>,

    /// Virtual time each call takes
    pub latency: Duration,
}

impl Default for StatsScript {
    fn default() -> Self {
        Self {
            base: SessionStats {
                unique_visitors: 12,
                total_sessions: 40,
                visitor_number: Some(7),
                is_first_visitor: None,
            },
            fail_from_call: None,
            latency: Duration::from_millis(150),
        }
    }
}

/// Simulated session tracker.
pub struct ScriptedSession {
    ctx: Arc<SimContext>,
    active: AtomicBool,
    script: StatsScript,
    calls: AtomicU32,
}

#[async_trait]
impl SessionHandle for ScriptedSession {
    fn is_session_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    async fn get_stats(&self) -> Result<Option<SessionStats>, EnvError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.ctx.sleep(self.script.latency).await;

        if self.script.fail_from_call.is_some_and(|from| call >= from) {
            debug!(call, "injected stats failure");
            return Err(EnvError::fetch(format!("injected failure on call {call}")));
        }

        let grown = u64::from(call);
        Ok(Some(SessionStats {
            unique_visitors: self.script.base.unique_visitors + grown,
            total_sessions: self.script.base.total_sessions + grown * 3,
            ..self.script.base.clone()
        }))
    }
}

/// Simulated guide/chat/admin module.
pub struct ScriptedModule {
    name: &'static str,
    inits: AtomicU32,
    current_video: Mutex<Option<String>>,
}

impl ScriptedModule {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            inits: AtomicU32::new(0),
            current_video: Mutex::new(None),
        }
    }
}

#[async_trait]
impl UiModule for ScriptedModule {
    async fn init(&self) -> Result<(), EnvError> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn component(&self) -> Option<UiComponent> {
        Some(UiComponent::new(self.name, self.inits.load(Ordering::SeqCst) > 0))
    }
}

impl GuideHandle for ScriptedModule {
    fn set_current_video_id(&self, video_id: &str) {
        let mut current = self.current_video.lock().unwrap_or_else(PoisonError::into_inner);
        *current = Some(video_id.to_string());
    }
}

/// Simulated watch-time tracker.
#[derive(Default)]
pub struct ScriptedHeartbeat {
    channels: Mutex<Vec<String>>,
}

impl HeartbeatHandle for ScriptedHeartbeat {
    fn start_watching(&self, channel_id: &str) {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(channel_id.to_string());
    }
}

/// The scripted SDK client.
pub struct ScriptedCollaborator {
    /// Flag read on which the paid tier confirms (1-based); None = never
    confirm_on_read: Option<u32>,
    flag_reads: AtomicU32,
    session: Arc<ScriptedSession>,
    guide: Option<Arc<ScriptedModule>>,
    chat: Option<Arc<ScriptedModule>>,
    admin: Option<Arc<ScriptedModule>>,
    heartbeat: Arc<ScriptedHeartbeat>,
}

impl ScriptedCollaborator {
    /// A free-tier client: never confirms, session inactive, no admin panel.
    pub fn new(ctx: Arc<SimContext>) -> Self {
        Self {
            confirm_on_read: None,
            flag_reads: AtomicU32::new(0),
            session: Arc::new(ScriptedSession {
                ctx,
                active: AtomicBool::new(false),
                script: StatsScript::default(),
                calls: AtomicU32::new(0),
            }),
            guide: Some(Arc::new(ScriptedModule::new("guide"))),
            chat: Some(Arc::new(ScriptedModule::new("chat"))),
            admin: None,
            heartbeat: Arc::new(ScriptedHeartbeat::default()),
        }
    }

    /// Confirms the paid tier on the `read`-th flag read.
    pub fn with_confirm_on_read(mut self, read: u32) -> Self {
        self.confirm_on_read = Some(read);
        self
    }

    pub fn with_stats_script(mut self, script: StatsScript) -> Self {
        if let Some(session) = Arc::get_mut(&mut self.session) {
            session.script = script;
        }
        self
    }

    pub fn with_admin_panel(mut self) -> Self {
        self.admin = Some(Arc::new(ScriptedModule::new("admin")));
        self
    }

    pub fn with_session_active(self, active: bool) -> Self {
        self.set_session_active(active);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn set_session_active(&self, active: bool) {
        self.session.active.store(active, Ordering::SeqCst);
    }

    pub fn flag_reads(&self) -> u32 {
        self.flag_reads.load(Ordering::SeqCst)
    }

    pub fn stats_calls(&self) -> u32 {
        self.session.calls.load(Ordering::SeqCst)
    }

    pub fn guide_inits(&self) -> u32 {
        self.guide.as_ref().map_or(0, |g| g.inits.load(Ordering::SeqCst))
    }

    pub fn chat_inits(&self) -> u32 {
        self.chat.as_ref().map_or(0, |c| c.inits.load(Ordering::SeqCst))
    }

    pub fn admin_inits(&self) -> u32 {
        self.admin.as_ref().map_or(0, |a| a.inits.load(Ordering::SeqCst))
    }

    pub fn current_video_id(&self) -> Option<String> {
        self.guide
            .as_ref()
            .and_then(|g| g.current_video.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    pub fn watched_channels(&self) -> Vec<String> {
        self.heartbeat
            .channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ActivationFlag for ScriptedCollaborator {
    fn is_confirmed(&self) -> bool {
        let read = self.flag_reads.fetch_add(1, Ordering::SeqCst) + 1;
        self.confirm_on_read.is_some_and(|k| read >= k)
    }
}

impl Collaborator for ScriptedCollaborator {
    fn session(&self) -> Option<Arc<dyn SessionHandle>> {
        Some(self.session.clone() as Arc<dyn SessionHandle>)
    }

    fn guide(&self) -> Option<Arc<dyn GuideHandle>> {
        self.guide.clone().map(|g| g as Arc<dyn GuideHandle>)
    }

    fn chat(&self) -> Option<Arc<dyn UiModule>> {
        self.chat.clone().map(|c| c as Arc<dyn UiModule>)
    }

    fn admin_panel(&self) -> Option<Arc<dyn UiModule>> {
        self.admin.clone().map(|a| a as Arc<dyn UiModule>)
    }

    fn heartbeat(&self) -> Option<Arc<dyn HeartbeatHandle>> {
        Some(self.heartbeat.clone() as Arc<dyn HeartbeatHandle>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirms_on_scripted_read() {
        let collab = ScriptedCollaborator::new(SimContext::shared(1)).with_confirm_on_read(3);
        assert!(!collab.is_confirmed());
        assert!(!collab.is_confirmed());
        assert!(collab.is_confirmed());
        assert_eq!(collab.flag_reads(), 3);
    }

    #[test]
    fn test_free_tier_never_confirms() {
        let collab = ScriptedCollaborator::new(SimContext::shared(1));
        assert!((0..50).all(|_| !collab.is_confirmed()));
    }

    #[tokio::test]
    async fn test_stats_fail_from_scripted_call() {
        let ctx = SimContext::shared(1);
        let collab = ScriptedCollaborator::new(ctx).with_stats_script(StatsScript {
            fail_from_call: Some(1),
            latency: Duration::ZERO,
            ..StatsScript::default()
        });
        let session = collab.session().unwrap();

        let first = session.get_stats().await.unwrap().unwrap();
        assert_eq!(first.unique_visitors, 12);
        assert!(session.get_stats().await.is_err());
        assert_eq!(collab.stats_calls(), 2);
    }

    #[test]
    fn test_records_outbound_calls() {
        let collab = ScriptedCollaborator::new(SimContext::shared(1));
        collab.guide().unwrap().set_current_video_id("v-9");
        collab.heartbeat().unwrap().start_watching("chan");

        assert_eq!(collab.current_video_id().as_deref(), Some("v-9"));
        assert_eq!(collab.watched_channels(), vec!["chan".to_string()]);
        assert!(collab.admin_panel().is_none());
    }
}
