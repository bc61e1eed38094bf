//! In-crate fakes for the env boundary.

use async_trait::async_trait;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use showfloor_env::{
    ActivationFlag, Collaborator, EnvError, GuideHandle, HeartbeatHandle, SceneContext,
    SessionHandle, SessionStats, UiComponent, UiModule,
};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Context whose clock only moves when something sleeps.
pub struct VirtualContext {
    now: Mutex<Duration>,
    seed: u64,
}

impl VirtualContext {
    pub fn new() -> Self {
        Self::with_seed(7)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            now: Mutex::new(Duration::ZERO),
            seed,
        }
    }
}

#[async_trait]
impl SceneContext for VirtualContext {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        *self.now.lock().unwrap() += duration;
        tokio::task::yield_now().await;
    }

    fn spawn<F>(&self, _name: &str, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(future);
    }

    fn derive_rng(&self, seed_extension: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed ^ seed_extension)
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}

#[derive(Default)]
pub struct FakeSession {
    active: AtomicBool,
    responses: Mutex<VecDeque<Result<Option<SessionStats>, EnvError>>>,
    calls: AtomicU32,
}

#[async_trait]
impl SessionHandle for FakeSession {
    fn is_session_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    async fn get_stats(&self) -> Result<Option<SessionStats>, EnvError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

pub struct FakeModule {
    name: &'static str,
    inits: AtomicU32,
    fail_init: AtomicBool,
    current_video: Mutex<Option<String>>,
}

impl FakeModule {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            inits: AtomicU32::new(0),
            fail_init: AtomicBool::new(false),
            current_video: Mutex::new(None),
        }
    }
}

#[async_trait]
impl UiModule for FakeModule {
    async fn init(&self) -> Result<(), EnvError> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(EnvError::unavailable(self.name));
        }
        Ok(())
    }

    fn component(&self) -> Option<UiComponent> {
        Some(UiComponent::new(self.name, true))
    }
}

impl GuideHandle for FakeModule {
    fn set_current_video_id(&self, video_id: &str) {
        *self.current_video.lock().unwrap() = Some(video_id.to_string());
    }
}

#[derive(Default)]
pub struct FakeHeartbeat {
    channels: Mutex<Vec<String>>,
}

impl HeartbeatHandle for FakeHeartbeat {
    fn start_watching(&self, channel_id: &str) {
        self.channels.lock().unwrap().push(channel_id.to_string());
    }
}

/// SDK client double with every handle optional.
pub struct FakeCollaborator {
    confirmed: AtomicBool,
    session: Option<Arc<FakeSession>>,
    guide: Option<Arc<FakeModule>>,
    chat: Option<Arc<FakeModule>>,
    admin: Option<Arc<FakeModule>>,
    heartbeat: Option<Arc<FakeHeartbeat>>,
}

impl FakeCollaborator {
    /// Every handle present, session inactive, not confirmed.
    pub fn full() -> Self {
        Self {
            confirmed: AtomicBool::new(false),
            session: Some(Arc::new(FakeSession::default())),
            guide: Some(Arc::new(FakeModule::new("guide"))),
            chat: Some(Arc::new(FakeModule::new("chat"))),
            admin: Some(Arc::new(FakeModule::new("admin"))),
            heartbeat: Some(Arc::new(FakeHeartbeat::default())),
        }
    }

    /// No handles at all.
    pub fn bare() -> Self {
        Self {
            confirmed: AtomicBool::new(false),
            session: None,
            guide: None,
            chat: None,
            admin: None,
            heartbeat: None,
        }
    }

    pub fn without_admin(mut self) -> Self {
        self.admin = None;
        self
    }

    pub fn set_confirmed(&self, confirmed: bool) {
        self.confirmed.store(confirmed, Ordering::SeqCst);
    }

    pub fn set_session_active(&self, active: bool) {
        if let Some(session) = &self.session {
            session.active.store(active, Ordering::SeqCst);
        }
    }

    pub fn push_stats(&self, response: Result<Option<SessionStats>, EnvError>) {
        if let Some(session) = &self.session {
            session.responses.lock().unwrap().push_back(response);
        }
    }

    pub fn fail_chat_init(&self) {
        if let Some(chat) = &self.chat {
            chat.fail_init.store(true, Ordering::SeqCst);
        }
    }

    pub fn stats_calls(&self) -> u32 {
        self.session.as_ref().map_or(0, |s| s.calls.load(Ordering::SeqCst))
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
        self.guide.as_ref().and_then(|g| g.current_video.lock().unwrap().clone())
    }

    pub fn watched_channels(&self) -> Vec<String> {
        self.heartbeat
            .as_ref()
            .map(|h| h.channels.lock().unwrap().clone())
            .unwrap_or_default()
    }
}

impl ActivationFlag for FakeCollaborator {
    fn is_confirmed(&self) -> bool {
        self.confirmed.load(Ordering::SeqCst)
    }
}

impl Collaborator for FakeCollaborator {
    fn session(&self) -> Option<Arc<dyn SessionHandle>> {
        self.session.clone().map(|s| s as Arc<dyn SessionHandle>)
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
        self.heartbeat.clone().map(|h| h as Arc<dyn HeartbeatHandle>)
    }
}
