//! showfloor Environment Abstraction Layer
//!
//! This crate provides the "Sans-IO" boundary that lets the showfloor scene
//! core run both inside a real client (tokio) and inside the deterministic
//! simulation harness.
//!
//! # Core Concept: Everything External Is Injected
//!
//! The scene core never touches a clock, an RNG or the vendor SDK directly:
//! - Time (`now()`, `sleep()`) comes from a [`SceneContext`]
//! - Randomness for decoration parameters comes from `derive_rng()`
//! - The SDK client (session, guide, chat, heartbeat) is a [`Collaborator`]
//!
//! Optional SDK features are modelled as `Option<Arc<dyn Handle>>`, so
//! "feature not yet available" is an explicit state rather than a silent
//! short-circuit.
//!
//! # Example
//!
//! ```ignore
//! use showfloor_env::{SceneContext, ActivationFlag};
//!
//! async fn wait_for_tier<Ctx: SceneContext, F: ActivationFlag>(ctx: &Ctx, flag: &F) -> bool {
//!     for _ in 0..20 {
//!         if flag.is_confirmed() {
//!             return true;
//!         }
//!         ctx.sleep(Duration::from_millis(500)).await;
//!     }
//!     false
//! }
//! ```

mod collaborator;
mod context;
mod error;
mod tokio_impl;
mod types;

pub use collaborator::{
    ActivationFlag, Collaborator, GuideHandle, HeartbeatHandle, SessionHandle, UiModule,
};
pub use context::SceneContext;
pub use error::EnvError;
pub use tokio_impl::TokioContext;
pub use types::{EntityId, GuideVideo, SessionStats, UiComponent, UiTree};
