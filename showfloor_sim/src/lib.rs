//! Showfloor Deterministic Simulation Harness
//!
//! A controlled environment in which the scene runs frame by frame against
//! a scripted SDK client.
//!
//! # Core Principle: The Reactor Pattern
//!
//! All sources of non-determinism are intercepted and controlled:
//! - **Time**: Virtual clock advances only when the driver runs a frame
//! - **SDK**: Activation, stats and UI modules are scripted, with fault injection
//! - **Randomness**: All entropy derived from a single 64-bit seed
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         SimWorld                            │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │ current-thread tokio + SimContext (virtual clock)    │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │       │ tick(dt)                    ▲ sleep / spawn          │
//! │  ┌────▼──────────────┐        ┌─────┴──────────────────┐    │
//! │  │   SceneRuntime    │◄──────►│  ScriptedCollaborator  │    │
//! │  └───────────────────┘        └────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use showfloor_sim::{ScenarioRunner, scenarios::ScenarioId};
//!
//! let result = ScenarioRunner::new(42).run(ScenarioId::PaidActivation);
//! assert!(result.passed);
//! ```

mod collaborator;
mod context;
mod error;
mod exporter;
mod runner;
pub mod scenarios;
mod world;

pub use collaborator::{ScriptedCollaborator, StatsScript};
pub use context::SimContext;
pub use error::SimError;
pub use exporter::{ObjectPose, SimEvent, SimExport, SimFrame};
pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use world::{SimConfig, SimWorld};
