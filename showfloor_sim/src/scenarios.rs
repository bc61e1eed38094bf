//! Simulation scenarios.

use serde::{Serialize, Serializer};

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenarioId {
    /// SIM-001: Paid tier confirms on the third poll
    PaidActivation,

    /// SIM-002: Paid tier never confirms; scene degrades to free tier
    ActivationTimeout,

    /// SIM-003: First stats fetch succeeds, every later one fails
    StatsOutage,

    /// SIM-004: Live play, guide selection, stop back to fallback
    VideoSwitch,

    /// SIM-005: Jittered frame deltas vs. a fixed-step replay
    FrameJitter,

    /// SIM-006: Renderer runs before the SDK client exists
    LateCollaborator,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::PaidActivation,
            ScenarioId::ActivationTimeout,
            ScenarioId::StatsOutage,
            ScenarioId::VideoSwitch,
            ScenarioId::FrameJitter,
            ScenarioId::LateCollaborator,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::PaidActivation => "paid_activation",
            ScenarioId::ActivationTimeout => "activation_timeout",
            ScenarioId::StatsOutage => "stats_outage",
            ScenarioId::VideoSwitch => "video_switch",
            ScenarioId::FrameJitter => "frame_jitter",
            ScenarioId::LateCollaborator => "late_collaborator",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::PaidActivation => {
                "Flag confirms at poll 3; UI modules init once, signage relabels"
            }
            ScenarioId::ActivationTimeout => {
                "Flag never confirms; exactly 20 polls, free-tier signage kept"
            }
            ScenarioId::StatsOutage => {
                "Stats fail after the first fetch; stale counters stay on the board"
            }
            ScenarioId::VideoSwitch => {
                "Play, select, stop; fallback configuration restored exactly"
            }
            ScenarioId::FrameJitter => "Random dt (incl. negative/NaN) matches a fixed-step replay",
            ScenarioId::LateCollaborator => "UI composes to nothing until the SDK client attaches",
        }
    }

    /// Minimum simulated seconds the scenario needs to reach its assertions.
    pub fn min_duration_secs(&self) -> f64 {
        match self {
            ScenarioId::PaidActivation => 2.0,
            // 19 sleeps of 500ms before the last poll
            ScenarioId::ActivationTimeout => 10.5,
            // three fetch windows of 30s
            ScenarioId::StatsOutage => 65.0,
            ScenarioId::VideoSwitch => 3.0,
            ScenarioId::FrameJitter => 1.0,
            ScenarioId::LateCollaborator => 4.0,
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paid_activation" | "paidactivation" | "sim-001" => Ok(ScenarioId::PaidActivation),
            "activation_timeout" | "activationtimeout" | "sim-002" => {
                Ok(ScenarioId::ActivationTimeout)
            }
            "stats_outage" | "statsoutage" | "sim-003" => Ok(ScenarioId::StatsOutage),
            "video_switch" | "videoswitch" | "sim-004" => Ok(ScenarioId::VideoSwitch),
            "frame_jitter" | "framejitter" | "sim-005" => Ok(ScenarioId::FrameJitter),
            "late_collaborator" | "latecollaborator" | "sim-006" => {
                Ok(ScenarioId::LateCollaborator)
            }
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}

impl Serialize for ScenarioId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
