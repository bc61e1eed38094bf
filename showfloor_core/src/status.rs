//! Session status panel: active/inactive orb, status line and watch timer.

use serde::{Deserialize, Serialize};

use crate::clock::sanitize;
use crate::signage::{palette, Color4, TextLabel};

/// Elapsed-time gate: fires when more than `interval` has passed since the
/// last time it fired.
///
/// The gate starts armed at time zero, so the first firing happens once
/// `now` exceeds `interval`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throttle {
    interval: f64,
    last: f64,
}

impl Throttle {
    pub fn new(interval: f64) -> Self {
        Self { interval, last: 0.0 }
    }

    /// Returns true (and re-arms) if the interval has strictly elapsed.
    pub fn ready(&mut self, now: f64) -> bool {
        if self.is_due(now) {
            self.last = now;
            true
        } else {
            false
        }
    }

    pub fn is_due(&self, now: f64) -> bool {
        now - self.last > self.interval
    }

    /// Re-arms at `now` without checking.
    pub fn mark(&mut self, now: f64) {
        self.last = now;
    }

    pub fn last(&self) -> f64 {
        self.last
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }
}

/// Watch time accumulated only while the session is active.
///
/// Never reset for the lifetime of the scene.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WatchTimer {
    seconds: f64,
}

impl WatchTimer {
    pub fn advance(&mut self, dt: f64, session_active: bool) {
        if session_active {
            self.seconds += sanitize(dt);
        }
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }
}

/// Formats seconds as `MM:SS`. Minutes keep counting past 59 (no hours).
pub fn format_mm_ss(seconds: f64) -> String {
    let total = sanitize(seconds).floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Material of the status orb.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbMaterial {
    pub albedo: Color4,
    pub emissive: Color4,
    pub emissive_intensity: f32,
}

/// Everything the status panel shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusPanel {
    /// None until the first refresh
    pub orb: Option<OrbMaterial>,
    pub status: TextLabel,
    pub timer: TextLabel,
}

impl Default for StatusPanel {
    fn default() -> Self {
        Self {
            orb: None,
            status: TextLabel::new("SESSION: CONNECTING...", palette::YELLOW),
            timer: TextLabel::new("TIME: 00:00", palette::WHITE),
        }
    }
}

impl StatusPanel {
    /// Rewrites the orb and status line for the given session state.
    pub fn show_session(&mut self, active: bool) {
        let (albedo, emissive, label) = if active {
            (palette::GREEN, palette::GREEN_GLOW, "SESSION: ACTIVE")
        } else {
            (palette::RED, palette::RED_GLOW, "SESSION: INACTIVE")
        };
        self.orb = Some(OrbMaterial {
            albedo,
            emissive,
            emissive_intensity: 3.0,
        });
        self.status = TextLabel::new(label, albedo);
    }

    pub fn show_watch_time(&mut self, seconds: f64) {
        self.timer.text = format!("TIME: {}", format_mm_ss(seconds));
    }
}

/// Throttled re-evaluation of the status panel.
#[derive(Debug, Clone)]
pub struct StatusRefresher {
    throttle: Throttle,
    panel: StatusPanel,
    refreshes: u64,
}

impl StatusRefresher {
    pub fn new(interval_secs: f64) -> Self {
        Self {
            throttle: Throttle::new(interval_secs),
            panel: StatusPanel::default(),
            refreshes: 0,
        }
    }

    /// Refreshes the panel if the interval has elapsed. Returns whether it did.
    pub fn maybe_refresh(&mut self, now: f64, session_active: bool, watch_seconds: f64) -> bool {
        if !self.throttle.ready(now) {
            return false;
        }
        self.panel.show_session(session_active);
        self.panel.show_watch_time(watch_seconds);
        self.refreshes += 1;
        true
    }

    pub fn panel(&self) -> &StatusPanel {
        &self.panel
    }

    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }
}
