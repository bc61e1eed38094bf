//! Animation clock - the shared time base for all procedural motion.

/// Monotonic elapsed-time counter advanced once per tick.
///
/// Elapsed time is the only input procedural motion is allowed to depend
/// on, so two clocks fed different `dt` sequences with the same sum land on
/// the same scene pose.
#[derive(Debug, Clone, Default)]
pub struct AnimationClock {
    /// Accumulated scene time in seconds
    elapsed: f64,

    /// Number of ticks applied
    ticks: u64,

    /// Duration of the most recent tick (after sanitizing)
    last_dt: f64,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a clock at an arbitrary elapsed time (replay / resume).
    pub fn starting_at(elapsed: f64) -> Self {
        Self {
            elapsed: sanitize(elapsed),
            ..Self::default()
        }
    }

    /// Advances by one tick and returns the new elapsed time.
    ///
    /// Negative, NaN or infinite deltas count as zero so the clock never
    /// runs backwards.
    pub fn advance(&mut self, dt: f64) -> f64 {
        let dt = sanitize(dt);
        self.elapsed += dt;
        self.last_dt = dt;
        self.ticks += 1;
        self.elapsed
    }

    /// Elapsed scene time in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Sanitized duration of the last tick.
    pub fn last_dt(&self) -> f64 {
        self.last_dt
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Clamps a time value to a finite, non-negative number.
pub(crate) fn sanitize(dt: f64) -> f64 {
    if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        0.0
    }
}
