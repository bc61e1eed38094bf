//! Today's-stats panel: periodic fetch of remote usage counters.
//!
//! The fetch is fire-and-forget relative to the tick. Its completion swaps
//! the whole [`TelemetrySnapshot`] under one write lock, so a render never
//! sees counters from two different fetches. A failed fetch leaves the
//! previous counters on display.
//!
//! Each fetch carries the sequence number it was issued with. A result that
//! completes after a newer one has already landed is dropped.

use serde::{Deserialize, Serialize};
use showfloor_env::{SessionHandle, SessionStats};
use std::sync::{Arc, PoisonError, RwLock, Weak};
use tracing::debug;

use crate::signage::{palette, TextLabel};
use crate::status::Throttle;

/// Which visitor line to show. Exactly one applies to any response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitorIdentity {
    /// "You are visitor #N"
    Rank(u64),

    /// No rank yet, but the server says this is the first visitor
    FirstVisitor,

    /// Neither rank nor first-visitor flag
    Welcome,
}

impl VisitorIdentity {
    /// Resolves the tie-break: rank, then first-visitor flag, then welcome.
    ///
    /// A rank of 0 is treated as absent.
    pub fn from_stats(stats: &SessionStats) -> Self {
        match stats.visitor_number {
            Some(rank) if rank > 0 => Self::Rank(rank),
            _ if stats.is_first_visitor == Some(true) => Self::FirstVisitor,
            _ => Self::Welcome,
        }
    }

    pub fn label(&self) -> TextLabel {
        match self {
            Self::Rank(rank) => TextLabel::new(format!("You are visitor #{rank}"), palette::GREEN),
            Self::FirstVisitor => TextLabel::new("You are the first visitor!", palette::CYAN),
            Self::Welcome => TextLabel::new("Welcome!", palette::WHITE),
        }
    }
}

/// Counters from one successful fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub unique_visitors: u64,
    pub total_sessions: u64,
    pub identity: VisitorIdentity,
}

impl From<&SessionStats> for TelemetrySnapshot {
    fn from(stats: &SessionStats) -> Self {
        Self {
            unique_visitors: stats.unique_visitors,
            total_sessions: stats.total_sessions,
            identity: VisitorIdentity::from_stats(stats),
        }
    }
}

/// The three lines of the stats panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsBoard {
    pub visitors: TextLabel,
    pub sessions: TextLabel,
    pub visitor_line: TextLabel,
    snapshot: Option<TelemetrySnapshot>,
    applied_seq: Option<u64>,
}

impl Default for StatsBoard {
    fn default() -> Self {
        Self {
            visitors: TextLabel::new("Visitors: --", palette::WHITE),
            sessions: TextLabel::new("Sessions: --", palette::WHITE),
            visitor_line: TextLabel::new("You are visitor #--", palette::GREEN),
            snapshot: None,
            applied_seq: None,
        }
    }
}

impl StatsBoard {
    /// Replaces all three lines from `snapshot`, issued as fetch `seq`.
    ///
    /// Returns false and leaves the board untouched if a fetch issued at or
    /// after `seq` is already on display.
    pub fn apply(&mut self, seq: u64, snapshot: TelemetrySnapshot) -> bool {
        if self.applied_seq.is_some_and(|applied| seq <= applied) {
            return false;
        }
        self.applied_seq = Some(seq);
        self.visitors.text = format!("Visitors: {}", snapshot.unique_visitors);
        self.sessions.text = format!("Sessions: {}", snapshot.total_sessions);
        self.visitor_line = snapshot.identity.label();
        self.snapshot = Some(snapshot);
        true
    }

    /// The snapshot currently on display, if any fetch has succeeded.
    pub fn snapshot(&self) -> Option<&TelemetrySnapshot> {
        self.snapshot.as_ref()
    }

    /// Sequence number of the fetch currently on display.
    pub fn applied_seq(&self) -> Option<u64> {
        self.applied_seq
    }
}

/// Stats board shared between the render path and in-flight fetches.
pub type SharedStatsBoard = Arc<RwLock<StatsBoard>>;

/// Reads a consistent copy of the board.
pub fn read_board(board: &SharedStatsBoard) -> StatsBoard {
    board.read().unwrap_or_else(PoisonError::into_inner).clone()
}

/// How a single fetch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Counters were replaced
    Applied,

    /// Server returned nothing; display untouched
    Empty,

    /// Network/decoding error; display untouched
    Failed,

    /// Scene was torn down before the fetch completed
    Discarded,

    /// A later-issued fetch landed first; display untouched
    Superseded,
}

/// Runs fetch `seq` and applies the result to `board` if it still exists.
///
/// Holds only a weak reference across the await, so a fetch that outlives
/// the scene never keeps the board alive and never writes to it.
pub async fn fetch_and_apply(
    session: Arc<dyn SessionHandle>,
    board: Weak<RwLock<StatsBoard>>,
    seq: u64,
) -> FetchOutcome {
    let stats = match session.get_stats().await {
        Ok(Some(stats)) => stats,
        Ok(None) => return FetchOutcome::Empty,
        Err(err) => {
            debug!(error = %err, "stats fetch failed; keeping previous counters");
            return FetchOutcome::Failed;
        }
    };

    let Some(board) = board.upgrade() else {
        debug!("stats fetch completed after teardown; discarding");
        return FetchOutcome::Discarded;
    };

    let snapshot = TelemetrySnapshot::from(&stats);
    let applied = board
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .apply(seq, snapshot);
    if !applied {
        debug!(seq, "stats fetch overtaken by a newer one; discarding");
        return FetchOutcome::Superseded;
    }
    debug!(
        seq,
        visitors = snapshot.unique_visitors,
        sessions = snapshot.total_sessions,
        "stats applied"
    );
    FetchOutcome::Applied
}

/// Decides when the tick should issue a fetch.
///
/// Fires immediately the first time the session is seen active, then
/// whenever more than `interval` of scene time has passed.
#[derive(Debug, Clone)]
pub struct StatsRefresher {
    throttle: Throttle,
    issued: u64,
}

impl StatsRefresher {
    pub fn new(interval_secs: f64) -> Self {
        Self {
            throttle: Throttle::new(interval_secs),
            issued: 0,
        }
    }

    /// Returns the sequence number (and re-arms) if a fetch should be
    /// issued now. Sequence numbers start at 1 and only grow.
    pub fn next_fetch(&mut self, now: f64, session_active: bool) -> Option<u64> {
        if !session_active {
            return None;
        }
        if self.has_fetched() && !self.throttle.is_due(now) {
            return None;
        }
        self.throttle.mark(now);
        self.issued += 1;
        Some(self.issued)
    }

    pub fn has_fetched(&self) -> bool {
        self.issued > 0
    }
}
