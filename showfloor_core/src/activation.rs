//! Feature activation - bounded wait for the server to confirm the paid tier.
//!
//! Paid-tier features are enabled asynchronously after the session starts.
//! The poller reads the flag, sleeps a fixed interval through the context
//! and reads again, until the flag confirms or the attempt budget runs out:
//!
//! ```text
//!            read → false, attempts < max
//!           ┌──────────────┐
//!           ▼              │
//!   ┌───────────────┐──────┘   read → true     ┌───────────┐
//!   │    Pending    │─────────────────────────▶│ Confirmed │
//!   └───────────────┘                          └───────────┘
//!           │ read → false, attempts == max    ┌───────────┐
//!           └─────────────────────────────────▶│ Exhausted │
//!                                              └───────────┘
//! ```
//!
//! Exhaustion is not an error: the scene keeps its free-tier presentation.
//! Once resolved, [`UiBootstrap`] initializes the SDK UI modules exactly
//! once and, only on confirmation, relabels the signage.

use showfloor_env::{ActivationFlag, Collaborator, SceneContext};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::signage::Signage;

/// Result of an activation wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationStatus {
    /// Flag confirmed on poll `attempts`
    Confirmed { attempts: u32 },

    /// Budget exhausted after `attempts` polls
    NotConfirmed { attempts: u32 },
}

impl ActivationStatus {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }

    /// Number of flag reads performed.
    pub fn attempts(&self) -> u32 {
        match *self {
            Self::Confirmed { attempts } | Self::NotConfirmed { attempts } => attempts,
        }
    }
}

/// Poller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Pending { attempts: u32 },
    Confirmed { attempts: u32 },
    Exhausted { attempts: u32 },
}

impl PollerState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending { .. })
    }
}

/// Explicit state machine for the activation wait.
///
/// `poll` performs exactly one flag read; `run` drives `poll` with the
/// context's sleep between reads. Tests can drive either one.
#[derive(Debug, Clone)]
pub struct ActivationPoller {
    max_attempts: u32,
    interval: Duration,
    state: PollerState,
}

impl ActivationPoller {
    /// Creates a poller with a budget of `max_attempts` reads.
    ///
    /// A budget of zero starts exhausted.
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        let state = if max_attempts == 0 {
            PollerState::Exhausted { attempts: 0 }
        } else {
            PollerState::Pending { attempts: 0 }
        };
        Self {
            max_attempts,
            interval,
            state,
        }
    }

    pub fn state(&self) -> PollerState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The outcome, once the poller has resolved.
    pub fn status(&self) -> Option<ActivationStatus> {
        match self.state {
            PollerState::Pending { .. } => None,
            PollerState::Confirmed { attempts } => Some(ActivationStatus::Confirmed { attempts }),
            PollerState::Exhausted { attempts } => {
                Some(ActivationStatus::NotConfirmed { attempts })
            }
        }
    }

    /// Reads the flag once. Does nothing after resolution.
    pub fn poll<F: ActivationFlag + ?Sized>(&mut self, flag: &F) -> PollerState {
        if let PollerState::Pending { attempts } = self.state {
            let attempts = attempts + 1;
            self.state = if flag.is_confirmed() {
                PollerState::Confirmed { attempts }
            } else if attempts >= self.max_attempts {
                PollerState::Exhausted { attempts }
            } else {
                PollerState::Pending { attempts }
            };
        }
        self.state
    }

    /// Polls until resolved, sleeping `interval` between reads.
    ///
    /// The sleep goes through the context, so the caller's scheduler keeps
    /// running ticks while this task waits.
    pub async fn run<Ctx, F>(&mut self, ctx: &Ctx, flag: &F) -> ActivationStatus
    where
        Ctx: SceneContext + ?Sized,
        F: ActivationFlag + ?Sized,
    {
        loop {
            match self.poll(flag) {
                PollerState::Pending { attempts } => {
                    debug!(attempts, "activation not confirmed yet");
                    ctx.sleep(self.interval).await;
                }
                PollerState::Confirmed { attempts } => {
                    return ActivationStatus::Confirmed { attempts }
                }
                PollerState::Exhausted { attempts } => {
                    return ActivationStatus::NotConfirmed { attempts }
                }
            }
        }
    }
}

/// Waits for `flag` to confirm, reading it at most `max_attempts` times.
///
/// Never fails: an unconfirmed flag after the budget yields
/// [`ActivationStatus::NotConfirmed`].
pub async fn await_activation<Ctx, F>(
    ctx: &Ctx,
    flag: &F,
    max_attempts: u32,
    poll_interval_ms: u64,
) -> ActivationStatus
where
    Ctx: SceneContext + ?Sized,
    F: ActivationFlag + ?Sized,
{
    ActivationPoller::new(max_attempts, Duration::from_millis(poll_interval_ms))
        .run(ctx, flag)
        .await
}

/// What the one-time UI bootstrap did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub guide_initialized: bool,
    pub chat_initialized: bool,
    pub relabeled: bool,
}

/// One-shot initialization of SDK UI modules after activation resolves.
#[derive(Debug, Default)]
pub struct UiBootstrap {
    done: AtomicBool,
}

impl UiBootstrap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::SeqCst)
    }

    /// Initializes present UI modules and, if confirmed, relabels the
    /// signage for the paid tier.
    ///
    /// Returns `None` if the bootstrap already ran for this scene. Module
    /// init is best effort: failures are logged and reported, not raised.
    pub async fn complete<C>(
        &self,
        status: ActivationStatus,
        collaborator: &C,
        signage: &RwLock<Signage>,
    ) -> Option<BootstrapReport>
    where
        C: Collaborator + ?Sized,
    {
        if self.done.swap(true, Ordering::SeqCst) {
            return None;
        }

        let mut report = BootstrapReport::default();

        match collaborator.guide() {
            Some(guide) => match guide.init().await {
                Ok(()) => report.guide_initialized = true,
                Err(err) => warn!(error = %err, "guide UI init failed"),
            },
            None => debug!("guide UI not available"),
        }

        match collaborator.chat() {
            Some(chat) => match chat.init().await {
                Ok(()) => report.chat_initialized = true,
                Err(err) => warn!(error = %err, "chat UI init failed"),
            },
            None => debug!("chat UI not available"),
        }

        if status.is_confirmed() {
            signage.write().unwrap_or_else(PoisonError::into_inner).apply_paid_tier();
            report.relabeled = true;
        }

        info!(
            confirmed = status.is_confirmed(),
            attempts = status.attempts(),
            guide = report.guide_initialized,
            chat = report.chat_initialized,
            "UI bootstrap complete"
        );
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeCollaborator, VirtualContext};
    use std::sync::atomic::AtomicU32;
    use std::sync::Arc;

    /// Flag that confirms on read `confirm_on` (1-based), counting reads.
    struct CountingFlag {
        reads: AtomicU32,
        confirm_on: Option<u32>,
    }

    impl CountingFlag {
        fn new(confirm_on: Option<u32>) -> Self {
            Self {
                reads: AtomicU32::new(0),
                confirm_on,
            }
        }

        fn reads(&self) -> u32 {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl ActivationFlag for CountingFlag {
        fn is_confirmed(&self) -> bool {
            let read = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
            self.confirm_on.is_some_and(|k| read >= k)
        }
    }

    #[tokio::test]
    async fn test_never_confirming_polls_exactly_budget() {
        let ctx = VirtualContext::new();
        let flag = CountingFlag::new(None);

        let status = await_activation(&ctx, &flag, 20, 500).await;

        assert_eq!(status, ActivationStatus::NotConfirmed { attempts: 20 });
        assert_eq!(flag.reads(), 20);
        // 19 waits between 20 reads
        assert_eq!(ctx.now(), Duration::from_millis(19 * 500));
    }

    #[tokio::test]
    async fn test_confirming_on_poll_k_stops_immediately() {
        for k in [1u32, 2, 7, 20] {
            let ctx = VirtualContext::new();
            let flag = CountingFlag::new(Some(k));

            let status = await_activation(&ctx, &flag, 20, 500).await;

            assert_eq!(status, ActivationStatus::Confirmed { attempts: k });
            assert_eq!(flag.reads(), k);
            assert_eq!(ctx.now(), Duration::from_millis(u64::from(k - 1) * 500));
        }
    }

    #[test]
    fn test_poller_state_machine_is_inert_after_resolution() {
        let flag = CountingFlag::new(Some(2));
        let mut poller = ActivationPoller::new(5, Duration::from_millis(10));

        assert_eq!(poller.poll(&flag), PollerState::Pending { attempts: 1 });
        assert_eq!(poller.status(), None);
        assert_eq!(poller.poll(&flag), PollerState::Confirmed { attempts: 2 });
        assert_eq!(poller.poll(&flag), PollerState::Confirmed { attempts: 2 });
        assert_eq!(flag.reads(), 2);
        assert_eq!(poller.status(), Some(ActivationStatus::Confirmed { attempts: 2 }));
    }

    #[test]
    fn test_zero_budget_starts_exhausted() {
        let flag = CountingFlag::new(Some(1));
        let mut poller = ActivationPoller::new(0, Duration::from_millis(10));
        assert!(poller.state().is_terminal());
        poller.poll(&flag);
        assert_eq!(flag.reads(), 0);
        assert_eq!(poller.status(), Some(ActivationStatus::NotConfirmed { attempts: 0 }));
    }

    #[tokio::test]
    async fn test_bootstrap_confirmed_relabels_once() {
        let collaborator = FakeCollaborator::full();
        let signage = RwLock::new(Signage::default());
        let bootstrap = UiBootstrap::new();
        let status = ActivationStatus::Confirmed { attempts: 3 };

        let report = bootstrap.complete(status, &collaborator, &signage).await.unwrap();
        assert!(report.guide_initialized && report.chat_initialized && report.relabeled);
        assert!(signage.read().unwrap().is_paid_tier());

        assert!(bootstrap.complete(status, &collaborator, &signage).await.is_none());
        assert_eq!(collaborator.guide_inits(), 1);
        assert_eq!(collaborator.chat_inits(), 1);
    }

    #[tokio::test]
    async fn test_bootstrap_exhausted_still_inits_but_keeps_free_labels() {
        let collaborator = FakeCollaborator::full();
        let signage = RwLock::new(Signage::default());
        let bootstrap = UiBootstrap::new();

        let report = bootstrap
            .complete(ActivationStatus::NotConfirmed { attempts: 20 }, &collaborator, &signage)
            .await
            .unwrap();

        assert!(report.guide_initialized && report.chat_initialized);
        assert!(!report.relabeled);
        assert!(!signage.read().unwrap().is_paid_tier());
    }

    #[tokio::test]
    async fn test_bootstrap_tolerates_missing_modules() {
        let collaborator = FakeCollaborator::bare();
        let signage = RwLock::new(Signage::default());
        let report = UiBootstrap::new()
            .complete(ActivationStatus::Confirmed { attempts: 1 }, &collaborator, &signage)
            .await
            .unwrap();
        assert_eq!(
            report,
            BootstrapReport {
                guide_initialized: false,
                chat_initialized: false,
                relabeled: true,
            }
        );
    }

    #[tokio::test]
    async fn test_bootstrap_survives_module_init_failure() {
        let collaborator = FakeCollaborator::full();
        collaborator.fail_chat_init();
        let signage = RwLock::new(Signage::default());
        let bootstrap = UiBootstrap::new();
        let status = ActivationStatus::Confirmed { attempts: 1 };

        let report = bootstrap.complete(status, &collaborator, &signage).await;
        assert_eq!(
            report,
            Some(BootstrapReport {
                guide_initialized: true,
                chat_initialized: false,
                relabeled: true,
            })
        );
        assert!(signage.read().unwrap().is_paid_tier());
        assert_eq!(collaborator.chat_inits(), 1);

        // A failed init is not retried
        assert!(bootstrap.complete(status, &collaborator, &signage).await.is_none());
        assert_eq!(collaborator.chat_inits(), 1);
    }

    #[tokio::test]
    async fn test_activation_wait_does_not_block_other_tasks() {
        let ctx = Arc::new(VirtualContext::new());
        let flag = Arc::new(CountingFlag::new(None));
        let ticks = Arc::new(AtomicU32::new(0));

        let waiter = {
            let (ctx, flag) = (ctx.clone(), flag.clone());
            tokio::spawn(async move { await_activation(ctx.as_ref(), flag.as_ref(), 5, 100).await })
        };
        let ticker = {
            let ticks = ticks.clone();
            tokio::spawn(async move {
                for _ in 0..10 {
                    ticks.fetch_add(1, Ordering::SeqCst);
                    tokio::task::yield_now().await;
                }
            })
        };

        let (status, _) = tokio::join!(waiter, ticker);
        assert_eq!(status.unwrap(), ActivationStatus::NotConfirmed { attempts: 5 });
        assert_eq!(ticks.load(Ordering::SeqCst), 10);
    }
}
