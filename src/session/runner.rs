//! Session Runner
//!
//! Drives a [`GameSession`] in real time. Each started session gets a ticker task that
//! recomputes the remaining time on a fixed interval and delivers the terminal outcome
//! through a one-shot channel. The ticker owns a cancellation token which is signalled on
//! [`GameRunner::reset`], on the next [`GameRunner::start`] and when the runner is dropped,
//! so a stale tick can never touch a session that has been reset or abandoned.

use std::{sync::Arc, time::Duration};

use jiff::Timestamp;
use tokio::{
    sync::{Mutex, oneshot},
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::session::{GameSession, SessionOutcome, SessionStatus, clock::Clock};

/// Default interval between clock ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug)]
struct Shared<S> {
    session: S,
    outcome_tx: Option<oneshot::Sender<SessionOutcome>>,
}

impl<S: GameSession> Shared<S> {
    /// Send the outcome if the session has ended and nobody has been told yet.
    ///
    /// Returns `true` once the session is no longer playing.
    fn settle(&mut self) -> bool {
        if let Some(outcome) = self.session.outcome() {
            if let Some(tx) = self.outcome_tx.take() {
                if tx.send(outcome.clone()).is_err() {
                    tracing::debug!(game = %outcome.game, "session outcome receiver dropped");
                }
            }
        }

        self.session.status() != SessionStatus::Playing
    }
}

/// Runs a game session against a clock.
#[derive(Debug)]
pub struct GameRunner<S, C> {
    shared: Arc<Mutex<Shared<S>>>,
    clock: Arc<C>,
    tick_interval: Duration,
    ticker: Option<DropGuard>,
}

impl<S, C> GameRunner<S, C>
where
    S: GameSession + Send + 'static,
    C: Clock,
{
    /// Wrap an idle session.
    pub fn new(session: S, clock: C) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                session,
                outcome_tx: None,
            })),
            clock: Arc::new(clock),
            tick_interval: DEFAULT_TICK_INTERVAL,
            ticker: None,
        }
    }

    /// Use a different tick interval (at least 1ms).
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(MIN_TICK_INTERVAL);
        self
    }

    /// Start the session and its ticker.
    ///
    /// Returns a receiver resolving to the terminal outcome, or `None` if the session was not
    /// idle. The receiver errors if the session is reset or the runner dropped first.
    pub async fn start(&mut self) -> Option<oneshot::Receiver<SessionOutcome>> {
        let mut shared = self.shared.lock().await;

        if !shared.session.start(self.clock.now()) {
            return None;
        }

        let (tx, rx) = oneshot::channel();
        shared.outcome_tx = Some(tx);
        drop(shared);

        self.ticker = None;

        let cancel = CancellationToken::new();

        tokio::spawn(tick_loop(
            Arc::clone(&self.shared),
            Arc::clone(&self.clock),
            self.tick_interval,
            cancel.clone(),
        ));

        self.ticker = Some(cancel.drop_guard());

        Some(rx)
    }

    /// Add points to the running session.
    pub async fn add_points(&self, points: u32) -> bool {
        self.update(|session, now| session.add_points(points, now)).await
    }

    /// Remove points from the running session.
    pub async fn subtract_points(&self, points: u32) -> bool {
        self.update(|session, now| session.subtract_points(points, now)).await
    }

    /// Mutate the session with the current time, e.g. to lose a life.
    ///
    /// The clock is advanced before `f` runs, so a change arriving after time ran out sees a
    /// finished session even if the ticker has not woken yet. If the change ends the session
    /// its outcome is delivered immediately.
    pub async fn update<R>(&self, f: impl FnOnce(&mut S, Timestamp) -> R) -> R {
        let mut shared = self.shared.lock().await;
        let now = self.clock.now();

        shared.session.tick(now);

        let result = f(&mut shared.session, now);

        shared.settle();

        result
    }

    /// Read the session.
    pub async fn inspect<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.shared.lock().await.session)
    }

    /// Stop the ticker and return the session to idle.
    ///
    /// Any pending outcome receiver resolves with an error.
    pub async fn reset(&mut self) {
        self.ticker = None;

        let mut shared = self.shared.lock().await;
        shared.outcome_tx = None;
        shared.session.reset();
    }
}

async fn tick_loop<S, C>(
    shared: Arc<Mutex<Shared<S>>>,
    clock: Arc<C>,
    period: Duration,
    cancel: CancellationToken,
) where
    S: GameSession,
    C: Clock,
{
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            _ = interval.tick() => {
                let mut shared = shared.lock().await;

                // Reset may have won the race for the lock.
                if cancel.is_cancelled() {
                    break;
                }

                shared.session.tick(clock.now());

                if shared.settle() {
                    break;
                }
            }
        }
    }

    tracing::trace!("session ticker stopped");
}
