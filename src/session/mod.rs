//! Game Sessions
//!
//! A game session is one timed attempt at a mini-game. It tracks the time remaining against a
//! fixed duration and accumulates a score from explicit point changes; it knows nothing about
//! the gameplay producing them.
//!
//! ```text
//! idle ──start──▶ playing ──time up──▶ completed
//!   ▲                 │
//!   │                 └──out of lives──▶ gameover   (lives-based sessions)
//!   └──────────────reset────────────────────┘
//! ```
//!
//! Sessions are driven by explicit timestamps so they can be tested without a clock; see
//! [`runner::GameRunner`] for the cancelable ticker that drives them in real time.

use std::fmt;

use jiff::{SignedDuration, Timestamp};

use crate::games::GameType;

pub mod clock;
pub mod lives;
pub mod runner;
pub mod timed;

pub use clock::{Clock, SystemClock, TokioClock};
pub use lives::LivesSession;
pub use runner::GameRunner;
pub use timed::TimedSession;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// Created or reset, waiting for `start`.
    Idle,

    /// Clock running, points accepted.
    Playing,

    /// Time ran out.
    Completed,

    /// A lives-based session ran out of lives before time ran out.
    GameOver,
}

impl SessionStatus {
    /// Whether the session has reached an end state.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::GameOver)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Playing => "playing",
            SessionStatus::Completed => "completed",
            SessionStatus::GameOver => "gameover",
        })
    }
}

/// The final result of a session, produced exactly once on the terminal transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Game that was played
    pub game: GameType,

    /// Terminal status
    pub status: SessionStatus,

    /// Final score, possibly negative
    pub score: i64,

    /// When the session ended
    pub finished_at: Timestamp,
}

/// Clock and score bookkeeping shared by every session kind.
#[derive(Debug, Clone)]
pub struct SessionState {
    status: SessionStatus,
    duration: SignedDuration,
    started_at: Option<Timestamp>,
    remaining: SignedDuration,
    score: i64,
    outcome: Option<SessionOutcome>,
}

impl SessionState {
    /// Create idle bookkeeping for a session lasting `duration`.
    pub fn new(duration: SignedDuration) -> Self {
        let duration = duration.max(SignedDuration::ZERO);

        Self {
            status: SessionStatus::Idle,
            duration,
            started_at: None,
            remaining: duration,
            score: 0,
            outcome: None,
        }
    }

    fn begin(&mut self, now: Timestamp) {
        self.status = SessionStatus::Playing;
        self.started_at = Some(now);
        self.remaining = self.duration;
        self.score = 0;
        self.outcome = None;
    }

    fn clear(&mut self) {
        *self = Self::new(self.duration);
    }

    /// When time runs out, once started.
    fn deadline(&self) -> Option<Timestamp> {
        self.started_at
            .and_then(|started_at| started_at.checked_add(self.duration).ok())
    }

    /// Recompute the remaining time from the start timestamp, returning `true` once it hits
    /// zero. Deriving it from `now` each time keeps slow or skipped ticks from drifting.
    fn update_clock(&mut self, now: Timestamp) -> bool {
        let Some(started_at) = self.started_at else {
            return false;
        };

        let elapsed = now.duration_since(started_at);

        self.remaining = self
            .duration
            .checked_sub(elapsed)
            .unwrap_or(SignedDuration::ZERO)
            .clamp(SignedDuration::ZERO, self.duration);

        self.remaining.is_zero()
    }

    fn finish(
        &mut self,
        game: &GameType,
        status: SessionStatus,
        now: Timestamp,
    ) -> SessionOutcome {
        self.status = status;

        let outcome = SessionOutcome {
            game: game.clone(),
            status,
            score: self.score,
            finished_at: now,
        };

        tracing::info!(
            game = %game,
            status = ?status,
            score = self.score,
            "game session finished"
        );

        self.outcome = Some(outcome.clone());

        outcome
    }

    fn adjust_score(&mut self, game: &GameType, delta: i64) -> bool {
        if self.status != SessionStatus::Playing {
            tracing::debug!(
                game = %game,
                status = ?self.status,
                delta,
                "ignoring score change outside of play"
            );

            return false;
        }

        self.score = self.score.saturating_add(delta);

        true
    }
}

/// A single attempt at a mini-game.
///
/// Implementors supply their game and bookkeeping; the lifecycle is shared. Point changes
/// are only accepted while playing: once a session is terminal its score is final, so a late
/// input racing the timeout can never alter a result that has already been settled.
pub trait GameSession {
    /// Game being played.
    fn game(&self) -> &GameType;

    /// Shared bookkeeping.
    fn state(&self) -> &SessionState;

    /// Shared bookkeeping, mutably.
    fn state_mut(&mut self) -> &mut SessionState;

    /// Hook run after the shared bookkeeping has been reset.
    fn on_reset(&mut self) {}

    /// Start the clock. Only an idle session can start; returns `false` otherwise.
    fn start(&mut self, now: Timestamp) -> bool {
        if self.status() != SessionStatus::Idle {
            tracing::debug!(
                game = %self.game(),
                status = ?self.status(),
                "start ignored; session must be reset first"
            );

            return false;
        }

        self.state_mut().begin(now);

        true
    }

    /// Add points to the running score at `now`.
    ///
    /// The clock is advanced first, so points arriving after time ran out are rejected even
    /// if no tick has settled the session yet. Returns `false` if the session is not playing.
    fn add_points(&mut self, points: u32, now: Timestamp) -> bool {
        self.tick(now);

        let game = self.game().clone();

        self.state_mut().adjust_score(&game, i64::from(points))
    }

    /// Remove points from the running score at `now`. The score may go negative during play.
    fn subtract_points(&mut self, points: u32, now: Timestamp) -> bool {
        self.tick(now);

        let game = self.game().clone();

        self.state_mut().adjust_score(&game, -i64::from(points))
    }

    /// Advance the clock to `now`, returning the outcome if this tick ended the session.
    ///
    /// A late tick records the deadline, not `now`, as the finish time.
    fn tick(&mut self, now: Timestamp) -> Option<SessionOutcome> {
        if self.status() != SessionStatus::Playing {
            return None;
        }

        if !self.state_mut().update_clock(now) {
            return None;
        }

        let game = self.game().clone();
        let finished_at = self.state().deadline().map_or(now, |deadline| deadline.min(now));

        Some(
            self.state_mut()
                .finish(&game, SessionStatus::Completed, finished_at),
        )
    }

    /// Return to idle, clearing score and clock.
    fn reset(&mut self) {
        self.state_mut().clear();
        self.on_reset();
    }

    /// Current status.
    fn status(&self) -> SessionStatus {
        self.state().status
    }

    /// Current score.
    fn score(&self) -> i64 {
        self.state().score
    }

    /// Time left as of the last tick.
    fn remaining(&self) -> SignedDuration {
        self.state().remaining
    }

    /// Total length of the session.
    fn duration(&self) -> SignedDuration {
        self.state().duration
    }

    /// The terminal outcome, once reached.
    fn outcome(&self) -> Option<&SessionOutcome> {
        self.state().outcome.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(!SessionStatus::Idle.is_terminal());
        assert!(!SessionStatus::Playing.is_terminal());
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::GameOver.is_terminal());
    }

    #[test]
    fn negative_duration_is_treated_as_zero() {
        let state = SessionState::new(SignedDuration::from_secs(-5));

        assert_eq!(state.duration, SignedDuration::ZERO);
        assert_eq!(state.remaining, SignedDuration::ZERO);
    }

    #[test]
    fn deadline_follows_start() {
        let mut state = SessionState::new(SignedDuration::from_secs(30));

        assert_eq!(state.deadline(), None);

        state.begin(Timestamp::UNIX_EPOCH);

        assert_eq!(
            state.deadline(),
            Some(Timestamp::UNIX_EPOCH + SignedDuration::from_secs(30))
        );
    }
}
