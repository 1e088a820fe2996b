//! Fixed-duration sessions

use jiff::SignedDuration;

use crate::{
    games::GameType,
    session::{GameSession, SessionState},
};

/// A session that always runs for its full duration.
#[derive(Debug, Clone)]
pub struct TimedSession {
    game: GameType,
    state: SessionState,
}

impl TimedSession {
    /// Create an idle session for `game` lasting `duration`.
    pub fn new(game: GameType, duration: SignedDuration) -> Self {
        Self {
            game,
            state: SessionState::new(duration),
        }
    }
}

impl GameSession for TimedSession {
    fn game(&self) -> &GameType {
        &self.game
    }

    fn state(&self) -> &SessionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use crate::session::SessionStatus;

    use super::*;

    fn at(millis: i64) -> Timestamp {
        Timestamp::UNIX_EPOCH + SignedDuration::from_millis(millis)
    }

    fn session() -> TimedSession {
        TimedSession::new(GameType::TapRush, SignedDuration::from_secs(30))
    }

    #[test]
    fn starts_idle_with_full_time() {
        let session = session();

        assert_eq!(session.status(), SessionStatus::Idle);
        assert_eq!(session.remaining(), SignedDuration::from_secs(30));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn points_are_ignored_before_start() {
        let mut session = session();

        assert!(!session.add_points(5, at(0)));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn score_may_go_negative_during_play() {
        let mut session = session();
        session.start(at(0));

        assert!(session.add_points(3, at(1_000)));
        assert!(session.subtract_points(5, at(2_000)));
        assert_eq!(session.score(), -2);
    }

    #[test]
    fn remaining_time_is_derived_from_start() {
        let mut session = session();
        session.start(at(0));

        assert_eq!(session.tick(at(12_300)), None);
        assert_eq!(session.remaining(), SignedDuration::from_millis(17_700));

        // A long gap between ticks does not drift the clock.
        assert_eq!(session.tick(at(29_900)), None);
        assert_eq!(session.remaining(), SignedDuration::from_millis(100));
    }

    #[test]
    fn completes_exactly_once() {
        let mut session = session();
        session.start(at(0));
        session.add_points(42, at(5_000));

        let outcome = session.tick(at(30_000));

        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.remaining(), SignedDuration::ZERO);
        assert_eq!(outcome.as_ref().map(|o| o.score), Some(42));
        assert_eq!(
            outcome.as_ref().map(|o| o.status),
            Some(SessionStatus::Completed)
        );
        assert_eq!(session.outcome(), outcome.as_ref());

        assert_eq!(session.tick(at(30_100)), None);
        assert_eq!(session.tick(at(60_000)), None);
    }

    #[test]
    fn points_after_completion_are_rejected() {
        let mut session = session();
        session.start(at(0));
        session.add_points(10, at(1_000));
        session.tick(at(31_000));

        assert!(!session.add_points(100, at(31_500)));
        assert!(!session.subtract_points(100, at(32_000)));
        assert_eq!(session.score(), 10);
    }

    #[test]
    fn points_after_deadline_are_rejected_before_any_tick() {
        let mut session = session();
        session.start(at(0));
        session.add_points(10, at(29_999));

        assert!(!session.add_points(100, at(35_000)));
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(
            session.outcome().map(|o| (o.score, o.finished_at)),
            Some((10, at(30_000)))
        );
    }

    #[test]
    fn late_tick_finishes_at_deadline() {
        let mut session = session();
        session.start(at(0));

        let outcome = session.tick(at(42_000));

        assert_eq!(outcome.map(|o| o.finished_at), Some(at(30_000)));
    }

    #[test]
    fn cannot_restart_without_reset() {
        let mut session = session();
        session.start(at(0));

        assert!(!session.start(at(1_000)));

        session.tick(at(30_000));

        assert!(!session.start(at(31_000)));
        assert_eq!(session.status(), SessionStatus::Completed);
    }

    #[test]
    fn reset_returns_to_idle_and_clears_score() {
        let mut session = session();
        session.start(at(0));
        session.add_points(7, at(1_000));
        session.tick(at(10_000));

        session.reset();

        assert_eq!(session.status(), SessionStatus::Idle);
        assert_eq!(session.score(), 0);
        assert_eq!(session.remaining(), SignedDuration::from_secs(30));
        assert_eq!(session.outcome(), None);

        // A tick arriving after reset has no effect.
        assert_eq!(session.tick(at(40_000)), None);
        assert_eq!(session.status(), SessionStatus::Idle);

        assert!(session.start(at(50_000)));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn clock_running_backwards_keeps_full_time() {
        let mut session = session();
        session.start(at(10_000));

        assert_eq!(session.tick(at(5_000)), None);
        assert_eq!(session.remaining(), SignedDuration::from_secs(30));
    }
}
