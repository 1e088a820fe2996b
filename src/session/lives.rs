//! Lives-based sessions

use jiff::{SignedDuration, Timestamp};

use crate::{
    games::GameType,
    session::{GameSession, SessionOutcome, SessionState, SessionStatus},
};

/// A session that also ends early, in `gameover`, once the player loses their last life.
#[derive(Debug, Clone)]
pub struct LivesSession {
    game: GameType,
    state: SessionState,
    lives: u32,
    starting_lives: u32,
}

impl LivesSession {
    /// Create an idle session for `game` lasting `duration` with `lives` lives (at least one).
    pub fn new(game: GameType, duration: SignedDuration, lives: u32) -> Self {
        let lives = lives.max(1);

        Self {
            game,
            state: SessionState::new(duration),
            lives,
            starting_lives: lives,
        }
    }

    /// Lives left.
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Lose a life at `now`, returning the outcome if this ended the session.
    ///
    /// Ignored unless the session is playing. If time already ran out the session completes
    /// with its lives intact instead.
    pub fn lose_life(&mut self, now: Timestamp) -> Option<SessionOutcome> {
        if self.status() != SessionStatus::Playing {
            tracing::debug!(game = %self.game, status = ?self.status(), "ignoring lost life");

            return None;
        }

        if let Some(outcome) = self.tick(now) {
            tracing::debug!(game = %self.game, "life lost after time ran out");

            return Some(outcome);
        }

        self.lives = self.lives.saturating_sub(1);

        if self.lives > 0 {
            return None;
        }

        Some(self.state.finish(&self.game, SessionStatus::GameOver, now))
    }
}

impl GameSession for LivesSession {
    fn game(&self) -> &GameType {
        &self.game
    }

    fn state(&self) -> &SessionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    fn on_reset(&mut self) {
        self.lives = self.starting_lives;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> Timestamp {
        Timestamp::UNIX_EPOCH + SignedDuration::from_secs(secs)
    }

    fn session() -> LivesSession {
        LivesSession::new(GameType::DodgeTheFees, SignedDuration::from_secs(45), 3)
    }

    #[test]
    fn runs_out_of_lives_into_gameover() {
        let mut session = session();
        session.start(at(0));
        session.add_points(12, at(1));

        assert_eq!(session.lose_life(at(5)), None);
        assert_eq!(session.lose_life(at(6)), None);

        let outcome = session.lose_life(at(7));

        assert_eq!(session.lives(), 0);
        assert_eq!(session.status(), SessionStatus::GameOver);
        assert_eq!(
            outcome,
            Some(SessionOutcome {
                game: GameType::DodgeTheFees,
                status: SessionStatus::GameOver,
                score: 12,
                finished_at: at(7),
            })
        );
    }

    #[test]
    fn gameover_is_terminal() {
        let mut session =
            LivesSession::new(GameType::DodgeTheFees, SignedDuration::from_secs(45), 1);
        session.start(at(0));
        session.lose_life(at(1));

        assert_eq!(session.tick(at(45)), None);
        assert_eq!(session.lose_life(at(46)), None);
        assert!(!session.add_points(1, at(47)));
        assert_eq!(session.status(), SessionStatus::GameOver);
    }

    #[test]
    fn completes_normally_with_lives_left() {
        let mut session = session();
        session.start(at(0));
        session.lose_life(at(10));

        let outcome = session.tick(at(45));

        assert_eq!(outcome.map(|o| o.status), Some(SessionStatus::Completed));
        assert_eq!(session.lives(), 2);
    }

    #[test]
    fn life_lost_after_time_ran_out_completes() {
        let mut session =
            LivesSession::new(GameType::DodgeTheFees, SignedDuration::from_secs(45), 1);
        session.start(at(0));
        session.add_points(8, at(30));

        let outcome = session.lose_life(at(60));

        assert_eq!(session.lives(), 1);
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(
            outcome,
            Some(SessionOutcome {
                game: GameType::DodgeTheFees,
                status: SessionStatus::Completed,
                score: 8,
                finished_at: at(45),
            })
        );
    }

    #[test]
    fn lives_are_ignored_before_start() {
        let mut session = session();

        assert_eq!(session.lose_life(at(0)), None);
        assert_eq!(session.lives(), 3);
    }

    #[test]
    fn reset_restores_lives() {
        let mut session = session();
        session.start(at(0));
        session.lose_life(at(1));
        session.lose_life(at(2));

        session.reset();

        assert_eq!(session.lives(), 3);
        assert_eq!(session.status(), SessionStatus::Idle);
    }

    #[test]
    fn zero_lives_is_raised_to_one() {
        let session =
            LivesSession::new(GameType::DodgeTheFees, SignedDuration::from_secs(45), 0);

        assert_eq!(session.lives(), 1);
    }
}
