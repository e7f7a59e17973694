use tracing::error;

use crate::food::PlacementError;
use crate::session::GameSession;
use crate::snake::Direction;

/// A decoded key press or release.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Intent {
    Start,
    Restart,
    Quit,
    Pause,
    Resume,
    DirectionPressed(Direction),
    DirectionReleased(Direction),
}

/// Whether the driver should keep running after an intent.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Direction keys currently held, plus the turn waiting for the next tick.
pub struct InputState {
    held: [bool; 4],
    pending_turn: Option<Direction>,
    /// Without release events a press only counts as held for its own frame.
    releases_reported: bool,
}

impl InputState {
    pub fn new(releases_reported: bool) -> Self {
        InputState { held: [false; 4], pending_turn: None, releases_reported }
    }

    pub fn apply(&mut self, intent: Intent, session: &mut GameSession) -> Result<Flow, PlacementError> {
        match intent {
            Intent::Quit => return Ok(Flow::Quit),
            Intent::Start => session.on_start_intent(),
            Intent::Restart => session.on_restart_intent().map_err(|err| {
                error!(%err, "could not place food on restart");
                err
            })?,
            Intent::Pause => session.on_pause_intent(),
            Intent::Resume => session.on_resume_intent(),
            Intent::DirectionPressed(dir) => {
                self.held[slot(dir)] = true;
                self.pending_turn = Some(dir);
            }
            Intent::DirectionReleased(dir) => self.held[slot(dir)] = false,
        }

        Ok(Flow::Continue)
    }

    pub fn take_turn(&mut self) -> Option<Direction> {
        self.pending_turn.take()
    }

    pub fn key_held(&self) -> bool {
        self.held.iter().any(|&h| h)
    }

    pub fn end_frame(&mut self) {
        if !self.releases_reported {
            self.held = [false; 4];
        }
    }
}

fn slot(dir: Direction) -> usize {
    match dir {
        Direction::North => 0,
        Direction::East => 1,
        Direction::South => 2,
        Direction::West => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::session::Phase;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session() -> GameSession {
        GameSession::with_rng(GameConfig::default(), StdRng::seed_from_u64(5)).unwrap()
    }

    #[test]
    fn test_held_from_press_release_pairs() {
        let mut s = session();
        let mut input = InputState::new(true);

        input.apply(Intent::DirectionPressed(Direction::North), &mut s).unwrap();
        input.apply(Intent::DirectionPressed(Direction::West), &mut s).unwrap();
        assert!(input.key_held());

        input.apply(Intent::DirectionReleased(Direction::North), &mut s).unwrap();
        input.end_frame();
        assert!(input.key_held());

        input.apply(Intent::DirectionReleased(Direction::West), &mut s).unwrap();
        assert!(!input.key_held());
    }

    #[test]
    fn test_held_for_one_frame_without_releases() {
        let mut s = session();
        let mut input = InputState::new(false);

        input.apply(Intent::DirectionPressed(Direction::South), &mut s).unwrap();
        assert!(input.key_held());
        input.end_frame();
        assert!(!input.key_held());
    }

    #[test]
    fn test_latest_turn_wins() {
        let mut s = session();
        let mut input = InputState::new(true);

        input.apply(Intent::DirectionPressed(Direction::North), &mut s).unwrap();
        input.apply(Intent::DirectionPressed(Direction::West), &mut s).unwrap();
        assert_eq!(input.take_turn(), Some(Direction::West));
        assert_eq!(input.take_turn(), None);
    }

    #[test]
    fn test_dispatches_session_intents() {
        let mut s = session();
        let mut input = InputState::new(true);

        assert_eq!(input.apply(Intent::Start, &mut s).unwrap(), Flow::Continue);
        assert_eq!(s.phase(), Phase::Running);
        input.apply(Intent::Pause, &mut s).unwrap();
        assert_eq!(s.phase(), Phase::Paused);
        input.apply(Intent::Resume, &mut s).unwrap();
        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(input.apply(Intent::Quit, &mut s).unwrap(), Flow::Quit);
    }
}
