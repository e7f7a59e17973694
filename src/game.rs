use std::{thread::sleep, time::{Duration, Instant}};

use anyhow::{Context, Result};
use tracing::info;

use crate::input::{Flow, InputState};
use crate::session::GameSession;
use crate::term::TermManager;

pub const DEFAULT_FPS: u32 = 30;

/// Owns the terminal and paces the session one frame at a time.
pub struct SnakeGame {
    term: TermManager,
    session: GameSession,
    frame_interval: Duration,
}

impl SnakeGame {
    pub fn new(session: GameSession, fps: u32) -> Result<Self> {
        let term = TermManager::new().context("could not read the terminal size")?;
        let frame_interval = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
        Ok(SnakeGame { term, session, frame_interval })
    }

    /// Runs until the player quits. The terminal is restored on every exit path.
    pub fn play(&mut self) -> Result<()> {
        self.term.setup().context("could not set up the terminal")?;
        let res = self.run_loop();
        let restored = self.term.restore().context("could not restore the terminal");
        res.and(restored)
    }

    fn run_loop(&mut self) -> Result<()> {
        let mut input = InputState::new(self.term.reports_releases());
        let mut last_update = Instant::now();

        loop {
            for intent in self.term.read_intents()? {
                if input.apply(intent, &mut self.session)? == Flow::Quit {
                    info!(score = self.session.score(), phase = ?self.session.phase(), "quit");
                    return Ok(());
                }
            }

            let now = Instant::now();
            let delta_us = now.duration_since(last_update).as_micros() as u64;
            last_update = now;

            self.session.tick(delta_us, input.take_turn(), input.key_held())?;
            input.end_frame();

            let scene = self.session.scene();
            self.term.render(&scene, self.session.config())?;

            // Sleep out the rest of the frame
            sleep(self.frame_interval.saturating_sub(now.elapsed()));
        }
    }
}
