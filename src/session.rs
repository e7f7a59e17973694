use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, GameConfig};
use crate::food::{self, FoodArea, PlacementError};
use crate::geometry::{Point, Rect, Segment};
use crate::snake::{Bounds, Direction, MoveOutcome, Snake};

const SPLASH_LINES: [&str; 4] = [
    "Snake!",
    "Steer with the arrow keys or WASD.",
    "Press p to pause, u to resume, q to quit.",
    "Press Space to start.",
];
const PAUSED_LINES: [&str; 2] = ["Game Paused", "Press u to resume or q to quit."];
const OVER_LINES: [&str; 2] = ["Game Over", "Press Space to restart or q to quit."];

/// Vertical spacing between overlay text lines, in playfield pixels.
const LINE_SPACING: f64 = 25.0;

#[derive(Error, Debug)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Placement(#[from] PlacementError),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Splash,
    Running,
    Paused,
    Over,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable<'a> {
    /// A line of text centred on `anchor`.
    Text { anchor: Point, text: &'static str },
    /// Divider along the bottom wall with the score underneath.
    ScoreLine { baseline: f64, score: u32 },
    Body { segments: &'a VecDeque<Segment>, heading: Direction },
    FoodMarker(Rect),
}

pub struct GameSession {
    config: GameConfig,
    speed: f64,
    phase: Phase,
    score: u32,
    snake: Snake,
    food: Point,
    rng: StdRng,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: GameConfig, mut rng: StdRng) -> Result<Self, GameError> {
        config.validate()?;
        let speed = config.speed()?;
        let snake = Snake::new(config.start_segment());
        let food = food::place(&mut rng, food_area(&config), snake.body())?;

        info!(speed, width = config.width, height = config.height, "new game session");
        Ok(GameSession { config, speed, phase: Phase::Splash, score: 0, snake, food, rng })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn food_rect(&self) -> Rect {
        Rect::square(self.food, self.config.pixel_width)
    }

    pub fn on_start_intent(&mut self) {
        if self.phase == Phase::Splash {
            info!("game started");
            self.phase = Phase::Running;
        }
    }

    pub fn on_restart_intent(&mut self) -> Result<(), PlacementError> {
        if self.phase != Phase::Over {
            return Ok(());
        }

        self.score = 0;
        self.snake.restart();
        self.food = food::place(&mut self.rng, food_area(&self.config), self.snake.body())?;
        self.phase = Phase::Running;
        info!("game restarted");
        Ok(())
    }

    pub fn on_pause_intent(&mut self) {
        if self.phase == Phase::Running {
            debug!("paused");
            self.phase = Phase::Paused;
        }
    }

    pub fn on_resume_intent(&mut self) {
        if self.phase == Phase::Paused {
            debug!("resumed");
            self.phase = Phase::Running;
        }
    }

    /// Advances the simulation by `delta_us` microseconds. Returns `None`
    /// when nothing moved (splash, paused or game over).
    pub fn tick(&mut self, delta_us: u64, turn: Option<Direction>, key_held: bool) -> Result<Option<MoveOutcome>, PlacementError> {
        if self.phase != Phase::Running {
            return Ok(None);
        }

        if let Some(dir) = turn {
            self.snake.set_direction(dir);
        }

        let bounds = Bounds { width: self.config.width, height: self.config.height };
        let food = self.food_rect();
        let outcome = self.snake.move_step(delta_us, self.speed, bounds, &food, key_held);

        match outcome {
            MoveOutcome::Died => {
                info!(score = self.score, length = self.snake.body().len(), "snake died");
                self.phase = Phase::Over;
            }
            MoveOutcome::AteFood => {
                self.score += 1;
                self.food = food::place(&mut self.rng, food_area(&self.config), self.snake.body())?;
                debug!(score = self.score, "ate food");
            }
            MoveOutcome::Continued => {}
        }

        Ok(Some(outcome))
    }

    /// Read-only view of the current frame.
    pub fn scene(&self) -> Vec<Drawable<'_>> {
        match self.phase {
            Phase::Splash => self.overlay(&SPLASH_LINES),
            Phase::Paused => self.overlay(&PAUSED_LINES),
            Phase::Over => self.overlay(&OVER_LINES),
            Phase::Running => vec![
                Drawable::Body { segments: self.snake.body(), heading: self.snake.get_direction() },
                Drawable::FoodMarker(self.food_rect()),
                Drawable::ScoreLine { baseline: self.config.height, score: self.score },
            ],
        }
    }

    fn overlay(&self, lines: &[&'static str]) -> Vec<Drawable<'_>> {
        let center_x = self.config.width / 2.0;
        let top = self.config.height / 2.0 - LINE_SPACING;

        lines
            .iter()
            .enumerate()
            .map(|(i, line)| Drawable::Text {
                anchor: Point::new(center_x, top + LINE_SPACING * i as f64),
                text: *line,
            })
            .collect()
    }
}

#[cfg(test)]
impl GameSession {
    pub fn is_alive(&self) -> bool {
        self.phase != Phase::Over
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn show_splash(&self) -> bool {
        self.phase == Phase::Splash
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Point {
        self.food
    }
}

fn food_area(config: &GameConfig) -> FoodArea {
    FoodArea {
        width: config.width,
        height: config.height,
        margin: config.pixel_width,
        header_offset: config.header_offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;

    fn session(speed_index: usize) -> GameSession {
        let config = GameConfig { speed_index, ..GameConfig::default() };
        GameSession::with_rng(config, StdRng::seed_from_u64(9)).unwrap()
    }

    fn running(speed_index: usize) -> GameSession {
        let mut s = session(speed_index);
        s.on_start_intent();
        s
    }

    /// Turns north then west and runs until the snake dies.
    fn crash(s: &mut GameSession) {
        s.food = Point::new(700.0, 100.0);
        s.tick(1_000, Some(North), false).unwrap();
        s.tick(1_000, Some(West), false).unwrap();
        while s.is_alive() {
            s.tick(50_000, None, false).unwrap();
        }
    }

    #[test]
    fn test_starts_on_splash() {
        let s = session(2);
        assert!(s.show_splash());
        assert!(s.is_alive());
        assert!(!s.is_paused());
        assert_eq!(s.score(), 0);
        assert_eq!(s.speed(), 300.0);
    }

    #[test]
    fn test_invalid_speed_is_fatal() {
        let config = GameConfig { speed_index: 9, ..GameConfig::default() };
        let err = GameSession::with_rng(config, StdRng::seed_from_u64(0)).err().unwrap();
        assert!(matches!(err, GameError::Config(ConfigError::SpeedOutOfRange(9))));
    }

    #[test]
    fn test_initial_food_clears_snake() {
        for seed in 0..50 {
            let s = GameSession::with_rng(GameConfig::default(), StdRng::seed_from_u64(seed)).unwrap();
            assert!(!s.snake().head().overlaps(&s.food_rect()));
        }
    }

    #[test]
    fn test_no_tick_on_splash() {
        let mut s = session(2);
        assert_eq!(s.tick(100_000, None, false).unwrap(), None);
        assert_eq!(s.snake().head().upper_left, Point::new(300.0, 300.0));
    }

    #[test]
    fn test_start_only_from_splash() {
        let mut s = running(2);
        s.on_pause_intent();
        s.on_start_intent();
        assert_eq!(s.phase(), Phase::Paused);
    }

    #[test]
    fn test_straight_eat() {
        let mut s = running(1);
        s.food = Point::new(340.0, 300.0);

        let outcome = s.tick(105_000, None, false).unwrap();

        assert_eq!(outcome, Some(MoveOutcome::AteFood));
        assert_eq!(s.score(), 1);
        assert_eq!(s.snake().body().len(), 2);
        assert_ne!(s.food(), Point::new(340.0, 300.0));
        for seg in s.snake().body() {
            assert!(!seg.overlaps(&s.food_rect()));
        }
    }

    #[test]
    fn test_wall_death() {
        let mut s = running(2);
        s.food = Point::new(700.0, 100.0);
        s.snake = Snake::new(Rect::square(Point::new(0.0, 300.0), 20.0));
        s.tick(1, Some(North), false).unwrap();

        let outcome = s.tick(1, Some(West), false).unwrap();

        assert_eq!(outcome, Some(MoveOutcome::Died));
        assert!(!s.is_alive());
        assert_eq!(s.tick(100_000, None, false).unwrap(), None);
    }

    #[test]
    fn test_restart_resets_score() {
        let mut s = running(2);
        for _ in 0..3 {
            let head = *s.snake().head();
            s.food = Point::new(head.lower_right.x - 1.0, head.upper_left.y);
            assert_eq!(s.tick(10_000, None, false).unwrap(), Some(MoveOutcome::AteFood));
        }
        assert_eq!(s.score(), 3);

        crash(&mut s);
        assert_eq!(s.phase(), Phase::Over);
        assert_eq!(s.score(), 3);

        s.on_restart_intent().unwrap();
        assert_eq!(s.score(), 0);
        assert!(s.is_alive());
        assert!(!s.is_paused());
        assert_eq!(s.snake().body().len(), 1);
        assert_eq!(s.snake().get_direction(), East);
    }

    #[test]
    fn test_restart_ignored_while_alive() {
        let mut s = running(2);
        s.tick(10_000, None, false).unwrap();
        let head = *s.snake().head();

        s.on_restart_intent().unwrap();
        assert_eq!(*s.snake().head(), head);
        assert_eq!(s.phase(), Phase::Running);
    }

    #[test]
    fn test_idempotent_pause() {
        let mut s = running(2);
        s.on_pause_intent();
        s.on_pause_intent();
        assert!(s.is_paused());

        s.on_resume_intent();
        assert_eq!(s.phase(), Phase::Running);
        s.on_resume_intent();
        assert_eq!(s.phase(), Phase::Running);
    }

    #[test]
    fn test_paused_tick_ignores_turns() {
        let mut s = running(2);
        s.on_pause_intent();

        assert_eq!(s.tick(100_000, Some(North), false).unwrap(), None);
        assert_eq!(s.snake().get_direction(), East);
        assert_eq!(s.snake().head().upper_left, Point::new(300.0, 300.0));
    }

    #[test]
    fn test_pause_not_allowed_when_over() {
        let mut s = running(2);
        crash(&mut s);
        s.on_pause_intent();
        assert_eq!(s.phase(), Phase::Over);
    }

    #[test]
    fn test_scene_per_phase() {
        let mut s = session(2);
        assert_eq!(s.scene().len(), SPLASH_LINES.len());

        s.on_start_intent();
        let scene = s.scene();
        assert!(matches!(scene[0], Drawable::Body { segments, heading: East } if segments.len() == 1));
        assert!(matches!(scene[1], Drawable::FoodMarker(_)));
        assert!(matches!(scene[2], Drawable::ScoreLine { score: 0, .. }));

        s.tick(1_000, Some(North), false).unwrap();
        assert!(matches!(s.scene()[0], Drawable::Body { heading: North, .. }));

        s.on_pause_intent();
        match &s.scene()[0] {
            Drawable::Text { text, .. } => assert_eq!(*text, "Game Paused"),
            other => panic!("unexpected drawable {:?}", other),
        }

        s.on_resume_intent();
        crash(&mut s);
        match &s.scene()[0] {
            Drawable::Text { text, .. } => assert_eq!(*text, "Game Over"),
            other => panic!("unexpected drawable {:?}", other),
        }
    }
}
