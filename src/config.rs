use thiserror::Error;

use crate::geometry::{Point, Rect};

/// Base speeds, in units of `SPEED_SCALE` pixels per second.
pub const SPEED_TABLE: [f64; 5] = [2.0, 4.0, 6.0, 8.0, 10.0];
pub const SPEED_SCALE: f64 = 50.0;
pub const DEFAULT_SPEED_INDEX: usize = 2;

pub const DEFAULT_WIDTH: f64 = 800.0;
pub const DEFAULT_HEIGHT: f64 = 750.0;
pub const DEFAULT_PIXEL_WIDTH: f64 = 20.0;
pub const DEFAULT_HEADER_OFFSET: f64 = 40.0;

/// Upper-left corner of the snake's first segment.
pub const START_CORNER: Point = Point { x: 300.0, y: 300.0 };

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("speed selector {0} is out of range (expected 0..={max})", max = SPEED_TABLE.len() - 1)]
    SpeedOutOfRange(usize),

    #[error("invalid playfield: {0}")]
    Playfield(String),
}

/// Startup parameters. All lengths are playfield pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub width: f64,
    pub height: f64,
    pub pixel_width: f64,
    /// Height of the score bar. Food is kept this far clear of the bottom wall.
    pub header_offset: f64,
    pub speed_index: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            pixel_width: DEFAULT_PIXEL_WIDTH,
            header_offset: DEFAULT_HEADER_OFFSET,
            speed_index: DEFAULT_SPEED_INDEX,
        }
    }
}

impl GameConfig {
    /// Snake speed in pixels per second.
    pub fn speed(&self) -> Result<f64, ConfigError> {
        SPEED_TABLE
            .get(self.speed_index)
            .map(|base| base * SPEED_SCALE)
            .ok_or(ConfigError::SpeedOutOfRange(self.speed_index))
    }

    pub fn start_segment(&self) -> Rect {
        Rect::square(START_CORNER, self.pixel_width)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.speed()?;

        let sizes = [self.width, self.height, self.pixel_width, self.header_offset];
        if sizes.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Playfield(format!(
                "sizes must be finite, got {}x{} with segment width {} and header offset {}",
                self.width, self.height, self.pixel_width, self.header_offset
            )));
        }

        if !(self.width > 0.0 && self.height > 0.0 && self.pixel_width > 0.0) {
            return Err(ConfigError::Playfield(format!(
                "dimensions must be positive, got {}x{} with segment width {}",
                self.width, self.height, self.pixel_width
            )));
        }

        if self.header_offset < 0.0 {
            return Err(ConfigError::Playfield(format!("negative header offset {}", self.header_offset)));
        }

        // Food is sampled from [margin, bound - margin), which must not be empty.
        if self.width - 2.0 * self.pixel_width <= 0.0 || self.height - 2.0 * self.pixel_width - self.header_offset <= 0.0 {
            return Err(ConfigError::Playfield(format!(
                "{}x{} leaves no room for food with segment width {} and header offset {}",
                self.width, self.height, self.pixel_width, self.header_offset
            )));
        }

        let start = self.start_segment();
        if start.lower_right.x > self.width || start.lower_right.y > self.height {
            return Err(ConfigError::Playfield(format!(
                "starting segment at ({}, {}) does not fit in {}x{}",
                START_CORNER.x, START_CORNER.y, self.width, self.height
            )));
        }

        Ok(())
    }
}
