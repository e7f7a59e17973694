use std::collections::VecDeque;

use crate::geometry::{overlaps, Point, Rect, Segment};
use Direction::*;
use MoveOutcome::*;

/// Microseconds per second; `speed` is in pixels per second.
const MICROS_PER_SECOND: f64 = 1_000_000.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (North, South) | (South, North) | (East, West) | (West, East)
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Continued,
    AteFood,
    Died,
}

/// Width and height of the walled playfield.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

pub struct Snake {
    /// Head at the front, tail at the back.
    body: VecDeque<Segment>,
    direction: Direction,
    start: Segment,
}

impl Snake {
    pub fn new(start: Segment) -> Self {
        let mut snake = Snake { body: VecDeque::new(), direction: East, start };
        snake.restart();
        snake
    }

    pub fn body(&self) -> &VecDeque<Segment> {
        &self.body
    }

    pub fn head(&self) -> &Segment {
        self.body.front().expect("snake body is never empty")
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, new_direction: Direction) {
        if !self.direction.is_opposite(new_direction) {
            self.direction = new_direction;
        }
    }

    pub fn restart(&mut self) {
        self.body.clear();
        self.body.push_front(self.start);
        self.direction = East;
    }

    /// Advances the head by `speed * delta_us` pixels along the current direction.
    ///
    /// Only the two corners of the new head that lead in the direction of
    /// travel are tested. While a direction key is held the self-collision
    /// test is skipped, so the frame in which a turn lands cannot kill on the
    /// neck. The new head is always pushed; the tail is kept only on eating.
    pub fn move_step(&mut self, delta_us: u64, speed: f64, bounds: Bounds, food: &Rect, key_held: bool) -> MoveOutcome {
        let distance = speed * delta_us as f64 / MICROS_PER_SECOND;

        let (dx, dy) = match self.direction {
            North => (0.0, -distance),
            East => (distance, 0.0),
            South => (0.0, distance),
            West => (-distance, 0.0),
        };
        let new_head = self.head().translate(dx, dy);
        let (corner_a, corner_b) = self.leading_corners(&new_head);

        let hit_wall = new_head.upper_left.x < 0.0
            || new_head.upper_left.y < 0.0
            || new_head.lower_right.x > bounds.width
            || new_head.lower_right.y > bounds.height;

        let hit_self = !key_held
            && self.body.iter().any(|seg| seg.strictly_contains(corner_a) || seg.strictly_contains(corner_b));

        let outcome = if hit_wall || hit_self {
            Died
        } else if overlaps(corner_a, corner_b, food.upper_left, food.lower_right) {
            // The leading edge counts when it lies flush along the food's side.
            AteFood
        } else {
            Continued
        };

        self.body.push_front(new_head);
        if outcome != AteFood {
            self.body.pop_back();
        }

        outcome
    }

    /// The two corners facing the direction of travel, ordered so they
    /// span a (degenerate) rectangle from upper-left to lower-right.
    fn leading_corners(&self, head: &Segment) -> (Point, Point) {
        let (ul, lr) = (head.upper_left, head.lower_right);

        match self.direction {
            North => (ul, head.top_right()),
            East => (head.top_right(), lr),
            South => (head.bottom_left(), lr),
            West => (ul, head.bottom_left()),
        }
    }
}
