use rand::Rng;
use thiserror::Error;
use tracing::{debug, warn};

use crate::geometry::{Point, Rect, Segment};

/// Placement gives up after this many rejected candidates.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    #[error("no free spot for food after {attempts} attempts, the board is too full")]
    BoardFull { attempts: u32 },
}

/// Region food may be placed in.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FoodArea {
    pub width: f64,
    pub height: f64,
    /// Kept clear on every side; one segment width.
    pub margin: f64,
    /// Extra room kept clear at the bottom for the score bar.
    pub header_offset: f64,
}

impl FoodArea {
    fn x_range(&self) -> std::ops::Range<f64> {
        self.margin..self.width - self.margin
    }

    fn y_range(&self) -> std::ops::Range<f64> {
        self.margin..self.height - self.margin - self.header_offset
    }
}

/// Rejection-samples a food anchor whose square clears every body segment.
pub fn place<'a, R, I>(rng: &mut R, area: FoodArea, body: I) -> Result<Point, PlacementError>
where
    R: Rng,
    I: IntoIterator<Item = &'a Segment>,
    I::IntoIter: Clone,
{
    let body = body.into_iter();

    for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
        let candidate = Point::new(rng.gen_range(area.x_range()), rng.gen_range(area.y_range()));
        let square = Rect::square(candidate, area.margin);

        if !body.clone().any(|seg| seg.overlaps(&square)) {
            if attempt > 100 {
                warn!(attempt, "food placement needed many attempts");
            }
            debug!(x = candidate.x, y = candidate.y, attempt, "placed food");
            return Ok(candidate);
        }
    }

    Err(PlacementError::BoardFull { attempts: MAX_PLACEMENT_ATTEMPTS })
}
