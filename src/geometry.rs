//! Axis-aligned rectangles in playfield pixels.

/// A position on the playfield. Sub-pixel precision, since a frame moves the
/// snake by `speed * delta` rather than by whole cells.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// A rectangle given by its upper-left and lower-right corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub upper_left: Point,
    pub lower_right: Point,
}

/// One unit of the snake's body.
pub type Segment = Rect;

/// True iff the open intervals of the two rectangles overlap on both axes.
///
/// Touching edges do not count: `[0, 20]` and `[20, 40]` are disjoint.
pub fn overlaps(a_upper_left: Point, a_lower_right: Point, b_upper_left: Point, b_lower_right: Point) -> bool {
    a_upper_left.x < b_lower_right.x
        && b_upper_left.x < a_lower_right.x
        && a_upper_left.y < b_lower_right.y
        && b_upper_left.y < a_lower_right.y
}

impl Rect {
    pub fn new(upper_left: Point, lower_right: Point) -> Self {
        Rect { upper_left, lower_right }
    }

    /// The square of side `side` anchored at `upper_left`.
    pub fn square(upper_left: Point, side: f64) -> Self {
        Rect::new(upper_left, Point::new(upper_left.x + side, upper_left.y + side))
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Rect::new(
            Point::new(self.upper_left.x + dx, self.upper_left.y + dy),
            Point::new(self.lower_right.x + dx, self.lower_right.y + dy),
        )
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.lower_right.x, self.upper_left.y)
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.upper_left.x, self.lower_right.y)
    }

    /// Strict containment: a point on the border is outside.
    pub fn strictly_contains(&self, p: Point) -> bool {
        self.upper_left.x < p.x && p.x < self.lower_right.x && self.upper_left.y < p.y && p.y < self.lower_right.y
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps(self.upper_left, self.lower_right, other.upper_left, other.lower_right)
    }
}
