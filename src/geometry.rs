//! Pixel coordinates and inclusive bounding boxes

/// A pixel position, `x` is the column and `y` is the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Inclusive bounding box in pixel coordinates
///
/// A `Rect` always covers at least one pixel, so `min_x <= max_x` and
/// `min_y <= max_y` hold for every value of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    min_x: u32,
    max_x: u32,
    min_y: u32,
    max_y: u32,
}

impl Rect {
    /// Build from inclusive edges, `None` for a degenerate box
    pub fn new(min_x: u32, max_x: u32, min_y: u32, max_y: u32) -> Option<Self> {
        if min_x > max_x || min_y > max_y {
            return None;
        }
        Some(Self {
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }

    /// Build from a top-left corner and a size, `None` if either side is zero
    pub fn from_origin_and_size(x: u32, y: u32, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Self::new(x, x.checked_add(width - 1)?, y, y.checked_add(height - 1)?)
    }

    /// Single pixel box, the starting point of a bounding box that grows during traversal
    pub const fn from_point(point: Point) -> Self {
        Self {
            min_x: point.x,
            max_x: point.x,
            min_y: point.y,
            max_y: point.y,
        }
    }

    pub const fn min_x(&self) -> u32 {
        self.min_x
    }
    pub const fn max_x(&self) -> u32 {
        self.max_x
    }
    pub const fn min_y(&self) -> u32 {
        self.min_y
    }
    pub const fn max_y(&self) -> u32 {
        self.max_y
    }
    pub const fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }
    pub const fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }
    pub const fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Center pixel, rounded towards the top-left
    pub const fn centroid(&self) -> Point {
        Point::new(
            self.min_x + (self.max_x - self.min_x) / 2,
            self.min_y + (self.max_y - self.min_y) / 2,
        )
    }

    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Grow the box so that it covers the point
    pub fn include(&mut self, point: Point) {
        self.min_x = self.min_x.min(point.x);
        self.max_x = self.max_x.max(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_y = self.max_y.max(point.y);
    }

    /// Smallest box covering both boxes
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Same box moved by `dx` and `dy`, saturating at the coordinate limit
    pub fn translated(&self, dx: u32, dy: u32) -> Rect {
        Rect {
            min_x: self.min_x.saturating_add(dx),
            max_x: self.max_x.saturating_add(dx),
            min_y: self.min_y.saturating_add(dy),
            max_y: self.max_y.saturating_add(dy),
        }
    }

    /// Axis-aligned gap along x and y, zero on an axis where the boxes overlap or touch
    pub fn gap(&self, other: &Rect) -> (u32, u32) {
        let gap_x = other
            .min_x
            .saturating_sub(self.max_x)
            .max(self.min_x.saturating_sub(other.max_x));
        let gap_y = other
            .min_y
            .saturating_sub(self.max_y)
            .max(self.min_y.saturating_sub(other.max_y));
        (gap_x, gap_y)
    }

    /// Expand by `padding` on every side and clamp to an image of the given size
    ///
    /// Returns `None` if the box lies entirely outside the image.
    pub fn padded_within(&self, padding: u32, width: u32, height: u32) -> Option<Rect> {
        if width == 0 || height == 0 || self.min_x >= width || self.min_y >= height {
            return None;
        }
        Rect::new(
            self.min_x.saturating_sub(padding),
            self.max_x.saturating_add(padding).min(width - 1),
            self.min_y.saturating_sub(padding),
            self.max_y.saturating_add(padding).min(height - 1),
        )
    }

    /// Shrink by `margin` on every side, `None` if nothing is left
    pub fn shrunk(&self, margin: u32) -> Option<Rect> {
        Rect::new(
            self.min_x.checked_add(margin)?,
            self.max_x.checked_sub(margin)?,
            self.min_y.checked_add(margin)?,
            self.max_y.checked_sub(margin)?,
        )
    }

    /// Iterate over every pixel in row-major order
    pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let Rect {
            min_x,
            max_x,
            min_y,
            max_y,
        } = *self;
        (min_y..=max_y).flat_map(move |y| (min_x..=max_x).map(move |x| Point::new(x, y)))
    }
}
