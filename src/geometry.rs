//! Percent-space geometry for play areas.
//!
//! Every play area is a 100 x 100 box regardless of its size on screen;
//! pointer positions are converted into this space before hit testing.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// Items are drawn as roughly 10% wide glyphs anchored at their top-left.
pub const ITEM_HALF_EXTENT: f64 = 5.0;

/// Center of an item anchored at `top_left`.
pub fn item_center(top_left: Point) -> Point {
    top_left.offset(ITEM_HALF_EXTENT, ITEM_HALF_EXTENT)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Strictly inside: a point on the border does not count.
    pub fn contains(&self, p: Point) -> bool {
        p.x > self.x && p.x < self.x + self.width && p.y > self.y && p.y < self.y + self.height
    }

    /// Inside or on the border.
    pub fn contains_inclusive(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Index of the first rectangle strictly containing `p`.
pub fn first_hit<'a, I>(rects: I, p: Point) -> Option<usize>
where
    I: IntoIterator<Item = &'a Rect>,
{
    rects.into_iter().position(|r| r.contains(p))
}

/// Convert a client-space pointer position into the 0..100 space of an area
/// whose bounding box is (`left`, `top`, `width`, `height`) in client pixels.
pub fn to_percent(client_x: f64, client_y: f64, left: f64, top: f64, width: f64, height: f64) -> Point {
    let px = if width > 0.0 { (client_x - left) / width * 100.0 } else { 0.0 };
    let py = if height > 0.0 { (client_y - top) / height * 100.0 } else { 0.0 };
    Point::new(px, py)
}
