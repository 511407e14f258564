//! Mini-game models. Pure state machines driven by the browser shell: a spawn
//! timer calls `spawn`, the frame loop calls `tick`, pointer events call
//! `grab` / `drag_to` / `release`.

pub mod repair;
pub mod rng;
pub mod saplings;

use crate::geometry::Point;

/// Longest frame step applied at once; a backgrounded tab must not teleport
/// items to the bottom when it wakes up.
pub const FALL_DT_CAP_MS: f64 = 100.0;

/// An item lifted out of play and following the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Held<T> {
    pub item: T,
    /// Top-left of the item, percent space.
    pub pos: Point,
    /// Last pointer position, percent space.
    pub pointer: Point,
    grab_dx: f64,
    grab_dy: f64,
}

impl<T> Held<T> {
    pub fn new(item: T, item_pos: Point, pointer: Point) -> Self {
        Self {
            item,
            pos: item_pos,
            pointer,
            grab_dx: pointer.x - item_pos.x,
            grab_dy: pointer.y - item_pos.y,
        }
    }

    /// Keep the grab offset so the item does not jump under the finger.
    pub fn follow(&mut self, pointer: Point) {
        self.pointer = pointer;
        self.pos = Point::new(pointer.x - self.grab_dx, pointer.y - self.grab_dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_keeps_grab_offset() {
        let mut h = Held::new((), Point::new(10.0, 10.0), Point::new(12.0, 13.0));
        h.follow(Point::new(50.0, 60.0));
        assert_eq!(h.pos, Point::new(48.0, 57.0));
        assert_eq!(h.pointer, Point::new(50.0, 60.0));
    }
}
