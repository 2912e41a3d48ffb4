//! Core geometry types for the editor grid
//!
//! Two plain vector types: `Vec2` for export-space coordinates (the game
//! runtime works in floats) and `Vec2i` for pixel/grid coordinates (the
//! editor works on a fixed integer grid).

use serde::{Serialize, Deserialize};

/// 2D float vector (export space)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D integer vector (pixel/grid space)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vec2i {
    pub x: i32,
    pub y: i32,
}

impl Vec2i {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point, truncated to int
    pub fn dist(self, other: Vec2i) -> i32 {
        let dx = (other.x - self.x) as f32;
        let dy = (other.y - self.y) as f32;
        (dx * dx + dy * dy).sqrt() as i32
    }

    /// Snap to the top-left corner of the containing grid cell.
    /// Floor division, so negative coordinates snap toward -infinity.
    pub fn snap_to_grid(self, cell: i32) -> Vec2i {
        Vec2i::new(
            self.x.div_euclid(cell) * cell,
            self.y.div_euclid(cell) * cell,
        )
    }
}

impl From<Vec2i> for Vec2 {
    fn from(v: Vec2i) -> Self {
        Vec2::new(v.x as f32, v.y as f32)
    }
}

/// Sign of a value: -1, 0, or 1
pub fn sgn(v: i32) -> i32 {
    (v > 0) as i32 - (v < 0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dist() {
        assert_eq!(Vec2i::new(0, 0).dist(Vec2i::new(40, 0)), 40);
        assert_eq!(Vec2i::new(0, 0).dist(Vec2i::new(3, 4)), 5);
        assert_eq!(Vec2i::new(10, 10).dist(Vec2i::new(10, 10)), 0);
    }

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(Vec2i::new(47, 93).snap_to_grid(40), Vec2i::new(40, 80));
        assert_eq!(Vec2i::new(40, 0).snap_to_grid(40), Vec2i::new(40, 0));
        assert_eq!(Vec2i::new(-1, -41).snap_to_grid(40), Vec2i::new(-40, -80));
    }

    #[test]
    fn test_sgn() {
        assert_eq!(sgn(17), 1);
        assert_eq!(sgn(-3), -1);
        assert_eq!(sgn(0), 0);
    }
}
