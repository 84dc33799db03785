//! Axis-aligned rectangle collision
//!
//! Hitboxes are deliberately smaller than the sprites: each rectangle is
//! shrunk by `COLLISION_INSET` on the side facing the other one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::COLLISION_INSET;

/// Axis-aligned rectangle, top-left origin, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, w: f32, h: f32) -> Self {
        Self::new(pos.x, pos.y, w, h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// True once the rectangle is entirely outside `[0, width] x [0, height]`
    pub fn is_outside(&self, width: f32, height: f32) -> bool {
        self.x < -self.w || self.x > width || self.y < -self.h || self.y > height
    }
}

/// Inset overlap test
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x + COLLISION_INSET < b.x + b.w
        && a.x + a.w > b.x + COLLISION_INSET
        && a.y + COLLISION_INSET < b.y + b.h
        && a.y + a.h > b.y + COLLISION_INSET
}

/// Unit direction and distance from `from` to `to`.
/// `None` when the points coincide (no direction to normalize).
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Option<(Vec2, f32)> {
    let delta = to - from;
    let distance = delta.length();
    if distance > 0.0 {
        Some((delta / distance, distance))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlapping_rects() {
        let a = Rect::new(0.0, 0.0, 50.0, 90.0);
        let b = Rect::new(20.0, 30.0, 60.0, 120.0);
        assert!(overlaps(&a, &b));
    }

    #[test]
    fn test_touching_within_inset_is_not_a_hit() {
        // Sprites overlap by 8px horizontally, less than the inset
        let a = Rect::new(0.0, 0.0, 50.0, 90.0);
        let b = Rect::new(42.0, 0.0, 60.0, 120.0);
        assert!(!overlaps(&a, &b));
        // 12px of overlap is enough
        let c = Rect::new(38.0, 0.0, 60.0, 120.0);
        assert!(overlaps(&a, &c));
    }

    #[test]
    fn test_vertical_inset() {
        let a = Rect::new(0.0, 0.0, 50.0, 90.0);
        let below = Rect::new(0.0, 85.0, 50.0, 90.0);
        assert!(!overlaps(&a, &below));
        let deeper = Rect::new(0.0, 75.0, 50.0, 90.0);
        assert!(overlaps(&a, &deeper));
    }

    #[test]
    fn test_is_outside() {
        assert!(!Rect::new(-10.0, 10.0, 20.0, 20.0).is_outside(100.0, 100.0));
        assert!(Rect::new(-21.0, 10.0, 20.0, 20.0).is_outside(100.0, 100.0));
        assert!(Rect::new(101.0, 10.0, 20.0, 20.0).is_outside(100.0, 100.0));
        assert!(Rect::new(0.0, -21.0, 20.0, 20.0).is_outside(100.0, 100.0));
        assert!(Rect::new(0.0, 100.5, 20.0, 20.0).is_outside(100.0, 100.0));
    }

    #[test]
    fn test_direction_to_zero_distance() {
        assert!(direction_to(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0)).is_none());
        let (dir, dist) = direction_to(Vec2::ZERO, Vec2::new(3.0, 4.0)).unwrap();
        assert!((dist - 5.0).abs() < 1e-6);
        assert!((dir - Vec2::new(0.6, 0.8)).length() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            aw in 1.0f32..200.0, ah in 1.0f32..200.0,
            bw in 1.0f32..200.0, bh in 1.0f32..200.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }
    }
}
