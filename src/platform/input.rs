//! Keyboard and touch-joystick input
//!
//! Translates raw browser events into the normalized `TickInput` fields the
//! simulation reads once per tick.

use glam::Vec2;

use super::viewport::Viewport;
use crate::sim::KeyFlags;

/// Update arrow-key flags. Returns true if the key is one we track.
pub fn apply_key(keys: &mut KeyFlags, key: &str, down: bool) -> bool {
    let flag = match key {
        "ArrowLeft" => &mut keys.left,
        "ArrowRight" => &mut keys.right,
        "ArrowUp" => &mut keys.up,
        "ArrowDown" => &mut keys.down,
        _ => return false,
    };
    *flag = down;
    true
}

/// On-screen virtual joystick (bottom-right corner)
#[derive(Debug, Clone)]
pub struct Joystick {
    pub center: Vec2,
    pub radius: f32,
    pub knob: Vec2,
    pub knob_radius: f32,
    dragging: bool,
}

impl Joystick {
    pub fn new(viewport: &Viewport) -> Self {
        let mut joystick = Self {
            center: Vec2::ZERO,
            radius: 0.0,
            knob: Vec2::ZERO,
            knob_radius: 0.0,
            dragging: false,
        };
        joystick.layout(viewport);
        joystick
    }

    /// Re-derive geometry for a new canvas size. Recenters the knob.
    pub fn layout(&mut self, viewport: &Viewport) {
        let s = viewport.scale();
        self.center = Vec2::new(viewport.width - 150.0 * s, viewport.height - 150.0 * s);
        self.radius = 80.0 * s;
        self.knob_radius = 30.0 * s;
        self.knob = self.center;
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Touch began at `point` (canvas coords). Grabs the stick if inside the ring.
    pub fn press(&mut self, point: Vec2) -> bool {
        if point.distance(self.center) < self.radius {
            self.dragging = true;
        }
        self.dragging
    }

    /// Touch moved. The knob follows, clamped to the ring.
    pub fn drag(&mut self, point: Vec2) {
        if !self.dragging {
            return;
        }
        let offset = point - self.center;
        self.knob = if offset.length() > self.radius {
            self.center + offset.normalize_or_zero() * self.radius
        } else {
            point
        };
    }

    /// Touch ended. Knob snaps back to center.
    pub fn release(&mut self) {
        self.dragging = false;
        self.knob = self.center;
    }

    /// Stick deflection in [-1, 1] on each axis, zero when centered
    pub fn direction(&self) -> Vec2 {
        if self.radius <= 0.0 {
            return Vec2::ZERO;
        }
        (self.knob - self.center) / self.radius
    }
}
