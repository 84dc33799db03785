//! Canvas sizing and proportional entity sizes

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Logical canvas dimensions the simulation runs in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(BASE_CANVAS_WIDTH, BASE_CANVAS_HEIGHT)
    }
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Fit the canvas into a window.
    ///
    /// Narrow windows (phones) use the full window; anything wider than the
    /// breakpoint is letterboxed to the reference 3:4 aspect.
    pub fn fit(window_width: f32, window_height: f32) -> Self {
        let mut width = window_width;
        let mut height = window_height;

        if width > RESPONSIVE_BREAKPOINT && height > 0.0 {
            let aspect = BASE_CANVAS_WIDTH / BASE_CANVAS_HEIGHT;
            if width / height > aspect {
                width = height * aspect;
            } else {
                height = width / aspect;
            }
        }

        Self::new(width, height)
    }

    /// Scale factor relative to the reference canvas width
    pub fn scale(&self) -> f32 {
        self.width / BASE_CANVAS_WIDTH
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn bike_height(&self) -> f32 {
        BIKE_HEIGHT * self.scale()
    }

    pub fn obstacle_size(&self) -> Vec2 {
        Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT) * self.scale()
    }

    pub fn pursuer_size(&self) -> Vec2 {
        Vec2::new(PURSUER_WIDTH, PURSUER_HEIGHT) * self.scale()
    }
}
