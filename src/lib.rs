//! Moto Chase - A lane-dodging bike chase arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, spawning, pursuit, collisions)
//! - `session`: Start/stop/restart lifecycle around the simulation
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Procedural sound effects (Web Audio)
//! - `platform`: Input, viewport and storage shims
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod best_score;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use best_score::BestScore;
pub use session::{Session, SessionPhase};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second (one tick per display refresh)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Reference canvas the entity sizes are authored against
    pub const BASE_CANVAS_WIDTH: f32 = 600.0;
    pub const BASE_CANVAS_HEIGHT: f32 = 800.0;
    /// Windows wider than this get letterboxed to the reference aspect
    pub const RESPONSIVE_BREAKPOINT: f32 = 700.0;

    /// Hitbox forgiveness, applied on the facing side of each rectangle
    pub const COLLISION_INSET: f32 = 10.0;

    /// Lane marking pattern
    pub const LANE_DASH_LENGTH: f32 = 20.0;
    pub const LANE_GAP_LENGTH: f32 = 30.0;
    pub const LANE_PERIOD: f32 = LANE_DASH_LENGTH + LANE_GAP_LENGTH;
    /// Lane markings scroll this much faster than the traffic
    pub const LANE_SPEED_BONUS: f32 = 2.0;

    /// Bike spawns this far above the bottom edge (unscaled)
    pub const BIKE_BOTTOM_MARGIN: f32 = 100.0;

    /// Authored sprite sizes at the reference canvas
    pub const BIKE_HEIGHT: f32 = 90.0;
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const OBSTACLE_HEIGHT: f32 = 120.0;
    pub const PURSUER_WIDTH: f32 = 50.0;
    pub const PURSUER_HEIGHT: f32 = 90.0;

    /// Number of car liveries to pick from
    pub const CAR_VARIANTS: u8 = 3;
    /// Number of police slots
    pub const PURSUER_SLOTS: usize = 2;

    /// Police light blink period (wall clock, independent of ticks)
    pub const BLINK_INTERVAL_MS: f64 = 500.0;
}
