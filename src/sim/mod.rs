//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (cars by spawn order, police by slot)
//! - No rendering or audio dependencies

pub mod autopilot;
pub mod geometry;
pub mod pursuer;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use geometry::{Rect, direction_to, overlaps};
pub use pursuer::{activate_pursuers, apply_kick, release_riders, update_pursuers};
pub use spawn::{ramp_difficulty, spawn_obstacles};
pub use state::{
    Bike, BikeVariant, CrashCause, GameEvent, GamePhase, GameState, KickPhase, Obstacle, Pursuer,
    PursuerStatus,
};
pub use tick::{KeyFlags, TickInput, tick, try_kick};
