//! Traffic spawning and difficulty ramp

use glam::Vec2;
use rand::Rng;

use super::state::GameState;
use crate::consts::CAR_VARIANTS;

/// Spawn a car above the screen when the spawn cadence hits.
/// Returns the new car's id.
pub fn spawn_obstacles(state: &mut GameState) -> Option<u32> {
    let interval = u64::from(state.spawn_interval.max(1));
    if state.frame_count % interval != 0 {
        return None;
    }

    let size = state.obstacle_size();
    let span = (state.viewport.width - size.x).max(0.0);
    let x = state.rng.random_range(0.0..=span);
    let variant = state.rng.random_range(0..CAR_VARIANTS);

    Some(state.push_obstacle(Vec2::new(x, -size.y), variant))
}

/// Speed traffic up and spawn more often on a fixed cadence.
/// Fires on tick 0 as well, giving every run a small opening bump.
pub fn ramp_difficulty(state: &mut GameState) -> bool {
    let period = state.tuning.ramp_period.max(1);
    if state.frame_count % period != 0 {
        return false;
    }

    let tuning = &state.tuning;
    state.obstacle_speed += tuning.ramp_speed_step;
    state.spawn_interval = state
        .spawn_interval
        .saturating_sub(tuning.ramp_interval_step)
        .max(tuning.min_spawn_interval);

    log::debug!(
        "Difficulty ramp at tick {}: speed {:.1}, spawn every {} ticks",
        state.frame_count,
        state.obstacle_speed,
        state.spawn_interval
    );
    true
}
