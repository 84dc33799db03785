//! Idle-mode autopilot
//!
//! Derives a `TickInput` from the current state: sidestep the nearest car in
//! the bike's column and kick whenever police close in. Used by the headless
//! native runner and handy for soak-testing the simulation.

use super::state::{GameState, PursuerStatus};
use super::tick::{KeyFlags, TickInput};

/// How far above the bike a car counts as a threat
const LOOKAHEAD: f32 = 300.0;
/// Extra horizontal clearance when judging whether a car is in our column
const SIDE_MARGIN: f32 = 10.0;

/// Pick this tick's input
pub fn autopilot_input(state: &GameState) -> TickInput {
    let bike = state.bike.rect();
    let bike_center = bike.center();

    let threat = state
        .obstacles
        .iter()
        .map(|o| o.rect())
        .filter(|r| {
            r.x < bike.x + bike.w + SIDE_MARGIN
                && r.x + r.w > bike.x - SIDE_MARGIN
                && r.y + r.h > bike.y - LOOKAHEAD
                && r.y < bike.y + bike.h
        })
        .max_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal));

    let mut keys = KeyFlags::default();
    if let Some(car) = threat {
        let room_left = car.x;
        let room_right = state.viewport.width - (car.x + car.w);
        if room_left >= room_right {
            keys.left = true;
        } else {
            keys.right = true;
        }
        // Hug the wall side when already pinned against it
        if keys.left && bike.x <= 0.0 && car.center().x <= bike_center.x {
            keys = KeyFlags {
                right: true,
                ..Default::default()
            };
        } else if keys.right
            && bike.x + bike.w >= state.viewport.width
            && car.center().x >= bike_center.x
        {
            keys = KeyFlags {
                left: true,
                ..Default::default()
            };
        }
    }

    let range = state.tuning.kick_range;
    let kick = state.bike.kick_cooldown == 0
        && state.pursuers.iter().any(|p| {
            matches!(p.status, PursuerStatus::Seeking) && p.pos.distance(state.bike.pos) < range
        });

    TickInput {
        keys,
        kick,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Viewport;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn state() -> GameState {
        GameState::new(2, Viewport::default(), Tuning::default())
    }

    #[test]
    fn test_clear_road_holds_still() {
        let s = state();
        let input = autopilot_input(&s);
        assert_eq!(input.keys, KeyFlags::default());
        assert!(!input.kick);
    }

    #[test]
    fn test_sidesteps_car_overhead() {
        let mut s = state();
        // Car slightly right of the bike: more room on the left
        let x = s.bike.pos.x + 10.0;
        s.push_obstacle(Vec2::new(x, s.bike.pos.y - 200.0), 0);
        assert!(autopilot_input(&s).keys.left);

        // Car left of center: more room on the right
        s.obstacles.clear();
        s.bike.pos.x = 100.0;
        s.push_obstacle(Vec2::new(90.0, s.bike.pos.y - 200.0), 0);
        assert!(autopilot_input(&s).keys.right);
    }

    #[test]
    fn test_ignores_cars_in_other_columns() {
        let mut s = state();
        s.push_obstacle(Vec2::new(0.0, s.bike.pos.y - 100.0), 0);
        assert_eq!(autopilot_input(&s).keys, KeyFlags::default());
    }

    #[test]
    fn test_kicks_police_in_range_when_ready() {
        let mut s = state();
        s.pursuers[0].status = PursuerStatus::Seeking;
        s.pursuers[0].pos = s.bike.pos + Vec2::new(30.0, 40.0);
        assert!(autopilot_input(&s).kick);

        s.bike.kick_cooldown = 10;
        assert!(!autopilot_input(&s).kick);
    }
}
