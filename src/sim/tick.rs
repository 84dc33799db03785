//! Per-frame simulation step
//!
//! Core game loop that advances the simulation deterministically, one tick
//! per display refresh.

use glam::Vec2;

use super::geometry::overlaps;
use super::pursuer::{activate_pursuers, apply_kick, release_riders, update_pursuers};
use super::spawn::{ramp_difficulty, spawn_obstacles};
use super::state::{CrashCause, GameEvent, GameState, KickPhase};
use crate::consts::{LANE_PERIOD, LANE_SPEED_BONUS};

/// Arrow-key state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyFlags {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Joystick deflection in [-1, 1]; takes priority over keys when non-zero
    pub joystick: Vec2,
    /// Arrow keys
    pub keys: KeyFlags,
    /// Kick button pressed since the last tick
    pub kick: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.is_over() {
        return;
    }

    advance_kick(state);
    if input.kick {
        try_kick(state);
    }

    // Lane markings
    state.scroll_offset += state.obstacle_speed + LANE_SPEED_BONUS;
    if state.scroll_offset >= LANE_PERIOD {
        state.scroll_offset = 0.0;
    }

    steer_bike(state, input);
    spawn_obstacles(state);

    if let Some(cause) = advance_obstacles(state) {
        state.finish(cause);
        return;
    }

    activate_pursuers(state);
    if update_pursuers(state).is_some() {
        state.finish(CrashCause::Pursuer);
        return;
    }

    ramp_difficulty(state);
    state.frame_count += 1;
}

/// Step the kick animation and cooldown
fn advance_kick(state: &mut GameState) {
    let bike = &mut state.bike;
    let aspects = &state.tuning.bike_aspects;

    let next = bike.kick.advance(state.tuning.kick_frame_ticks);
    if next != bike.kick {
        bike.kick = next;
        bike.refresh_width(aspects);
    }
    bike.kick_cooldown = bike.kick_cooldown.saturating_sub(1);
}

/// Start a kick unless still cooling down. Returns true if it fired.
pub fn try_kick(state: &mut GameState) -> bool {
    if state.is_over() || state.bike.kick_cooldown > 0 {
        return false;
    }

    let tuning = &state.tuning;
    state.bike.kick = KickPhase::Windup {
        ticks_left: tuning.kick_frame_ticks,
    };
    state.bike.kick_cooldown = tuning.kick_cooldown_ticks;
    state.bike.refresh_width(&tuning.bike_aspects);
    state.events.push(GameEvent::KickStarted);

    let hits = apply_kick(state);
    log::debug!("Kick at tick {} hit {} police", state.frame_count, hits);
    true
}

/// Joystick wins when deflected; otherwise each arrow key drives its axis at
/// full speed independently, so keyboard diagonals are faster than straight lines.
fn steer_bike(state: &mut GameState, input: &TickInput) {
    let bike = &mut state.bike;

    bike.vel = if input.joystick != Vec2::ZERO {
        input.joystick * bike.speed
    } else {
        let mut vel = Vec2::ZERO;
        if input.keys.left {
            vel.x = -bike.speed;
        }
        if input.keys.right {
            vel.x = bike.speed;
        }
        if input.keys.up {
            vel.y = -bike.speed;
        }
        if input.keys.down {
            vel.y = bike.speed;
        }
        vel
    };

    bike.pos += bike.vel;

    let max = Vec2::new(
        (state.viewport.width - bike.width).max(0.0),
        (state.viewport.height - bike.height).max(0.0),
    );
    bike.pos = bike.pos.clamp(Vec2::ZERO, max);
}

/// Move traffic down, retire cars that left the screen, and test the bike
/// against the rest. Newest cars are visited first.
fn advance_obstacles(state: &mut GameState) -> Option<CrashCause> {
    let bike_rect = state.bike.rect();
    let height = state.viewport.height;

    for i in (0..state.obstacles.len()).rev() {
        state.obstacles[i].pos.y += state.obstacle_speed;

        if state.obstacles[i].pos.y > height {
            let car = state.obstacles.remove(i);
            release_riders(state, car.id);
            state.award(state.tuning.obstacle_pass_points);
            state.events.push(GameEvent::ObstaclePassed);
            continue;
        }

        if overlaps(&bike_rect, &state.obstacles[i].rect()) {
            return Some(CrashCause::Obstacle);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Viewport;
    use crate::sim::state::{GamePhase, PursuerStatus};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn new_state(seed: u64) -> GameState {
        GameState::new(seed, Viewport::default(), Tuning::default())
    }

    /// State past tick 0 with spawning effectively disabled
    fn quiet_state() -> GameState {
        let mut s = new_state(5);
        s.spawn_interval = 1_000_000;
        s.frame_count = 1;
        s
    }

    #[test]
    fn test_bike_clamped_to_canvas() {
        let mut s = quiet_state();
        let input = TickInput {
            keys: KeyFlags {
                left: true,
                up: true,
                ..Default::default()
            },
            ..Default::default()
        };
        s.obstacles.clear();
        for _ in 0..400 {
            tick(&mut s, &input);
            s.obstacles.clear();
        }
        assert_eq!(s.bike.pos, Vec2::ZERO);
    }

    #[test]
    fn test_keyboard_diagonal_not_normalized() {
        let mut s = quiet_state();
        s.obstacles.clear();
        let start = s.bike.pos;
        let input = TickInput {
            keys: KeyFlags {
                left: true,
                up: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut s, &input);
        assert_eq!(s.bike.vel, Vec2::new(-5.0, -5.0));
        assert_eq!(s.bike.pos, start + Vec2::new(-5.0, -5.0));
    }

    #[test]
    fn test_joystick_overrides_keys() {
        let mut s = quiet_state();
        s.obstacles.clear();
        let input = TickInput {
            joystick: Vec2::new(0.5, 0.0),
            keys: KeyFlags {
                left: true,
                ..Default::default()
            },
            kick: false,
        };
        tick(&mut s, &input);
        assert_eq!(s.bike.vel, Vec2::new(2.5, 0.0));
    }

    #[test]
    fn test_scroll_offset_wraps() {
        let mut s = quiet_state();
        s.obstacles.clear();
        s.scroll_offset = 46.0;
        tick(&mut s, &TickInput::default());
        assert_eq!(s.scroll_offset, 0.0);
        tick(&mut s, &TickInput::default());
        assert_eq!(s.scroll_offset, 5.0);
    }

    #[test]
    fn test_car_passes_for_points() {
        let mut s = quiet_state();
        s.obstacles.clear();
        s.bike.pos = Vec2::new(0.0, 0.0);
        s.push_obstacle(Vec2::new(500.0, 799.0), 0);
        tick(&mut s, &TickInput::default());
        assert!(s.obstacles.is_empty());
        assert_eq!(s.score, 10);
        assert!(s.events.contains(&GameEvent::ObstaclePassed));
    }

    #[test]
    fn test_rider_carried_off_scores_once() {
        let mut s = quiet_state();
        s.obstacles.clear();
        s.bike.pos = Vec2::new(0.0, 0.0);
        let id = s.push_obstacle(Vec2::new(500.0, 799.0), 0);
        s.pursuers[0].status = PursuerStatus::Attached { obstacle_id: id };

        tick(&mut s, &TickInput::default());
        assert_eq!(s.pursuers[0].status, PursuerStatus::Seeking); // score 35 reactivates
        assert_eq!(s.score, 35);
        let carried = s
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::PursuerCarriedOff { slot: 0 })
            .count();
        assert_eq!(carried, 1);
    }

    #[test]
    fn test_removing_earlier_car_keeps_attachment() {
        let mut s = quiet_state();
        s.obstacles.clear();
        s.bike.pos = Vec2::new(0.0, 0.0);
        let _leaving = s.push_obstacle(Vec2::new(500.0, 799.0), 0);
        let staying = s.push_obstacle(Vec2::new(300.0, 300.0), 1);
        s.pursuers[1].status = PursuerStatus::Attached {
            obstacle_id: staying,
        };

        tick(&mut s, &TickInput::default());
        assert_eq!(s.obstacles.len(), 1);
        assert_eq!(
            s.pursuers[1].status,
            PursuerStatus::Attached {
                obstacle_id: staying
            }
        );
        assert_eq!(s.pursuers[1].pos, s.obstacles[0].pos);
        assert_eq!(s.score, 10);
    }

    #[test]
    fn test_crash_into_car_ends_game() {
        let mut s = quiet_state();
        s.obstacles.clear();
        s.best_score = 5;
        s.score = 10;
        let bike_pos = s.bike.pos;
        s.push_obstacle(bike_pos - Vec2::new(0.0, 50.0), 0);

        tick(&mut s, &TickInput::default());
        assert_eq!(s.phase, GamePhase::GameOver);
        assert_eq!(s.best_score, 10);

        // Further ticks are inert
        let frame = s.frame_count;
        tick(&mut s, &TickInput::default());
        assert_eq!(s.frame_count, frame);
        let overs = s
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_caught_by_police_ends_game() {
        let mut s = quiet_state();
        s.obstacles.clear();
        s.score = 20;
        s.pursuers[0].status = PursuerStatus::Seeking;
        s.pursuers[0].pos = s.bike.pos + Vec2::new(3.0, 3.0);
        tick(&mut s, &TickInput::default());
        assert!(s.is_over());
        assert!(s.events.contains(&GameEvent::GameOver {
            cause: CrashCause::Pursuer,
            score: 20,
            new_best: true,
        }));
    }

    #[test]
    fn test_kick_through_tick() {
        let mut s = quiet_state();
        s.obstacles.clear();
        s.pursuers[0].status = PursuerStatus::Seeking;
        s.pursuers[0].pos = s.bike.pos + Vec2::new(0.0, -60.0);
        s.score = 20;

        let kick = TickInput {
            kick: true,
            ..Default::default()
        };
        tick(&mut s, &kick);
        assert!(matches!(s.pursuers[0].status, PursuerStatus::Kicked { .. }));
        assert_eq!(s.score, 70);
        assert_eq!(s.bike.variant(), crate::sim::BikeVariant::Kicking1);
        let expected = s.bike.height * s.tuning.bike_aspects.kicking1;
        assert!((s.bike.width - expected).abs() < 1e-4);
    }

    #[test]
    fn test_kick_animation_and_cooldown_timing() {
        use crate::sim::BikeVariant;

        let mut s = quiet_state();
        let kick = TickInput {
            kick: true,
            ..Default::default()
        };
        let idle = TickInput::default();
        let frame_ticks = s.tuning.kick_frame_ticks;
        let cooldown = s.tuning.kick_cooldown_ticks;

        tick(&mut s, &kick);
        s.obstacles.clear();
        let mut variants = vec![s.bike.variant()];
        for _ in 1..(frame_ticks * 2 + 1) {
            tick(&mut s, &idle);
            s.obstacles.clear();
            variants.push(s.bike.variant());
        }
        let windups = variants.iter().filter(|v| **v == BikeVariant::Kicking1).count();
        let strikes = variants.iter().filter(|v| **v == BikeVariant::Kicking2).count();
        assert_eq!(windups as u32, frame_ticks);
        assert_eq!(strikes as u32, frame_ticks);
        assert_eq!(*variants.last().unwrap(), BikeVariant::Normal);

        // Re-kicks are refused until the cooldown has run out
        let mut s = quiet_state();
        tick(&mut s, &kick);
        let mut kicks = 0;
        for _ in 1..cooldown {
            s.obstacles.clear();
            tick(&mut s, &kick);
            kicks += s
                .drain_events()
                .iter()
                .filter(|e| **e == GameEvent::KickStarted)
                .count();
        }
        assert_eq!(kicks, 1); // only the first tick's event
        s.obstacles.clear();
        tick(&mut s, &kick);
        assert!(s.events.contains(&GameEvent::KickStarted));
    }

    #[test]
    fn test_difficulty_ramp_after_1000_ticks() {
        let mut s = new_state(5);
        s.spawn_interval = 1_000_000;
        s.bike.pos = Vec2::new(0.0, 0.0);
        tick(&mut s, &TickInput::default());
        s.obstacles.clear();
        // Frame 0 ramps once
        assert_eq!(s.obstacle_speed, 3.5);
        assert_eq!(s.spawn_interval, 1_000_000 - 10);

        for _ in 0..1000 {
            s.obstacles.clear();
            tick(&mut s, &TickInput::default());
        }
        assert_eq!(s.frame_count, 1001);
        assert_eq!(s.obstacle_speed, 4.0);
        assert_eq!(s.spawn_interval, 1_000_000 - 20);
    }

    #[test]
    fn test_score_20_activates_slot_0_once() {
        let mut s = quiet_state();
        s.obstacles.clear();
        s.bike.pos = Vec2::new(0.0, 0.0);
        s.score = 20;
        tick(&mut s, &TickInput::default());
        assert_eq!(s.pursuers[0].status, PursuerStatus::Seeking);
        let spawn_pos = s.pursuers[0].pos;

        for _ in 0..5 {
            s.obstacles.clear();
            tick(&mut s, &TickInput::default());
        }
        let appeared = s
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::PursuerAppeared { slot: 0 })
            .count();
        assert_eq!(appeared, 1);
        assert!(s.pursuers[0].pos.y < spawn_pos.y);
        assert!(!s.pursuers[1].is_active());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = new_state(99999);
        let mut state2 = new_state(99999);

        let inputs = [
            TickInput {
                joystick: Vec2::new(0.3, -0.2),
                ..Default::default()
            },
            TickInput {
                kick: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1.frame_count, state2.frame_count);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.obstacles.len(), state2.obstacles.len());
        for (a, b) in state1.obstacles.iter().zip(&state2.obstacles) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.variant, b.variant);
        }
        assert_eq!(state1.bike.pos, state2.bike.pos);
    }

    proptest! {
        #[test]
        fn prop_bike_stays_on_canvas(
            seed in 0u64..1000,
            moves in proptest::collection::vec((-1.0f32..1.0, -1.0f32..1.0, any::<u8>()), 1..200),
        ) {
            let mut s = new_state(seed);
            for (jx, jy, bits) in moves {
                let input = TickInput {
                    joystick: if bits & 1 == 0 { Vec2::new(jx, jy) } else { Vec2::ZERO },
                    keys: KeyFlags {
                        left: bits & 2 != 0,
                        right: bits & 4 != 0,
                        up: bits & 8 != 0,
                        down: bits & 16 != 0,
                    },
                    kick: bits & 32 != 0,
                };
                tick(&mut s, &input);
                let b = &s.bike;
                prop_assert!(b.pos.x >= 0.0 && b.pos.x <= s.viewport.width - b.width + 1e-3);
                prop_assert!(b.pos.y >= 0.0 && b.pos.y <= s.viewport.height - b.height + 1e-3);
            }
        }
    }
}
