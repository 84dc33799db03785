//! Police state machine
//!
//! Each slot cycles `Inactive -> Seeking -> (Attached | Kicked) -> Inactive`.
//! Slots are processed in order, cars in spawn order.

use glam::Vec2;
use rand::Rng;

use super::geometry::{direction_to, overlaps};
use super::state::{GameEvent, GameState, PursuerStatus};

/// Bring police onto the board once the score reaches each slot's threshold,
/// and apply per-slot speed boosts.
pub fn activate_pursuers(state: &mut GameState) {
    let GameState {
        pursuers,
        tuning,
        viewport,
        rng,
        events,
        score,
        ..
    } = state;

    for pursuer in pursuers.iter_mut() {
        let slot_tuning = &tuning.pursuers[pursuer.slot];

        if *score >= slot_tuning.activation_score && !pursuer.is_active() {
            let span = (viewport.width - pursuer.width).max(0.0);
            pursuer.pos = Vec2::new(rng.random_range(0.0..=span), viewport.height);
            pursuer.status = PursuerStatus::Seeking;
            events.push(GameEvent::PursuerAppeared { slot: pursuer.slot });
            log::debug!("Police {} appeared at score {}", pursuer.slot, score);
        }

        if slot_tuning.boost_score.is_some_and(|s| *score >= s) {
            pursuer.speed = slot_tuning.boost_speed;
        }
    }
}

/// Advance every police agent one tick.
/// Returns the slot that caught the bike, if any; later slots are not run.
pub fn update_pursuers(state: &mut GameState) -> Option<usize> {
    let GameState {
        pursuers,
        obstacles,
        bike,
        viewport,
        events,
        ..
    } = state;

    for pursuer in pursuers.iter_mut() {
        match pursuer.status {
            PursuerStatus::Inactive => {}

            PursuerStatus::Kicked { vel } => {
                pursuer.pos += vel;
                if pursuer.rect().is_outside(viewport.width, viewport.height) {
                    pursuer.status = PursuerStatus::Inactive;
                    log::debug!("Police {} left the screen", pursuer.slot);
                }
            }

            PursuerStatus::Attached { obstacle_id } => {
                match obstacles.iter().find(|o| o.id == obstacle_id) {
                    Some(car) => pursuer.pos = car.pos,
                    None => {
                        // Car removal normally releases its rider first
                        log::warn!("Police {} lost car {}", pursuer.slot, obstacle_id);
                        pursuer.status = PursuerStatus::Inactive;
                    }
                }
            }

            PursuerStatus::Seeking => {
                if let Some((dir, _)) = direction_to(pursuer.pos, bike.pos) {
                    pursuer.pos += dir * pursuer.speed;
                }

                let rect = pursuer.rect();
                if let Some(car) = obstacles.iter().find(|o| overlaps(&rect, &o.rect())) {
                    pursuer.status = PursuerStatus::Attached {
                        obstacle_id: car.id,
                    };
                    pursuer.pos = car.pos;
                    events.push(GameEvent::PursuerAttached { slot: pursuer.slot });
                    log::debug!("Police {} crashed onto car {}", pursuer.slot, car.id);
                } else if overlaps(&bike.rect(), &rect) {
                    return Some(pursuer.slot);
                }
            }
        }
    }

    None
}

/// A car left the screen: any police riding it goes off-duty for points.
pub fn release_riders(state: &mut GameState, obstacle_id: u32) {
    let points = state.tuning.carried_off_points;
    for pursuer in state.pursuers.iter_mut() {
        if pursuer.status == (PursuerStatus::Attached { obstacle_id }) {
            pursuer.status = PursuerStatus::Inactive;
            state.score += points;
            state
                .events
                .push(GameEvent::PursuerCarriedOff { slot: pursuer.slot });
            log::debug!("Police {} carried off on car {}", pursuer.slot, obstacle_id);
        }
    }
}

/// Kick every active police agent within range of the bike.
/// Returns how many were hit.
pub fn apply_kick(state: &mut GameState) -> u32 {
    let GameState {
        pursuers,
        bike,
        tuning,
        events,
        score,
        ..
    } = state;

    let mut hits = 0;
    for pursuer in pursuers.iter_mut().filter(|p| p.is_active()) {
        let away = pursuer.pos - bike.pos;
        let distance = away.length();
        if distance >= tuning.kick_range {
            continue;
        }

        // Dead-center kicks send the officer up the road
        let dir = if distance > 0.0 {
            away / distance
        } else {
            Vec2::NEG_Y
        };
        pursuer.status = PursuerStatus::Kicked {
            vel: dir * tuning.kick_speed,
        };
        *score += tuning.kick_points;
        events.push(GameEvent::PursuerKicked { slot: pursuer.slot });
        hits += 1;
    }

    hits
}
