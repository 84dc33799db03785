//! Game state and core simulation types
//!
//! Everything a run needs to be replayed deterministically lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;
use crate::platform::Viewport;
use crate::tuning::{BikeAspects, Tuning};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended by a crash
    GameOver,
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    /// Bike hit a car
    Obstacle,
    /// Police caught the bike
    Pursuer,
}

/// Things that happened during a tick, for audio and HUD.
/// Never read back by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    KickStarted,
    PursuerKicked { slot: usize },
    ObstaclePassed,
    /// Police rode its car off the bottom of the screen
    PursuerCarriedOff { slot: usize },
    PursuerAppeared { slot: usize },
    PursuerAttached { slot: usize },
    GameOver {
        cause: CrashCause,
        score: u64,
        new_best: bool,
    },
}

/// Bike sprite frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BikeVariant {
    Normal,
    Kicking1,
    Kicking2,
}

impl BikeVariant {
    pub fn aspect_ratio(self, aspects: &BikeAspects) -> f32 {
        match self {
            BikeVariant::Normal => aspects.normal,
            BikeVariant::Kicking1 => aspects.kicking1,
            BikeVariant::Kicking2 => aspects.kicking2,
        }
    }
}

/// Kick animation, counted in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KickPhase {
    #[default]
    Idle,
    /// Leg pulled back
    Windup { ticks_left: u32 },
    /// Leg extended
    Strike { ticks_left: u32 },
}

impl KickPhase {
    pub fn variant(self) -> BikeVariant {
        match self {
            KickPhase::Idle => BikeVariant::Normal,
            KickPhase::Windup { .. } => BikeVariant::Kicking1,
            KickPhase::Strike { .. } => BikeVariant::Kicking2,
        }
    }

    /// Advance one tick
    pub fn advance(self, frame_ticks: u32) -> Self {
        match self {
            KickPhase::Idle => KickPhase::Idle,
            KickPhase::Windup { ticks_left } if ticks_left > 1 => KickPhase::Windup {
                ticks_left: ticks_left - 1,
            },
            KickPhase::Windup { .. } => KickPhase::Strike {
                ticks_left: frame_ticks,
            },
            KickPhase::Strike { ticks_left } if ticks_left > 1 => KickPhase::Strike {
                ticks_left: ticks_left - 1,
            },
            KickPhase::Strike { .. } => KickPhase::Idle,
        }
    }
}

/// The player's bike
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bike {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    /// Pixels per tick along each axis
    pub speed: f32,
    pub kick: KickPhase,
    /// Ticks until another kick is accepted
    pub kick_cooldown: u32,
}

impl Bike {
    pub fn new(viewport: &Viewport, tuning: &Tuning) -> Self {
        let mut bike = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            width: 0.0,
            height: viewport.bike_height(),
            speed: tuning.bike_speed,
            kick: KickPhase::Idle,
            kick_cooldown: 0,
        };
        bike.refresh_width(&tuning.bike_aspects);
        bike.reset_position(viewport);
        bike
    }

    pub fn variant(&self) -> BikeVariant {
        self.kick.variant()
    }

    /// Width follows the current sprite frame
    pub fn refresh_width(&mut self, aspects: &BikeAspects) {
        self.width = self.height * self.variant().aspect_ratio(aspects);
    }

    /// Center-bottom spawn point
    pub fn reset_position(&mut self, viewport: &Viewport) {
        self.pos = Vec2::new(
            viewport.width / 2.0 - self.width / 2.0,
            viewport.height - BIKE_BOTTOM_MARGIN,
        );
        self.vel = Vec2::ZERO;
    }

    /// Horizontal draw offset that keeps wider kick frames centered on the
    /// rider instead of growing to the right
    pub fn draw_offset_x(&self, aspects: &BikeAspects) -> f32 {
        let normal_width = self.height * aspects.normal;
        (normal_width - self.width) / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.width, self.height)
    }
}

/// A car in the traffic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    /// Stable id, unique within a session
    pub id: u32,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Livery index in `0..CAR_VARIANTS`
    pub variant: u8,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.width, self.height)
    }
}

/// Police status
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PursuerStatus {
    /// Off the board, waiting for its score threshold
    Inactive,
    /// Chasing the bike
    Seeking,
    /// Riding a car, position locked to it
    Attached { obstacle_id: u32 },
    /// Knocked away, flying ballistically until off-screen
    Kicked { vel: Vec2 },
}

/// A police agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pursuer {
    pub slot: usize,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Pixels per tick while seeking
    pub speed: f32,
    pub status: PursuerStatus,
}

impl Pursuer {
    pub fn new(slot: usize, viewport: &Viewport, speed: f32) -> Self {
        let size = viewport.pursuer_size();
        Self {
            slot,
            pos: Vec2::new(viewport.width / 2.0 - size.x / 2.0, viewport.height),
            width: size.x,
            height: size.y,
            speed,
            status: PursuerStatus::Inactive,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status != PursuerStatus::Inactive
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.width, self.height)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG driving spawn placement and liveries
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation ticks since session start
    pub frame_count: u64,
    pub score: u64,
    /// Best score as of session start, raised at game over
    pub best_score: u64,
    /// Traffic speed (pixels per tick)
    pub obstacle_speed: f32,
    /// Ticks between car spawns
    pub spawn_interval: u32,
    /// Lane marking offset in `[0, LANE_PERIOD)`
    pub scroll_offset: f32,
    pub viewport: Viewport,
    pub tuning: Tuning,
    pub bike: Bike,
    /// Cars in spawn order (oldest first)
    pub obstacles: Vec<Obstacle>,
    /// Police, indexed by slot
    pub pursuers: Vec<Pursuer>,
    /// Events from the most recent ticks, drained by observers
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Obstacle size for this session
    obstacle_size: Vec2,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        let pursuers = (0..PURSUER_SLOTS)
            .map(|slot| Pursuer::new(slot, &viewport, tuning.pursuers[slot].base_speed))
            .collect();

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            frame_count: 0,
            score: 0,
            best_score: 0,
            obstacle_speed: tuning.initial_obstacle_speed,
            spawn_interval: tuning.initial_spawn_interval,
            scroll_offset: 0.0,
            bike: Bike::new(&viewport, &tuning),
            obstacle_size: viewport.obstacle_size(),
            viewport,
            tuning,
            obstacles: Vec::new(),
            pursuers,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn obstacle_size(&self) -> Vec2 {
        self.obstacle_size
    }

    pub fn obstacle(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    /// Place a car directly (tests, replays)
    pub fn push_obstacle(&mut self, pos: Vec2, variant: u8) -> u32 {
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle {
            id,
            pos,
            width: self.obstacle_size.x,
            height: self.obstacle_size.y,
            variant,
        });
        id
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn award(&mut self, points: u64) {
        self.score += points;
    }

    /// End the run. Only the first call has any effect.
    pub fn finish(&mut self, cause: CrashCause) {
        if self.is_over() {
            return;
        }
        self.phase = GamePhase::GameOver;
        let new_best = self.score > self.best_score;
        if new_best {
            self.best_score = self.score;
        }
        log::info!(
            "Game over ({:?}) at tick {}: score {}, best {}",
            cause,
            self.frame_count,
            self.score,
            self.best_score
        );
        self.events.push(GameEvent::GameOver {
            cause,
            score: self.score,
            new_best,
        });
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Canvas changed size: rescale the bike and police and put the bike
    /// back at center-bottom. Cars keep their session size.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.bike.height = viewport.bike_height();
        self.bike.refresh_width(&self.tuning.bike_aspects);
        self.bike.reset_position(&viewport);

        let size = viewport.pursuer_size();
        for pursuer in &mut self.pursuers {
            pursuer.width = size.x;
            pursuer.height = size.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(7, Viewport::default(), Tuning::default())
    }

    #[test]
    fn test_new_state_bike_center_bottom() {
        let s = state();
        let bike = &s.bike;
        assert!((bike.pos.x + bike.width / 2.0 - 300.0).abs() < 1e-4);
        assert_eq!(bike.pos.y, 700.0);
        assert_eq!(bike.variant(), BikeVariant::Normal);
        assert!((bike.width - 50.0).abs() < 1e-3);
        assert_eq!(s.pursuers.len(), PURSUER_SLOTS);
        assert!(s.pursuers.iter().all(|p| !p.is_active()));
    }

    #[test]
    fn test_kick_phase_sequence() {
        let mut phase = KickPhase::Windup { ticks_left: 2 };
        assert_eq!(phase.variant(), BikeVariant::Kicking1);
        phase = phase.advance(2);
        assert_eq!(phase, KickPhase::Windup { ticks_left: 1 });
        phase = phase.advance(2);
        assert_eq!(phase, KickPhase::Strike { ticks_left: 2 });
        assert_eq!(phase.variant(), BikeVariant::Kicking2);
        phase = phase.advance(2).advance(2);
        assert_eq!(phase, KickPhase::Idle);
        assert_eq!(phase.advance(2), KickPhase::Idle);
    }

    #[test]
    fn test_draw_offset_keeps_rider_centered() {
        let tuning = Tuning::default();
        let mut bike = Bike::new(&Viewport::default(), &tuning);
        assert_eq!(bike.draw_offset_x(&tuning.bike_aspects), 0.0);
        bike.kick = KickPhase::Strike { ticks_left: 1 };
        bike.refresh_width(&tuning.bike_aspects);
        let expected = (90.0 * tuning.bike_aspects.normal - 90.0 * tuning.bike_aspects.kicking2) / 2.0;
        assert!((bike.draw_offset_x(&tuning.bike_aspects) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_finish_only_once() {
        let mut s = state();
        s.best_score = 30;
        s.score = 40;
        s.finish(CrashCause::Obstacle);
        s.score = 90;
        s.finish(CrashCause::Pursuer);
        assert_eq!(s.best_score, 40);
        let events = s.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::GameOver {
                cause: CrashCause::Obstacle,
                score: 40,
                new_best: true
            }]
        );
    }

    #[test]
    fn test_resize_rescales_bike_and_police() {
        let mut s = state();
        s.resize(Viewport::new(300.0, 400.0));
        assert!((s.bike.height - 45.0).abs() < 1e-4);
        assert_eq!(s.bike.pos.y, 300.0);
        assert_eq!(s.pursuers[0].width, 25.0);
        // Cars keep the session size
        assert_eq!(s.obstacle_size(), Vec2::new(60.0, 120.0));
    }
}
