//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be replayed or rebalanced
//! from a JSON file without touching the simulation.

use serde::{Deserialize, Serialize};

use crate::consts::PURSUER_SLOTS;

/// Bike sprite aspect ratios (width / height) per animation frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BikeAspects {
    pub normal: f32,
    pub kicking1: f32,
    pub kicking2: f32,
}

impl Default for BikeAspects {
    fn default() -> Self {
        Self {
            normal: 50.0 / 90.0,
            kicking1: 0.8,
            kicking2: 0.95,
        }
    }
}

/// Per-slot police behavior
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PursuerTuning {
    /// Score at which this slot starts chasing
    pub activation_score: u64,
    /// Chase speed (pixels per tick)
    pub base_speed: f32,
    /// Score at which the chase speed is raised, if ever
    pub boost_score: Option<u64>,
    pub boost_speed: f32,
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Traffic ===
    pub initial_obstacle_speed: f32,
    /// Ticks between car spawns at session start
    pub initial_spawn_interval: u32,
    /// Difficulty ramps every this many ticks
    pub ramp_period: u64,
    pub ramp_speed_step: f32,
    pub ramp_interval_step: u32,
    pub min_spawn_interval: u32,

    // === Bike ===
    pub bike_speed: f32,
    pub bike_aspects: BikeAspects,

    // === Police ===
    pub pursuers: [PursuerTuning; PURSUER_SLOTS],

    // === Kick ===
    pub kick_range: f32,
    pub kick_speed: f32,
    /// Ticks each kick animation frame is shown (300ms at 60 Hz)
    pub kick_frame_ticks: u32,
    /// Ticks before another kick is accepted (1200ms at 60 Hz)
    pub kick_cooldown_ticks: u32,

    // === Scoring ===
    pub obstacle_pass_points: u64,
    pub carried_off_points: u64,
    pub kick_points: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_obstacle_speed: 3.0,
            initial_spawn_interval: 200,
            ramp_period: 1000,
            ramp_speed_step: 0.5,
            ramp_interval_step: 10,
            min_spawn_interval: 50,

            bike_speed: 5.0,
            bike_aspects: BikeAspects::default(),

            pursuers: [
                PursuerTuning {
                    activation_score: 20,
                    base_speed: 1.0,
                    boost_score: Some(50),
                    boost_speed: 2.0,
                },
                PursuerTuning {
                    activation_score: 100,
                    base_speed: 1.0,
                    boost_score: None,
                    boost_speed: 1.0,
                },
            ],

            kick_range: 100.0,
            kick_speed: 15.0,
            kick_frame_ticks: 18,
            kick_cooldown_ticks: 72,

            obstacle_pass_points: 10,
            carried_off_points: 25,
            kick_points: 50,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON, falling back to defaults on malformed input.
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Invalid tuning JSON ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
