//! Game session lifecycle
//!
//! Wraps the simulation in `Idle -> Running -> Over` and owns the best-score
//! store. The host calls `tick` once per display refresh and stops scheduling
//! as soon as it returns false.

use crate::best_score::BestScore;
use crate::platform::{ScoreStore, Viewport};
use crate::sim::{GameEvent, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the player to press play
    Idle,
    /// Ticking
    Running,
    /// Crashed, waiting for restart
    Over,
}

/// A play session and its persistence
pub struct Session<S: ScoreStore> {
    phase: SessionPhase,
    state: GameState,
    best: BestScore,
    store: S,
    viewport: Viewport,
    tuning: Tuning,
}

impl<S: ScoreStore> Session<S> {
    pub fn new(store: S, viewport: Viewport, tuning: Tuning) -> Self {
        let best = BestScore::load(&store);
        let mut state = GameState::new(0, viewport, tuning.clone());
        state.best_score = best.value();
        Self {
            phase: SessionPhase::Idle,
            state,
            best,
            store,
            viewport,
            tuning,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn best_score(&self) -> u64 {
        self.best.value()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Reset everything and start ticking. Valid from any phase.
    pub fn start(&mut self, seed: u64) {
        self.best = BestScore::load(&self.store);
        self.state = GameState::new(seed, self.viewport, self.tuning.clone());
        self.state.best_score = self.best.value();
        self.phase = SessionPhase::Running;
        log::info!("Session started with seed {}", seed);
    }

    /// Restart after a game over (same reset path as `start`)
    pub fn restart(&mut self, seed: u64) {
        self.start(seed);
    }

    /// Run one simulation step.
    /// Returns true if the host should schedule another tick.
    pub fn tick(&mut self, input: &TickInput) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }

        tick(&mut self.state, input);

        if self.state.is_over() {
            let final_score = self.state.events.iter().find_map(|e| match e {
                GameEvent::GameOver { score, .. } => Some(*score),
                _ => None,
            });
            if let Some(score) = final_score {
                self.best.record(score, &mut self.store);
            }
            self.phase = SessionPhase::Over;
            log::info!(
                "Session over: score {}, best {}",
                self.state.score,
                self.best.value()
            );
            return false;
        }

        true
    }

    /// Canvas resized
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.state.resize(viewport);
    }

    /// Hand this tick's events to audio/HUD observers
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}
