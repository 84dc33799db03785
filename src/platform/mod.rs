//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard flags, touch joystick)
//! - Canvas sizing and responsive layout
//! - Storage (LocalStorage on web)

pub mod input;
pub mod storage;
pub mod viewport;

pub use input::{Joystick, apply_key};
pub use storage::{BEST_SCORE_KEY, MemoryStore, ScoreStore};
pub use viewport::Viewport;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageStore;
