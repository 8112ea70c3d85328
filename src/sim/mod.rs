//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock reads
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Aabb, bird_hits_pipe, out_of_bounds};
pub use state::{Bird, GameEvent, GamePhase, GameState, Pipe};
pub use tick::{gap_range, jump, spawn_pipe, start, tick};
