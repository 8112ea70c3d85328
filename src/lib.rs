//! Flappy Pipes - a one-button arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (gravity, pipes, collisions, score)
//! - `session`: Session lifecycle (start, frame loop, spawn timer, restart)
//! - `renderer`: WebGPU rendering pipeline
//! - `config`: Data-driven game tuning

pub mod config;
pub mod renderer;
pub mod session;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use session::{FrameOutcome, FrameTicket, Session, TriggerOutcome};

/// Default tuning constants
pub mod consts {
    /// Downward acceleration (units/tick²)
    pub const GRAVITY: f32 = 0.5;
    /// Velocity set by a jump (negative is up)
    pub const JUMP_IMPULSE: f32 = -8.0;
    /// Horizontal pipe speed (units/tick)
    pub const PIPE_SPEED: f32 = 2.0;
    /// Vertical size of the passable gap
    pub const PIPE_GAP: f32 = 150.0;
    pub const PIPE_WIDTH: f32 = 60.0;
    /// Wall-clock interval between pipe spawns
    pub const PIPE_SPAWN_INTERVAL_MS: f64 = 2000.0;
    /// Minimum distance between the gap and the playfield edges
    pub const GAP_MARGIN: f32 = 50.0;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 320.0;
    pub const PLAYFIELD_HEIGHT: f32 = 480.0;

    /// Bird defaults
    pub const BIRD_WIDTH: f32 = 40.0;
    pub const BIRD_HEIGHT: f32 = 40.0;
    /// Visual rotation per unit of vertical velocity (radians)
    pub const BIRD_TILT_FACTOR: f32 = 0.1;
}
