//! Game state and core simulation types

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::config::GameConfig;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first trigger
    Ready,
    /// Active gameplay
    Playing,
    /// Run ended (terminal)
    GameOver,
}

/// Things the presentation layer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    PipeSpawned,
    /// Score went up; carries the new total
    Scored { score: u32 },
    /// Session ended; carries the final score
    GameOver { score: u32 },
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Left edge, fixed after construction
    pub x: f32,
    /// Top edge (y grows downward)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Vertical velocity (units/tick, positive is down)
    pub velocity: f32,
}

impl Bird {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            x: config.bird_x(),
            y: config.height / 2.0,
            width: config.bird_width,
            height: config.bird_height,
            velocity: 0.0,
        }
    }

    /// Bounding box
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    /// Render rotation in radians (nose up while rising)
    pub fn tilt(&self, factor: f32) -> f32 {
        self.velocity * factor
    }
}

/// A pipe pair with a passable gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Top of the gap
    pub gap_top: f32,
    /// Set once the bird has cleared this pipe
    pub passed: bool,
}

impl Pipe {
    /// Trailing (right) edge
    #[inline]
    pub fn right(&self, width: f32) -> f32 {
        self.x + width
    }

    /// Bottom of the gap
    #[inline]
    pub fn gap_bottom(&self, gap: f32) -> f32 {
        self.gap_top + gap
    }
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Tuning this session runs with
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub bird: Bird,
    /// Active pipes in spawn order
    pub pipes: Vec<Pipe>,
    /// Gap placement source
    pub(crate) rng: Pcg32,
    /// Events since the last drain
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            bird: Bird::new(&config),
            config,
            seed,
            phase: GamePhase::Ready,
            score: 0,
            time_ticks: 0,
            pipes: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
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

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Enter the terminal phase. Only the first call has any effect.
    pub(crate) fn end(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        log::info!("Game over with score {}", self.score);
        self.emit(GameEvent::GameOver { score: self.score });
    }
}
