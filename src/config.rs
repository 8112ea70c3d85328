//! Game tuning
//!
//! Every physics constant can be overridden. Persisted in LocalStorage as JSON;
//! missing fields fall back to the defaults in [`crate::consts`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Why a configuration was rejected
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(String),
    #[error("{field} must be a finite positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("jump impulse must be negative (upward), got {0}")]
    JumpNotUpward(f32),
    #[error("gap of {gap} with margin {margin} does not fit a playfield {height} high")]
    GapDoesNotFit { gap: f32, margin: f32, height: f32 },
    #[error("bird of height {bird} does not fit a playfield {height} high")]
    BirdDoesNotFit { bird: f32, height: f32 },
}

/// Physics and layout constants for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub gravity: f32,
    pub jump_impulse: f32,
    pub pipe_speed: f32,
    pub pipe_gap: f32,
    pub pipe_width: f32,
    pub spawn_interval_ms: f64,
    pub gap_margin: f32,
    pub width: f32,
    pub height: f32,
    pub bird_width: f32,
    pub bird_height: f32,
    pub tilt_factor: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            pipe_speed: PIPE_SPEED,
            pipe_gap: PIPE_GAP,
            pipe_width: PIPE_WIDTH,
            spawn_interval_ms: PIPE_SPAWN_INTERVAL_MS,
            gap_margin: GAP_MARGIN,
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            bird_width: BIRD_WIDTH,
            bird_height: BIRD_HEIGHT,
            tilt_factor: BIRD_TILT_FACTOR,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("gravity", self.gravity as f64)?;
        positive("pipe_speed", self.pipe_speed as f64)?;
        positive("pipe_gap", self.pipe_gap as f64)?;
        positive("pipe_width", self.pipe_width as f64)?;
        positive("spawn_interval_ms", self.spawn_interval_ms)?;
        positive("width", self.width as f64)?;
        positive("height", self.height as f64)?;
        positive("bird_width", self.bird_width as f64)?;
        positive("bird_height", self.bird_height as f64)?;

        if !(self.jump_impulse.is_finite() && self.jump_impulse < 0.0) {
            return Err(ConfigError::JumpNotUpward(self.jump_impulse));
        }
        if !(self.gap_margin.is_finite() && self.gap_margin >= 0.0)
            || self.pipe_gap + 2.0 * self.gap_margin > self.height
        {
            return Err(ConfigError::GapDoesNotFit {
                gap: self.pipe_gap,
                margin: self.gap_margin,
                height: self.height,
            });
        }
        if self.bird_height >= self.height {
            return Err(ConfigError::BirdDoesNotFit {
                bird: self.bird_height,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Fixed horizontal position of the bird
    pub fn bird_x(&self) -> f32 {
        self.width / 4.0
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "flappy_pipes_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.bird_x(), 80.0);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "gravity": 0.25, "height": 600 }"#).unwrap();
        assert_eq!(config.gravity, 0.25);
        assert_eq!(config.height, 600.0);
        assert_eq!(config.jump_impulse, JUMP_IMPULSE);
        assert_eq!(config.pipe_gap, PIPE_GAP);
    }

    #[test]
    fn test_bad_json_is_rejected() {
        assert!(matches!(
            GameConfig::from_json("{ gravity: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_gap_must_fit() {
        let config = GameConfig {
            pipe_gap: 400.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GapDoesNotFit { .. })
        ));
    }

    #[test]
    fn test_jump_must_point_up() {
        let config = GameConfig {
            jump_impulse: 3.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::JumpNotUpward(3.0)));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = GameConfig {
            spawn_interval_ms: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "spawn_interval_ms",
                ..
            })
        ));
    }
}
