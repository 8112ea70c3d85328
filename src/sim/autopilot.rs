//! Demo player
//!
//! Aims the bird at the gap of the next uncleared pipe. Flaps whenever the
//! bird would otherwise sink past the target line on the next tick.

use super::state::GameState;

/// Clearance kept above the bottom of the target gap
const CLEARANCE: f32 = 10.0;

/// Decide whether to flap this frame
pub fn should_jump(state: &GameState) -> bool {
    let config = &state.config;
    let floor = state
        .pipes
        .iter()
        .find(|p| !p.passed)
        .map(|p| p.gap_bottom(config.pipe_gap))
        .unwrap_or(config.height * 0.75);

    let bird = &state.bird;
    bird.y + bird.height + bird.velocity > floor - CLEARANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::{GamePhase, Pipe};

    #[test]
    fn test_flaps_when_sinking_below_gap() {
        let mut state = GameState::new(GameConfig::default(), 1);
        state.phase = GamePhase::Playing;
        state.pipes.push(Pipe {
            id: 1,
            x: 200.0,
            gap_top: 50.0,
            passed: false,
        });
        // Gap bottom at 200, bird bottom at 280
        assert!(should_jump(&state));

        state.bird.y = 100.0;
        state.bird.velocity = 0.0;
        assert!(!should_jump(&state));
    }

    #[test]
    fn test_ignores_cleared_pipes() {
        let mut state = GameState::new(GameConfig::default(), 1);
        state.pipes.push(Pipe {
            id: 1,
            x: 0.0,
            gap_top: 50.0,
            passed: true,
        });
        state.pipes.push(Pipe {
            id: 2,
            x: 300.0,
            gap_top: 280.0,
            passed: false,
        });
        // Target is the second gap (bottom 430)
        assert!(!should_jump(&state));
    }
}
