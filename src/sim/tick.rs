//! Per-frame simulation tick
//!
//! One call to [`tick`] advances the game by exactly one frame. Step order is
//! fixed: gravity, movement, bounds, then each pipe (move, collide, score) in
//! spawn order, then culling.

use rand::Rng;

use super::collision::{bird_hits_pipe, out_of_bounds};
use super::state::{GameEvent, GamePhase, GameState, Pipe};
use crate::config::GameConfig;

/// Range of valid gap tops: `[low, high]`
pub fn gap_range(config: &GameConfig) -> (f32, f32) {
    let low = config.gap_margin;
    let high = config.height - config.pipe_gap - config.gap_margin;
    (low, high)
}

/// Leave the Ready phase. Returns false if the game already started.
pub fn start(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Ready {
        return false;
    }
    state.phase = GamePhase::Playing;
    log::info!("Game started (seed {})", state.seed);
    spawn_pipe(state);
    true
}

/// Flap: override the current velocity with the jump impulse
pub fn jump(state: &mut GameState) {
    if state.is_over() {
        return;
    }
    state.bird.velocity = state.config.jump_impulse;
    state.emit(GameEvent::Jumped);
}

/// Add a pipe at the right edge with a uniformly placed gap
pub fn spawn_pipe(state: &mut GameState) {
    if state.is_over() {
        return;
    }
    let (low, high) = gap_range(&state.config);
    let u: f32 = state.rng.random();
    let gap_top = (low + u * (high - low)).min(high);

    let id = state.next_entity_id();
    state.pipes.push(Pipe {
        id,
        x: state.config.width,
        gap_top,
        passed: false,
    });
    log::debug!("Spawned pipe {} with gap at {:.1}", id, gap_top);
    state.emit(GameEvent::PipeSpawned);
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let config = state.config.clone();
    state.time_ticks += 1;

    // Bird
    state.bird.velocity += config.gravity;
    state.bird.y += state.bird.velocity;

    if out_of_bounds(&state.bird, config.height) {
        state.end();
        return;
    }

    // Pipes
    for i in 0..state.pipes.len() {
        let pipe = &mut state.pipes[i];
        pipe.x -= config.pipe_speed;

        if bird_hits_pipe(&state.bird, pipe, &config) {
            state.end();
            return;
        }

        if !pipe.passed && pipe.right(config.pipe_width) < state.bird.x {
            pipe.passed = true;
            state.score += 1;
            let score = state.score;
            state.emit(GameEvent::Scored { score });
        }
    }

    state.pipes.retain(|p| p.right(config.pipe_width) > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(GameConfig::default(), seed);
        state.phase = GamePhase::Playing;
        state
    }

    /// Pipe whose gap comfortably contains a bird near the vertical middle
    fn safe_pipe(state: &mut GameState, x: f32) {
        let id = state.next_entity_id();
        state.pipes.push(Pipe {
            id,
            x,
            gap_top: 170.0,
            passed: false,
        });
    }

    #[test]
    fn test_start_spawns_first_pipe() {
        let mut state = GameState::new(GameConfig::default(), 1);
        assert!(start(&mut state));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.pipes.len(), 1);
        assert_eq!(state.pipes[0].x, 320.0);
        assert!(!state.pipes[0].passed);

        // Second start does nothing
        assert!(!start(&mut state));
        assert_eq!(state.pipes.len(), 1);
    }

    #[test]
    fn test_tick_ignored_before_start() {
        let mut state = GameState::new(GameConfig::default(), 1);
        tick(&mut state);
        assert_eq!(state.bird.y, 240.0);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_jump_then_tick() {
        let mut state = playing(1);
        let y0 = state.bird.y;
        jump(&mut state);
        assert_eq!(state.bird.velocity, -8.0);

        tick(&mut state);
        assert_eq!(state.bird.velocity, -7.5);
        assert_eq!(state.bird.y, y0 - 7.5);
    }

    #[test]
    fn test_collision_above_gap_ends_game() {
        let mut state = playing(1);
        // After gravity: velocity 0, y stays at 40 (bottom 80)
        state.bird.y = 40.0;
        state.bird.velocity = -0.5;
        state.pipes.push(Pipe {
            id: 1,
            x: 72.0,
            gap_top: 50.0,
            passed: false,
        });

        tick(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.pipes[0].x, 70.0);
        assert_eq!(state.drain_events(), vec![GameEvent::GameOver { score: 0 }]);
    }

    #[test]
    fn test_flush_with_gap_survives() {
        let mut state = playing(1);
        state.bird.y = 50.0;
        state.bird.velocity = -0.5;
        state.pipes.push(Pipe {
            id: 1,
            x: 72.0,
            gap_top: 50.0,
            passed: false,
        });

        tick(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_collision_stops_pipe_processing() {
        let mut state = playing(1);
        state.bird.velocity = -0.5;
        state.pipes.push(Pipe {
            id: 1,
            x: 72.0,
            gap_top: 50.0,
            passed: false,
        });
        safe_pipe(&mut state, 200.0);

        tick(&mut state);
        assert!(state.is_over());
        assert_eq!(state.pipes[1].x, 200.0);
    }

    #[test]
    fn test_ceiling_and_floor_end_game() {
        let mut state = playing(1);
        state.bird.y = 3.0;
        state.bird.velocity = -4.0;
        tick(&mut state);
        assert!(state.is_over());

        let mut state = playing(1);
        state.bird.y = 439.0;
        state.bird.velocity = 1.0;
        tick(&mut state);
        assert!(state.is_over());
    }

    #[test]
    fn test_out_of_bounds_skips_pipe_update() {
        let mut state = playing(1);
        state.bird.y = 1.0;
        state.bird.velocity = -5.0;
        safe_pipe(&mut state, 200.0);

        tick(&mut state);
        assert!(state.is_over());
        assert_eq!(state.pipes[0].x, 200.0);
    }

    #[test]
    fn test_scoring_is_strict_and_once() {
        let mut state = playing(1);
        // After moving, the trailing edge sits exactly on the bird's x
        safe_pipe(&mut state, 22.0);
        state.bird.velocity = -0.5;

        tick(&mut state);
        assert_eq!(state.score, 0);
        assert!(!state.pipes[0].passed);

        tick(&mut state);
        assert_eq!(state.score, 1);
        assert!(state.pipes[0].passed);

        tick(&mut state);
        assert_eq!(state.score, 1);
        let scored: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Scored { .. }))
            .collect();
        assert_eq!(scored, vec![GameEvent::Scored { score: 1 }]);
    }

    #[test]
    fn test_offscreen_pipe_removed() {
        let mut state = playing(1);
        safe_pipe(&mut state, -57.0);
        safe_pipe(&mut state, -58.5);
        safe_pipe(&mut state, 200.0);
        state.bird.velocity = -0.5;

        tick(&mut state);
        // -59 + 60 = 1 survives; -60.5 + 60 < 0 removed
        let ids: Vec<u32> = state.pipes.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_pipe_at_zero_edge_removed() {
        let mut state = playing(1);
        safe_pipe(&mut state, -58.0);
        state.bird.velocity = -0.5;
        tick(&mut state);
        assert!(state.pipes.is_empty());
    }

    #[test]
    fn test_game_over_freezes_state() {
        let mut state = playing(1);
        safe_pipe(&mut state, 200.0);
        state.end();
        let bird = state.bird.clone();
        let pipes = state.pipes.clone();

        for _ in 0..10 {
            tick(&mut state);
            jump(&mut state);
            spawn_pipe(&mut state);
        }
        assert_eq!(state.bird, bird);
        assert_eq!(state.pipes, pipes);
        assert_eq!(state.score, 0);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(GameConfig::default(), 99999);
        let mut b = GameState::new(GameConfig::default(), 99999);
        for _ in 0..5 {
            spawn_pipe(&mut a);
            spawn_pipe(&mut b);
        }
        assert_eq!(a.pipes, b.pipes);
    }

    proptest! {
        #[test]
        fn prop_gravity_accumulates(
            gravity in 0.01f32..1.0,
            v0 in -3.0f32..3.0,
            ticks in 1usize..6,
        ) {
            let config = GameConfig { gravity, ..Default::default() };
            let mut state = GameState::new(config, 3);
            state.phase = GamePhase::Playing;
            state.bird.velocity = v0;

            for _ in 0..ticks {
                let before = state.bird.velocity;
                tick(&mut state);
                prop_assert_eq!(state.phase, GamePhase::Playing);
                prop_assert_eq!(state.bird.velocity, before + gravity);
            }
        }

        #[test]
        fn prop_jump_overrides_velocity(v0 in -50.0f32..50.0) {
            let mut state = playing(5);
            state.bird.velocity = v0;
            jump(&mut state);
            prop_assert_eq!(state.bird.velocity, state.config.jump_impulse);
        }

        #[test]
        fn prop_gap_stays_in_range(seed in any::<u64>(), height in 300.0f32..900.0) {
            let config = GameConfig { height, ..Default::default() };
            let (low, high) = gap_range(&config);
            let mut state = GameState::new(config, seed);
            for _ in 0..20 {
                spawn_pipe(&mut state);
            }
            for pipe in &state.pipes {
                prop_assert!(pipe.gap_top >= low && pipe.gap_top <= high);
                prop_assert_eq!(pipe.x, state.config.width);
            }
        }

        #[test]
        fn prop_culling_preserves_order(xs in prop::collection::vec(-80.0f32..320.0, 0..12)) {
            let mut state = playing(9);
            state.bird.velocity = -0.5;
            for &x in &xs {
                safe_pipe(&mut state, x);
            }
            let expected: Vec<u32> = state
                .pipes
                .iter()
                .filter(|p| p.x - 2.0 + 60.0 > 0.0)
                .map(|p| p.id)
                .collect();

            tick(&mut state);
            prop_assert_eq!(state.phase, GamePhase::Playing);
            let ids: Vec<u32> = state.pipes.iter().map(|p| p.id).collect();
            prop_assert_eq!(ids, expected);
        }

        #[test]
        fn prop_score_counts_each_pipe_once(
            seed in any::<u64>(),
            flaps in prop::collection::vec(any::<bool>(), 400),
        ) {
            let mut state = playing(seed);
            let mut passed = std::collections::BTreeSet::new();
            let mut last_score = 0;

            for (i, flap) in flaps.into_iter().enumerate() {
                if i % 120 == 0 {
                    spawn_pipe(&mut state);
                }
                if flap && state.bird.velocity > 2.0 {
                    jump(&mut state);
                }
                tick(&mut state);

                prop_assert!(state.score >= last_score);
                prop_assert!(state.score - last_score <= 1);
                last_score = state.score;
                passed.extend(state.pipes.iter().filter(|p| p.passed).map(|p| p.id));
                prop_assert_eq!(state.score as usize, passed.len());
                if state.is_over() {
                    break;
                }
            }
        }
    }
}
