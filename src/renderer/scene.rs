//! Full-frame scene construction
//!
//! Turns a [`GameState`] into a vertex list. Nothing here mutates the state;
//! the whole scene is rebuilt every frame.

use glam::Vec2;

use super::shapes::{rect, rotated_rect};
use super::vertex::{Vertex, colors};
use crate::sim::{GamePhase, GameState};

/// Height of the lip drawn at the gap end of each pipe
const CAP_HEIGHT: f32 = 12.0;
/// How far the lip overhangs each side of the pipe
const CAP_OVERHANG: f32 = 4.0;

/// Build every vertex for one frame
pub fn build(state: &GameState) -> Vec<Vertex> {
    let config = &state.config;
    let mut vertices = Vec::with_capacity(6 * (2 + state.pipes.len() * 4 + 5));

    vertices.extend(rect(0.0, 0.0, config.width, config.height, colors::SKY));

    for pipe in &state.pipes {
        let w = config.pipe_width;
        let gap_bottom = pipe.gap_bottom(config.pipe_gap);

        // Upper pipe
        vertices.extend(rect(pipe.x, 0.0, w, pipe.gap_top, colors::PIPE));
        vertices.extend(rect(
            pipe.x - CAP_OVERHANG,
            pipe.gap_top - CAP_HEIGHT,
            w + 2.0 * CAP_OVERHANG,
            CAP_HEIGHT,
            colors::PIPE_CAP,
        ));

        // Lower pipe
        vertices.extend(rect(
            pipe.x,
            gap_bottom,
            w,
            config.height - gap_bottom,
            colors::PIPE,
        ));
        vertices.extend(rect(
            pipe.x - CAP_OVERHANG,
            gap_bottom,
            w + 2.0 * CAP_OVERHANG,
            CAP_HEIGHT,
            colors::PIPE_CAP,
        ));
    }

    vertices.extend(bird(state));

    if state.phase == GamePhase::GameOver {
        vertices.extend(rect(
            0.0,
            0.0,
            config.width,
            config.height,
            colors::GAME_OVER_SHADE,
        ));
    }

    vertices
}

/// Bird sprite: body, wing, eye and beak sharing one pivot
fn bird(state: &GameState) -> Vec<Vertex> {
    let bird = &state.bird;
    let size = Vec2::new(bird.width, bird.height);
    let center = Vec2::new(bird.x, bird.y) + size * 0.5;
    let angle = bird.tilt(state.config.tilt_factor);

    let mut v = rotated_rect(center, Vec2::ZERO, size, angle, colors::BIRD);
    v.extend(rotated_rect(
        center,
        size * Vec2::new(-0.15, 0.1),
        size * Vec2::new(0.45, 0.3),
        angle,
        colors::BIRD_WING,
    ));
    v.extend(rotated_rect(
        center,
        size * Vec2::new(0.2, -0.2),
        size * 0.2,
        angle,
        colors::BIRD_EYE,
    ));
    v.extend(rotated_rect(
        center,
        size * Vec2::new(0.5, 0.05),
        size * Vec2::new(0.3, 0.2),
        angle,
        colors::BIRD_BEAK,
    ));
    v
}
