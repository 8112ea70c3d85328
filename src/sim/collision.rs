//! Collision detection
//!
//! All tests are exact: touching edges do not collide, any overlap does.

use super::state::{Bird, Pipe};
use crate::config::GameConfig;

/// Axis-aligned box in playfield coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Open-interval horizontal overlap
    #[inline]
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        self.right() > left && self.left() < right
    }
}

/// Bird has left the playfield vertically
pub fn out_of_bounds(bird: &Bird, height: f32) -> bool {
    let b = bird.bounds();
    b.top() < 0.0 || b.bottom() > height
}

/// Bird overlaps the solid part of a pipe column
pub fn bird_hits_pipe(bird: &Bird, pipe: &Pipe, config: &GameConfig) -> bool {
    let b = bird.bounds();
    if !b.overlaps_x(pipe.x, pipe.right(config.pipe_width)) {
        return false;
    }
    b.top() < pipe.gap_top || b.bottom() > pipe.gap_bottom(config.pipe_gap)
}
