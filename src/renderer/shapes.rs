//! Shape generation for 2D primitives
//!
//! Coordinates are playfield units with y growing downward.

use glam::Vec2;

use super::vertex::Vertex;

/// Generate vertices for an axis-aligned rectangle (two triangles)
pub fn rect(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> Vec<Vertex> {
    if w <= 0.0 || h <= 0.0 {
        return Vec::new();
    }
    let (x2, y2) = (x + w, y + h);
    vec![
        Vertex::new(x, y, color),
        Vertex::new(x2, y, color),
        Vertex::new(x, y2, color),
        Vertex::new(x, y2, color),
        Vertex::new(x2, y, color),
        Vertex::new(x2, y2, color),
    ]
}

/// Generate vertices for a rectangle rotated by `angle` radians about `center`
///
/// `offset` shifts the rectangle relative to `center` before rotation, so
/// parts of a sprite can share one pivot.
pub fn rotated_rect(
    center: Vec2,
    offset: Vec2,
    size: Vec2,
    angle: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let rot = Vec2::from_angle(angle);
    let half = size * 0.5;
    let corner = |dx: f32, dy: f32| {
        let p = center + rot.rotate(offset + Vec2::new(dx, dy));
        Vertex::new(p.x, p.y, color)
    };

    let tl = corner(-half.x, -half.y);
    let tr = corner(half.x, -half.y);
    let bl = corner(-half.x, half.y);
    let br = corner(half.x, half.y);

    vec![tl, tr, bl, bl, tr, br]
}
