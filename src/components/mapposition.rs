//! Point and direction helpers.
//!
//! Directions are in degrees with 0 pointing along +x. Since screen-space y
//! grows downwards, increasing angles turn clockwise on screen.

use glam::Vec2;

/// Distance between `(x1, y1)` and `(x2, y2)`.
pub fn point_distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    Vec2::new(x1, y1).distance(Vec2::new(x2, y2))
}

/// Direction in degrees, in `[0, 360)`, from `(x1, y1)` to `(x2, y2)`.
pub fn point_direction(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let delta = Vec2::new(x2, y2) - Vec2::new(x1, y1);
    let direction = delta.y.atan2(delta.x).to_degrees();
    if direction < 0.0 {
        direction + 360.0
    } else {
        direction
    }
}

/// Floored x-offset of the point `len` units away from the origin towards `dir` degrees.
pub fn length_direction_x(len: f32, dir: f32) -> f32 {
    (len * dir.to_radians().cos()).floor()
}

/// Floored y-offset of the point `len` units away from the origin towards `dir` degrees.
pub fn length_direction_y(len: f32, dir: f32) -> f32 {
    (len * dir.to_radians().sin()).floor()
}

/// Both floored offsets as a vector.
pub fn length_direction(len: f32, dir: f32) -> Vec2 {
    Vec2::new(length_direction_x(len, dir), length_direction_y(len, dir))
}
