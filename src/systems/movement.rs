//! Motion integration.
//!
//! Entities move by a length/direction decomposition of their speed. The
//! divisor couples speed units to the single supported tick rate and is kept
//! as-is because gameplay tuning depends on it.

use crate::components::entity::Entity;
use crate::components::mapposition::{length_direction_x, length_direction_y};

/// Speed units per position unit per step.
pub const MOTION_DIVISOR: f32 = 10.0;

/// Round half towards positive infinity (-1.5 rounds to -1).
fn round_half_up(value: f32) -> f32 {
    (value + 0.5).floor()
}

/// Position change for one step at `speed` towards `direction` degrees.
pub fn motion_delta(speed: f32, direction: f32) -> (f32, f32) {
    let dx = round_half_up(length_direction_x(speed, direction) / MOTION_DIVISOR);
    let dy = round_half_up(length_direction_y(speed, direction) / MOTION_DIVISOR);
    // Normalise -0.0 so positions never pick up a negative zero.
    (dx + 0.0, dy + 0.0)
}

/// Apply one step of motion. Entities with zero speed are left untouched.
pub fn integrate_motion(entity: &mut Entity) {
    if entity.speed == 0.0 {
        return;
    }
    let (dx, dy) = motion_delta(entity.speed, entity.direction);
    entity.x += dx;
    entity.y += dy;
}
