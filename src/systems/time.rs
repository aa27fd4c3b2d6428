//! Time update system.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! once per frame with the capped frame delta.
use crate::resources::worldtime::WorldTime;

/// Record a frame of `dt` seconds (already capped by the timestep).
pub fn update_world_time(time: &mut WorldTime, dt: f64) {
    time.elapsed += dt;
    time.delta = dt;
    time.frame_count += 1;
}

/// Record one executed simulation step.
pub fn record_step(time: &mut WorldTime) {
    time.step_count += 1;
}
