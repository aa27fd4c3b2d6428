//! Per-step and per-frame passes the controller and the game run.
//!
//! Submodules overview
//! - [`animation`] – advance sprite animations per step or per draw
//! - [`gameloop`] – fixed-timestep accumulator, clocks and the loop driver
//! - [`input`] – route touches to the controller and the entities under them
//! - [`movement`] – integrate speed and direction into positions
//! - [`render`] – canvas abstraction and frame composition
//! - [`time`] – update frame and step counters

pub mod animation;
pub mod gameloop;
pub mod input;
pub mod movement;
pub mod render;
pub mod time;
